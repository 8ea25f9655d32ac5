use amend_types::{FailureKind, Value};

/// A single correctable check: one value intent, one deterministic fix.
///
/// Implementations must be stateless with respect to prior invocations and
/// deterministic across calls and process runs: no ambient state, no
/// randomness, no wall clock. A pipeline may be shared across threads, so
/// the trait requires `Send + Sync` and takes `&self` everywhere.
pub trait Amendment: Send + Sync {
    /// Stable kind name, e.g. `"coerce-int"` or `"clamp-range"`. Used to
    /// pinpoint the failing step in outcomes and traces.
    fn identity(&self) -> &'static str;

    /// Pure classification of `value` against this amendment's intent.
    ///
    /// Must not have observable side effects. A value whose kind lies
    /// outside the declared domain is [`Check::Unsupported`]: a caller
    /// error surfaced as a structured failure, never a silent
    /// "not conforming".
    fn check(&self, value: &Value) -> Check;

    /// Attempt the deterministic correction. Only invoked when [`check`]
    /// returned [`Check::Amendable`].
    ///
    /// `Ok(Correction::Failed { .. })` is the expected, data-driven failure
    /// path. `Err(_)` means the amendment itself is broken and aborts the
    /// whole pipeline as a hard error.
    ///
    /// [`check`]: Amendment::check
    fn correct(&self, value: Value) -> anyhow::Result<Correction>;
}

/// Tri-state verdict of [`Amendment::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Already satisfies the intent; the executor leaves the value untouched.
    Conforms,
    /// Does not satisfy the intent; a correction will be attempted.
    Amendable,
    /// Kind outside this amendment's declared domain.
    Unsupported,
}

/// Result of [`Amendment::correct`].
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    Amended(Value),
    Failed {
        kind: FailureKind,
        detail: Option<String>,
    },
}

impl Correction {
    pub fn amended(value: impl Into<Value>) -> Self {
        Correction::Amended(value.into())
    }

    pub fn uncorrectable(detail: impl Into<String>) -> Self {
        Correction::Failed {
            kind: FailureKind::Uncorrectable,
            detail: Some(detail.into()),
        }
    }

    pub fn violation(detail: impl Into<String>) -> Self {
        Correction::Failed {
            kind: FailureKind::ValueViolation,
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_constructors_pick_the_right_kind() {
        assert_eq!(Correction::amended(5i64), Correction::Amended(Value::Int(5)));

        match Correction::uncorrectable("nope") {
            Correction::Failed { kind, detail } => {
                assert!(kind.is_uncorrectable());
                assert_eq!(detail.as_deref(), Some("nope"));
            }
            other => panic!("expected failure, got {other:?}"),
        }

        match Correction::violation("out of range") {
            Correction::Failed { kind, .. } => assert!(kind.is_value_violation()),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
