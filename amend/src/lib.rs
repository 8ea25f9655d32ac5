//! Declared-intent value amendment: confirm a value satisfies an intent,
//! deterministically correct it, or report that no correction is possible.
//!
//! This is the embeddable facade: it re-exports the whole public surface so
//! a host process needs exactly one dependency, and adds the one high-level
//! entry point that resolves an intent through a registry and applies the
//! resulting pipeline in a single call.
//!
//! ```
//! use amend::{amend_with, Catalog, Value};
//!
//! let catalog = Catalog::standard();
//! let outcome = amend_with(&catalog, "integer", Value::from("42"))?;
//! assert!(outcome.conforms);
//! assert_eq!(outcome.value, Value::Int(42));
//! # Ok::<(), amend::AmendError>(())
//! ```
//!
//! Custom intents are registered up front, then the catalog is used
//! read-only:
//!
//! ```
//! use amend::builtins::{Bounds, CoerceToInt};
//! use amend::{amend_with, Catalog, Pipeline, Value};
//!
//! let catalog = Catalog::standard().register(
//!     "non-negative-integer",
//!     Pipeline::new()
//!         .then(CoerceToInt::default())
//!         .then(Bounds::clamp_min(0i64).expect("valid bounds")),
//! );
//!
//! let outcome = amend_with(&catalog, "non-negative-integer", Value::from("-5"))?;
//! assert_eq!(outcome.value, Value::Int(0));
//! # Ok::<(), amend::AmendError>(())
//! ```

pub use amend_builtins as builtins;
pub use amend_builtins::{Catalog, CatalogError};
pub use amend_engine::{
    apply, apply_steps, Amendment, ApplyError, Check, Correction, Pipeline, Registry,
};
pub use amend_types::{AmendOutcome, FailureKind, FailureReason, StepRef, Value, ValueKind};

/// Errors out of [`amend_with`]: either the intent is not registered, or an
/// amendment implementation broke its contract. Non-conforming values are
/// not errors; they come back inside the outcome.
#[derive(Debug, thiserror::Error)]
pub enum AmendError {
    #[error("unknown intent `{0}`")]
    UnknownIntent(String),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Resolve `intent` through `registry` and apply the pipeline to `value`.
pub fn amend_with(
    registry: &dyn Registry,
    intent: &str,
    value: Value,
) -> Result<AmendOutcome, AmendError> {
    let pipeline = registry
        .resolve(intent)
        .ok_or_else(|| AmendError::UnknownIntent(intent.to_string()))?;
    Ok(pipeline.apply(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_intents_fail_before_any_pipeline_runs() {
        let catalog = Catalog::empty();
        let err = amend_with(&catalog, "integer", Value::Int(1)).expect_err("unknown intent");
        assert!(matches!(err, AmendError::UnknownIntent(ref name) if name == "integer"));
        assert_eq!(err.to_string(), "unknown intent `integer`");
    }

    #[test]
    fn resolved_intents_apply_their_pipeline() {
        let catalog = Catalog::standard();
        let outcome = amend_with(&catalog, "integer", Value::from("7")).expect("amend");
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::Int(7));
    }
}
