use std::cmp::Ordering;

use amend_engine::{Amendment, Check, Correction};
use amend_types::{Value, ValueKind};

use crate::error::CatalogError;

/// What to do with a value outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsMode {
    /// Replace the value with the violated endpoint.
    Clamp,
    /// Fail with a value violation; no correction is attempted.
    Reject,
}

/// Same-kind ordered window over integers, reals, and the temporal kinds.
///
/// Both endpoints must share one kind; the amendment then declares exactly
/// that kind as its domain. Values of any other kind, including the *other*
/// numeric kind, are unsupported, so a pipeline states its coercion step
/// explicitly rather than relying on implicit cross-kind comparison.
#[derive(Debug, Clone)]
pub struct Bounds {
    min: Option<Value>,
    max: Option<Value>,
    mode: BoundsMode,
}

impl Bounds {
    pub fn new(
        min: Option<Value>,
        max: Option<Value>,
        mode: BoundsMode,
    ) -> Result<Self, CatalogError> {
        let kind = match (&min, &max) {
            (None, None) => return Err(CatalogError::MissingBounds),
            (Some(lo), Some(hi)) => {
                if lo.kind() != hi.kind() {
                    return Err(CatalogError::MixedBoundKinds {
                        min: lo.kind(),
                        max: hi.kind(),
                    });
                }
                lo.kind()
            }
            (Some(v), None) | (None, Some(v)) => v.kind(),
        };

        if !is_ordered_kind(kind) {
            return Err(CatalogError::UnorderedBoundKind(kind));
        }
        for endpoint in [&min, &max].into_iter().flatten() {
            if let Value::Real(x) = endpoint
                && !x.is_finite()
            {
                return Err(CatalogError::NonFiniteBound);
            }
        }
        if let (Some(lo), Some(hi)) = (&min, &max)
            && compare_same_kind(lo, hi) == Some(Ordering::Greater)
        {
            return Err(CatalogError::InvertedBounds);
        }

        Ok(Self { min, max, mode })
    }

    pub fn clamp(min: impl Into<Value>, max: impl Into<Value>) -> Result<Self, CatalogError> {
        Self::new(Some(min.into()), Some(max.into()), BoundsMode::Clamp)
    }

    pub fn clamp_min(min: impl Into<Value>) -> Result<Self, CatalogError> {
        Self::new(Some(min.into()), None, BoundsMode::Clamp)
    }

    pub fn clamp_max(max: impl Into<Value>) -> Result<Self, CatalogError> {
        Self::new(None, Some(max.into()), BoundsMode::Clamp)
    }

    pub fn reject(min: Option<Value>, max: Option<Value>) -> Result<Self, CatalogError> {
        Self::new(min, max, BoundsMode::Reject)
    }

    fn domain(&self) -> ValueKind {
        match (&self.min, &self.max) {
            (Some(v), _) | (None, Some(v)) => v.kind(),
            // Ruled out by the constructor.
            (None, None) => ValueKind::Null,
        }
    }

    /// The endpoint `value` violates, if any. An incomparable value (NaN)
    /// counts as violating the low endpoint when one exists.
    fn violated_endpoint(&self, value: &Value) -> Option<&Value> {
        if let Some(lo) = &self.min
            && compare_same_kind(value, lo) != Some(Ordering::Greater)
            && compare_same_kind(value, lo) != Some(Ordering::Equal)
        {
            return Some(lo);
        }
        if let Some(hi) = &self.max
            && compare_same_kind(value, hi) == Some(Ordering::Greater)
        {
            return Some(hi);
        }
        None
    }
}

impl Amendment for Bounds {
    fn identity(&self) -> &'static str {
        match self.mode {
            BoundsMode::Clamp => "clamp-range",
            BoundsMode::Reject => "require-range",
        }
    }

    fn check(&self, value: &Value) -> Check {
        if value.kind() != self.domain() {
            return Check::Unsupported;
        }
        match self.violated_endpoint(value) {
            None => Check::Conforms,
            Some(_) => Check::Amendable,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        // NaN has no order, so neither endpoint is a meaningful replacement.
        if let Value::Real(x) = &value
            && x.is_nan()
        {
            return Ok(Correction::uncorrectable(
                "NaN cannot be ordered against the window",
            ));
        }
        let Some(endpoint) = self.violated_endpoint(&value) else {
            anyhow::bail!("correct called on a value inside the window: {value:?}");
        };
        Ok(match self.mode {
            BoundsMode::Clamp => Correction::Amended(endpoint.clone()),
            BoundsMode::Reject => Correction::violation(format!(
                "{} is outside the window bounded by {}",
                render(&value),
                render(endpoint),
            )),
        })
    }
}

fn is_ordered_kind(kind: ValueKind) -> bool {
    matches!(
        kind,
        ValueKind::Int
            | ValueKind::Real
            | ValueKind::Date
            | ValueKind::Time
            | ValueKind::DateTime
            | ValueKind::Offset
    )
}

/// Ordering between two values of the same kind; `None` for kind mismatch
/// or NaN.
fn compare_same_kind(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Real(x), Value::Real(y)) => x.partial_cmp(y),
        (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
        (Value::Time(x), Value::Time(y)) => Some(x.cmp(y)),
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        (Value::Offset(x), Value::Offset(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Plain rendering for failure details; only the ordered kinds need it.
fn render(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Real(x) => x.to_string(),
        Value::Date(d) => d.to_string(),
        Value::Time(t) => t.to_string(),
        Value::DateTime(dt) => dt.to_string(),
        Value::Offset(delta) => delta.to_string(),
        other => format!("{other:?}"),
    }
}
