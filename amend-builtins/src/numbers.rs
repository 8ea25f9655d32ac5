//! Numeric coercions and constraints.

use amend_engine::{Amendment, Check, Correction};
use amend_types::Value;
use tracing::debug;

use crate::error::CatalogError;

/// Coerce booleans, finite reals, and decimal text into an integer.
///
/// Reals truncate toward zero. With a `fallback`, a failed cast substitutes
/// it instead of failing.
#[derive(Debug, Clone, Default)]
pub struct CoerceToInt {
    pub fallback: Option<i64>,
}

impl CoerceToInt {
    const IDENTITY: &'static str = "coerce-int";

    pub fn with_fallback(fallback: i64) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    fn cast(value: &Value) -> Option<i64> {
        match value {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Real(x) => {
                let t = x.trunc();
                (x.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
            }
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl Amendment for CoerceToInt {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Int(_) => Check::Conforms,
            Value::Bool(_) | Value::Real(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(n) = Self::cast(&value) {
            return Ok(Correction::amended(n));
        }
        Ok(match self.fallback {
            Some(fallback) => {
                debug!(identity = Self::IDENTITY, fallback, "cast failed, substituting fallback");
                Correction::amended(fallback)
            }
            None => Correction::uncorrectable(format!("cannot cast {value:?} to an integer")),
        })
    }
}

/// Coerce integers, booleans, and numeric text into a real number.
#[derive(Debug, Clone, Default)]
pub struct CoerceToReal {
    pub fallback: Option<f64>,
}

impl CoerceToReal {
    const IDENTITY: &'static str = "coerce-real";

    pub fn with_fallback(fallback: f64) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    fn cast(value: &Value) -> Option<f64> {
        match value {
            Value::Int(n) => Some(*n as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl Amendment for CoerceToReal {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Real(_) => Check::Conforms,
            Value::Int(_) | Value::Bool(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(x) = Self::cast(&value) {
            return Ok(Correction::amended(x));
        }
        Ok(match self.fallback {
            Some(fallback) => {
                debug!(identity = Self::IDENTITY, fallback, "cast failed, substituting fallback");
                Correction::amended(fallback)
            }
            None => Correction::uncorrectable(format!("cannot cast {value:?} to a real number")),
        })
    }
}

/// Reject-style gate: NaN and infinities have no deterministic correction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteReal;

impl Amendment for FiniteReal {
    fn identity(&self) -> &'static str {
        "finite-real"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Real(x) if x.is_finite() => Check::Conforms,
            Value::Real(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Value::Real(x) = value else {
            anyhow::bail!("correct called outside the real domain: {value:?}");
        };
        Ok(Correction::violation(format!("{x} is not finite")))
    }
}

/// Round a real to a fixed number of decimal places, half away from zero.
#[derive(Debug, Clone, Copy)]
pub struct Round {
    factor: f64,
}

impl Round {
    /// `decimals` beyond f64's precision would turn the scaling factor into
    /// a lie, so the constructor refuses them.
    pub fn new(decimals: u32) -> Result<Self, CatalogError> {
        if decimals > 15 {
            return Err(CatalogError::ExcessiveDecimals(decimals));
        }
        Ok(Self {
            factor: 10f64.powi(decimals as i32),
        })
    }

    fn rounded(&self, x: f64) -> f64 {
        (x * self.factor).round() / self.factor
    }
}

impl Amendment for Round {
    fn identity(&self) -> &'static str {
        "round-decimals"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Real(x) if !x.is_finite() => Check::Conforms,
            Value::Real(x) if self.rounded(*x) == *x => Check::Conforms,
            Value::Real(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Value::Real(x) = value else {
            anyhow::bail!("correct called outside the real domain: {value:?}");
        };
        Ok(Correction::amended(self.rounded(x)))
    }
}
