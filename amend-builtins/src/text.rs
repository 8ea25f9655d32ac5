//! Text and binary coercions plus length normalization.
//!
//! Length normalization is shared by the three sized, order-preserving
//! kinds: text (in characters), binary (in bytes), and sequences (in
//! elements).

use amend_engine::{Amendment, Check, Correction};
use amend_types::Value;
use tracing::debug;

use crate::error::CatalogError;
use crate::normalize::{lcm, plan_length_change, Side};

/// Coerce scalars, binary UTF-8, and paths into text.
///
/// Binary that is not valid UTF-8 is a cast failure, not a lossy decode:
/// a lossy decode would fabricate characters the input never contained.
#[derive(Debug, Clone, Default)]
pub struct CoerceToText {
    pub fallback: Option<String>,
}

impl CoerceToText {
    const IDENTITY: &'static str = "coerce-text";

    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            fallback: Some(fallback.into()),
        }
    }

    fn cast(value: &Value) -> Option<String> {
        match value {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Real(x) => Some(x.to_string()),
            Value::Binary(bytes) => String::from_utf8(bytes.clone()).ok(),
            Value::Path(p) => Some(p.to_string()),
            _ => None,
        }
    }
}

impl Amendment for CoerceToText {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Text(_) => Check::Conforms,
            Value::Bool(_) | Value::Int(_) | Value::Real(_) | Value::Binary(_)
            | Value::Path(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(s) = Self::cast(&value) {
            return Ok(Correction::amended(s));
        }
        Ok(match &self.fallback {
            Some(fallback) => {
                debug!(identity = Self::IDENTITY, "cast failed, substituting fallback");
                Correction::amended(fallback.clone())
            }
            None => Correction::uncorrectable(format!("cannot cast {value:?} to text")),
        })
    }
}

/// Coerce text (as UTF-8) and byte-valued sequences into binary.
#[derive(Debug, Clone, Default)]
pub struct CoerceToBinary {
    pub fallback: Option<Vec<u8>>,
}

impl CoerceToBinary {
    const IDENTITY: &'static str = "coerce-binary";

    pub fn with_fallback(fallback: Vec<u8>) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    fn cast(value: &Value) -> Option<Vec<u8>> {
        match value {
            Value::Text(s) => Some(s.as_bytes().to_vec()),
            Value::Seq(items) => items
                .iter()
                .map(|item| match item {
                    Value::Int(n) => u8::try_from(*n).ok(),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

impl Amendment for CoerceToBinary {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Binary(_) => Check::Conforms,
            Value::Text(_) | Value::Seq(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(bytes) = Self::cast(&value) {
            return Ok(Correction::amended(bytes));
        }
        Ok(match &self.fallback {
            Some(fallback) => {
                debug!(identity = Self::IDENTITY, "cast failed, substituting fallback");
                Correction::amended(fallback.clone())
            }
            None => Correction::uncorrectable(format!("cannot cast {value:?} to binary")),
        })
    }
}

/// Declarative length window plus the strategies allowed to reach it.
///
/// `multiple_of` lists natural numbers the final length must divide by;
/// their least common multiple is the candidate step. With no `truncate` and
/// no `pad` side, the amendment is a pure gate and violations are rejected.
#[derive(Debug, Clone, Default)]
pub struct LengthPolicy {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub multiple_of: Vec<u64>,
    pub truncate: Option<Side>,
    pub pad: Option<Side>,
    /// Element(s) to pad with. A multi-element value is cycled and cut to
    /// the exact padding length. Defaults: `'_'` for text, `0x00` for
    /// binary, `Null` for sequences.
    pub pad_with: Option<Value>,
}

/// Normalize the length of a text, binary, or sequence value.
#[derive(Debug, Clone)]
pub struct NormalizeLength {
    policy: LengthPolicy,
    step: u64,
}

impl NormalizeLength {
    pub fn new(policy: LengthPolicy) -> Result<Self, CatalogError> {
        if let (Some(min), Some(max)) = (policy.min, policy.max)
            && min > max
        {
            return Err(CatalogError::InvertedLengths { min, max });
        }
        let step = lcm(&policy.multiple_of)?;
        Ok(Self { policy, step })
    }

    fn plan(&self, len: usize) -> Option<(i64, i64)> {
        plan_length_change(
            len,
            self.policy.min,
            self.policy.max,
            self.step,
            self.policy.truncate,
            self.policy.pad,
        )
    }
}

impl Amendment for NormalizeLength {
    fn identity(&self) -> &'static str {
        "normalize-length"
    }

    fn check(&self, value: &Value) -> Check {
        let len = match value {
            Value::Text(_) | Value::Binary(_) | Value::Seq(_) => {
                value.len().unwrap_or_default()
            }
            _ => return Check::Unsupported,
        };
        match self.plan(len) {
            Some((0, 0)) => Check::Conforms,
            _ => Check::Amendable,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let len = match value.len() {
            Some(len) if matches!(value, Value::Text(_) | Value::Binary(_) | Value::Seq(_)) => {
                len
            }
            _ => anyhow::bail!("correct called outside the sized domain: {value:?}"),
        };

        let Some(change) = self.plan(len) else {
            return Ok(
                if self.policy.truncate.is_none() && self.policy.pad.is_none() {
                    Correction::violation(format!("length {len} violates the length constraints"))
                } else {
                    Correction::uncorrectable(format!(
                        "no permitted truncate/pad strategy reaches a conforming length from {len}"
                    ))
                },
            );
        };

        let normalized = match value {
            Value::Text(s) => {
                let pad = match &self.policy.pad_with {
                    None => vec!['_'],
                    Some(Value::Text(p)) if !p.is_empty() => p.chars().collect(),
                    Some(other) => {
                        anyhow::bail!("padding value {other:?} cannot pad text")
                    }
                };
                let chars = resize(s.chars().collect(), change, &pad);
                Value::Text(chars.into_iter().collect())
            }
            Value::Binary(bytes) => {
                let pad = match &self.policy.pad_with {
                    None => vec![0u8],
                    Some(Value::Binary(p)) if !p.is_empty() => p.clone(),
                    Some(other) => {
                        anyhow::bail!("padding value {other:?} cannot pad binary")
                    }
                };
                Value::Binary(resize(bytes, change, &pad))
            }
            Value::Seq(items) => {
                let pad = match &self.policy.pad_with {
                    None => vec![Value::Null],
                    Some(Value::Seq(p)) if !p.is_empty() => p.clone(),
                    Some(single) => vec![single.clone()],
                };
                Value::Seq(resize(items, change, &pad))
            }
            other => anyhow::bail!("correct called outside the sized domain: {other:?}"),
        };

        Ok(Correction::Amended(normalized))
    }
}

/// Apply a per-side change: negative removes that many elements from that
/// side, positive inserts the padding cycle cut to that many elements.
fn resize<T: Clone>(mut items: Vec<T>, change: (i64, i64), pad: &[T]) -> Vec<T> {
    let (left, right) = change;

    if left < 0 {
        items.drain(..items.len().min(left.unsigned_abs() as usize));
    } else if left > 0 {
        let mut padded = cycle_to(pad, left as usize);
        padded.append(&mut items);
        items = padded;
    }

    if right < 0 {
        let keep = items.len().saturating_sub(right.unsigned_abs() as usize);
        items.truncate(keep);
    } else if right > 0 {
        items.extend(cycle_to(pad, right as usize));
    }

    items
}

fn cycle_to<T: Clone>(pad: &[T], n: usize) -> Vec<T> {
    pad.iter().cloned().cycle().take(n).collect()
}
