//! Sequence, set, and mapping coercions.

use std::collections::BTreeMap;

use amend_engine::{Amendment, Check, Correction};
use amend_types::Value;

use crate::error::CatalogError;

/// Coerce the other iterable kinds into a sequence.
///
/// Text becomes a sequence of one-character texts, binary a sequence of
/// byte-valued ints, and a mapping a sequence of its keys: the same
/// elements iterating the source kind would produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoerceToSeq;

impl Amendment for CoerceToSeq {
    fn identity(&self) -> &'static str {
        "coerce-seq"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Seq(_) => Check::Conforms,
            Value::Set(_) | Value::Text(_) | Value::Binary(_) | Value::Map(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Some(items) = elements_of(value) else {
            anyhow::bail!("correct called outside the iterable domain");
        };
        Ok(Correction::Amended(Value::Seq(items)))
    }
}

/// Coerce iterables into a duplicate-free set.
///
/// De-duplication keeps the first occurrence of each element, in input
/// order, so repeated runs over the same input produce the same set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoerceToSet;

impl CoerceToSet {
    fn has_duplicates(items: &[Value]) -> bool {
        items
            .iter()
            .enumerate()
            .any(|(i, item)| items[..i].contains(item))
    }

    fn dedup(items: Vec<Value>) -> Vec<Value> {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        unique
    }
}

impl Amendment for CoerceToSet {
    fn identity(&self) -> &'static str {
        "coerce-set"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Set(items) if !Self::has_duplicates(items) => Check::Conforms,
            Value::Set(_)
            | Value::Seq(_)
            | Value::Text(_)
            | Value::Binary(_)
            | Value::Map(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Some(items) = elements_of(value) else {
            anyhow::bail!("correct called outside the iterable domain");
        };
        Ok(Correction::Amended(Value::Set(Self::dedup(items))))
    }
}

/// Coerce a sequence of `[key, value]` pairs into a mapping.
///
/// Later pairs overwrite earlier ones, the way building a dictionary from
/// pairs does. Keys must be text: the mapping kind is keyed by strings and
/// inventing a key rendering here would hide a caller bug.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoerceToMap;

impl Amendment for CoerceToMap {
    fn identity(&self) -> &'static str {
        "coerce-map"
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Map(_) => Check::Conforms,
            Value::Seq(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Value::Seq(items) = value else {
            anyhow::bail!("correct called outside the pair-sequence domain");
        };

        let mut entries = BTreeMap::new();
        for (index, item) in items.into_iter().enumerate() {
            let Value::Seq(pair) = item else {
                return Ok(Correction::uncorrectable(format!(
                    "element {index} is not a [key, value] pair"
                )));
            };
            let mut pair = pair.into_iter();
            match (pair.next(), pair.next(), pair.next()) {
                (Some(Value::Text(key)), Some(entry), None) => {
                    entries.insert(key, entry);
                }
                _ => {
                    return Ok(Correction::uncorrectable(format!(
                        "element {index} is not a [text key, value] pair"
                    )));
                }
            }
        }
        Ok(Correction::Amended(Value::Map(entries)))
    }
}

/// Reject-style element-count window for the sized kinds.
///
/// Sets and mappings have no meaningful truncate-and-pad, so size
/// violations are never corrected. Use
/// [`NormalizeLength`](crate::NormalizeLength) when a sequence should be
/// reshaped instead of rejected.
#[derive(Debug, Clone, Copy)]
pub struct SizeBounds {
    min: Option<usize>,
    max: Option<usize>,
}

impl SizeBounds {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Result<Self, CatalogError> {
        match (min, max) {
            (None, None) => Err(CatalogError::MissingBounds),
            (Some(lo), Some(hi)) if lo > hi => {
                Err(CatalogError::InvertedLengths { min: lo, max: hi })
            }
            _ => Ok(Self { min, max }),
        }
    }

    pub fn at_least(min: usize) -> Result<Self, CatalogError> {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: usize) -> Result<Self, CatalogError> {
        Self::new(None, Some(max))
    }

    fn within(&self, len: usize) -> bool {
        self.min.is_none_or(|lo| len >= lo) && self.max.is_none_or(|hi| len <= hi)
    }
}

impl Amendment for SizeBounds {
    fn identity(&self) -> &'static str {
        "require-size"
    }

    fn check(&self, value: &Value) -> Check {
        match value.len() {
            Some(len) if self.within(len) => Check::Conforms,
            Some(_) => Check::Amendable,
            None => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        let Some(len) = value.len() else {
            anyhow::bail!("correct called outside the sized domain: {value:?}");
        };
        let window = match (self.min, self.max) {
            (Some(lo), Some(hi)) => format!("{lo}..={hi}"),
            (Some(lo), None) => format!("{lo}.."),
            (None, Some(hi)) => format!("..={hi}"),
            // Ruled out by the constructor.
            (None, None) => String::from(".."),
        };
        Ok(Correction::violation(format!(
            "element count {len} is outside the window {window}"
        )))
    }
}

/// The elements iterating this value would produce; `None` outside the
/// iterable kinds.
fn elements_of(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Seq(items) | Value::Set(items) => Some(items),
        Value::Text(s) => Some(s.chars().map(|c| Value::Text(c.to_string())).collect()),
        Value::Binary(bytes) => Some(bytes.into_iter().map(|b| Value::Int(i64::from(b))).collect()),
        Value::Map(entries) => Some(entries.into_keys().map(Value::Text).collect()),
        _ => None,
    }
}
