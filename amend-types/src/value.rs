use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8PathBuf;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// The tagged union every pipeline operates on.
///
/// The source of truth for "what kind of value is this" is the variant tag,
/// resolved when the value is built, never re-guessed per call. `Set` is
/// backed by a `Vec` whose no-duplicates invariant is maintained by the set
/// amendments; this keeps iteration order deterministic. `Map` keys iterate
/// in key order for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    Binary(Vec<u8>),
    Seq(Vec<Value>),
    Set(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    #[serde(with = "offset_serde")]
    Offset(TimeDelta),
    Path(Utf8PathBuf),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
            Value::Binary(_) => ValueKind::Binary,
            Value::Seq(_) => ValueKind::Seq,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Offset(_) => ValueKind::Offset,
            Value::Path(_) => ValueKind::Path,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Element count for the sized kinds; `None` for scalars.
    ///
    /// Text length is counted in characters, not bytes, matching how the
    /// length amendments truncate and pad.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::Binary(b) => Some(b.len()),
            Value::Seq(items) | Value::Set(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Offset(v)
    }
}

impl From<Utf8PathBuf> for Value {
    fn from(v: Utf8PathBuf) -> Self {
        Value::Path(v)
    }
}

/// Fieldless twin of [`Value`], used wherever only the tag matters
/// (failure reasons, bound-endpoint agreement checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Real,
    Text,
    Binary,
    Seq,
    Set,
    Map,
    Date,
    Time,
    DateTime,
    Offset,
    Path,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Binary => "binary",
            ValueKind::Seq => "seq",
            ValueKind::Set => "set",
            ValueKind::Map => "map",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "date_time",
            ValueKind::Offset => "offset",
            ValueKind::Path => "path",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// chrono's `TimeDelta` has no serde support; serialize as whole seconds
/// plus a signed nanosecond remainder so negative offsets survive.
mod offset_serde {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Repr {
        secs: i64,
        nanos: i32,
    }

    pub fn serialize<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Repr {
            secs: delta.num_seconds(),
            nanos: delta.subsec_nanos(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = Repr::deserialize(deserializer)?;
        TimeDelta::try_seconds(repr.secs)
            .and_then(|secs| secs.checked_add(&TimeDelta::nanoseconds(i64::from(repr.nanos))))
            .ok_or_else(|| serde::de::Error::custom("temporal offset out of range"))
    }
}
