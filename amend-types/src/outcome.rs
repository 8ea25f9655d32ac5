use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

/// Final result of applying a pipeline (or a single amendment) to a value.
///
/// A non-conforming outcome is ordinary data, not an error: argument-parsing
/// and config-loading callers collect one per slot and report them together.
/// Hard failures (a buggy amendment) never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmendOutcome {
    pub conforms: bool,

    /// The value to pass downstream. On failure this is the last value the
    /// pipeline produced *before* the failing step; nothing from a failed
    /// correction leaks out.
    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

impl AmendOutcome {
    /// Invariant: `reason` is set iff `conforms` is false. These two
    /// constructors are the only way the workspace builds outcomes.
    pub fn conformant(value: Value) -> Self {
        Self {
            conforms: true,
            value,
            reason: None,
            slot: None,
        }
    }

    pub fn failed(value: Value, reason: FailureReason) -> Self {
        Self {
            conforms: false,
            value,
            reason: Some(reason),
            slot: None,
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    pub fn is_conformant(&self) -> bool {
        self.conforms
    }

    /// Unwrap into the conforming value, or the structured reason.
    pub fn into_result(self) -> Result<Value, FailureReason> {
        match self.reason {
            None => Ok(self.value),
            Some(reason) => Err(reason),
        }
    }
}

/// Why a pipeline stopped, pinned to the step that stopped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReason {
    pub step: StepRef,
    pub kind: FailureKind,

    /// Kind of the value the failing step was handed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<ValueKind>,

    /// Human supplement; the structured fields above are the contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Position and identity of one step within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRef {
    pub index: usize,
    pub identity: String,
}

impl StepRef {
    pub fn new(index: usize, identity: impl Into<String>) -> Self {
        Self {
            index,
            identity: identity.into(),
        }
    }
}

/// Failure classes for expected, data-driven amendment failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No deterministic correction exists for this input.
    Uncorrectable,
    /// The value's kind is outside the domain the step declares support for.
    UnsupportedInputKind,
    /// The value is the right kind but breaks a constraint the step was
    /// configured to reject rather than correct.
    ValueViolation,
}

impl FailureKind {
    pub fn is_uncorrectable(self) -> bool {
        matches!(self, FailureKind::Uncorrectable)
    }
    pub fn is_unsupported_input_kind(self) -> bool {
        matches!(self, FailureKind::UnsupportedInputKind)
    }
    pub fn is_value_violation(self) -> bool {
        matches!(self, FailureKind::ValueViolation)
    }
}
