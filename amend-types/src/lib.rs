//! Shared DTOs (schemas-as-code) for the amend workspace.
//!
//! # Design constraints
//! - These types are the data half of the amendment contract: every outcome
//!   a pipeline returns is built from them.
//! - They serialize; batch callers aggregate outcomes across many slots
//!   before reporting, so be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod outcome;
pub mod value;

pub use outcome::{AmendOutcome, FailureKind, FailureReason, StepRef};
pub use value::{Value, ValueKind};
