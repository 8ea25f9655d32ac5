//! The executor: folds an ordered list of amendments over one value.
//!
//! Execution is synchronous, single-threaded, and allocation-light; the
//! only state is the value being threaded through the steps.

use std::sync::Arc;

use amend_types::{AmendOutcome, FailureKind, FailureReason, StepRef, Value};
use tracing::{debug, warn};

use crate::amendment::{Amendment, Check, Correction};

/// Hard failures out of [`apply`]. These indicate a bug in an amendment
/// implementation, never bad input data; bad input comes back as a
/// non-conforming [`AmendOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("amendment `{identity}` (step {index}) violated its contract: {source:#}")]
    Amendment {
        index: usize,
        identity: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApplyError {
    /// Index of the step whose implementation failed.
    pub fn step_index(&self) -> usize {
        match self {
            ApplyError::Amendment { index, .. } => *index,
        }
    }
}

/// Apply a bare ordered list of amendments to a value.
///
/// A slice is an acceptable lightweight pipeline; callers that want a named
/// slot or reusable composition build a [`Pipeline`](crate::Pipeline) and
/// call [`Pipeline::apply`](crate::Pipeline::apply), which lands here too.
pub fn apply(steps: &[Arc<dyn Amendment>], value: Value) -> Result<AmendOutcome, ApplyError> {
    apply_steps(None, steps, value)
}

/// Apply `steps` in declaration order to `value`, short-circuiting on the
/// first failure.
///
/// For each step: a conformant value passes through untouched; an amendable
/// value is handed to `correct`, whose output feeds the next step; a failed
/// correction (or an unsupported input kind) stops execution immediately and
/// becomes the pipeline's final outcome, pinned to the failing step. The
/// empty list returns the input unchanged and conforming.
pub fn apply_steps(
    slot: Option<&str>,
    steps: &[Arc<dyn Amendment>],
    value: Value,
) -> Result<AmendOutcome, ApplyError> {
    let mut current = value;

    for (index, step) in steps.iter().enumerate() {
        let identity = step.identity();

        match step.check(&current) {
            Check::Conforms => {
                debug!(slot, index, identity, "value already conformant");
                continue;
            }
            Check::Unsupported => {
                warn!(
                    slot,
                    index,
                    identity,
                    kind = %current.kind(),
                    "input kind outside amendment domain; stopping"
                );
                let reason = FailureReason {
                    step: StepRef::new(index, identity),
                    kind: FailureKind::UnsupportedInputKind,
                    actual: Some(current.kind()),
                    detail: None,
                };
                return Ok(attach_slot(AmendOutcome::failed(current, reason), slot));
            }
            Check::Amendable => {}
        }

        let correction = step
            .correct(current.clone())
            .map_err(|source| ApplyError::Amendment {
                index,
                identity,
                source,
            })?;

        match correction {
            Correction::Amended(next) => {
                debug!(slot, index, identity, "value corrected");
                current = next;
            }
            Correction::Failed { kind, detail } => {
                warn!(slot, index, identity, ?kind, "correction failed; stopping");
                let reason = FailureReason {
                    step: StepRef::new(index, identity),
                    kind,
                    actual: Some(current.kind()),
                    detail,
                };
                return Ok(attach_slot(AmendOutcome::failed(current, reason), slot));
            }
        }
    }

    Ok(attach_slot(AmendOutcome::conformant(current), slot))
}

fn attach_slot(outcome: AmendOutcome, slot: Option<&str>) -> AmendOutcome {
    match slot {
        Some(name) => outcome.with_slot(name),
        None => outcome,
    }
}
