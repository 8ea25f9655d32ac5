use std::fmt;
use std::sync::Arc;

use amend_types::{AmendOutcome, Value};

use crate::amendment::Amendment;
use crate::exec::{self, ApplyError};

/// An ordered, immutable sequence of amendments bound to one logical value
/// slot.
///
/// Order is a caller-controlled contract: later steps operate on the output
/// of earlier ones and are written assuming that upstream shape. The engine
/// never reorders, prioritizes, or parallelizes steps.
///
/// A pipeline with zero steps is the identity pipeline. Steps are held
/// behind `Arc`, so cloning a pipeline (or concatenating two) is cheap and
/// a pipeline can be applied concurrently from many threads.
#[derive(Clone, Default)]
pub struct Pipeline {
    slot: Option<String>,
    steps: Vec<Arc<dyn Amendment>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// An identity pipeline bound to a named slot (e.g. a function argument
    /// or config key). The slot name is carried into every outcome so batch
    /// callers can tell failures apart.
    pub fn for_slot(slot: impl Into<String>) -> Self {
        Self {
            slot: Some(slot.into()),
            steps: Vec::new(),
        }
    }

    pub fn from_steps(steps: Vec<Arc<dyn Amendment>>) -> Self {
        Self { slot: None, steps }
    }

    /// Append one amendment. Consumes and returns the pipeline; there is no
    /// way to mutate a pipeline somebody else already holds.
    pub fn then(mut self, step: impl Amendment + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn then_arc(mut self, step: Arc<dyn Amendment>) -> Self {
        self.steps.push(step);
        self
    }

    /// Associative composition: the steps of `other` run after the steps of
    /// `self`. Concatenating with the identity pipeline is a no-op on either
    /// side. The left-hand slot name wins; `other`'s is kept only when
    /// `self` has none.
    pub fn concat(mut self, other: Pipeline) -> Self {
        if self.slot.is_none() {
            self.slot = other.slot;
        }
        self.steps.extend(other.steps);
        self
    }

    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn steps(&self) -> &[Arc<dyn Amendment>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run this pipeline against one value. See [`crate::apply_steps`] for
    /// the execution semantics.
    pub fn apply(&self, value: Value) -> Result<AmendOutcome, ApplyError> {
        exec::apply_steps(self.slot(), &self.steps, value)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identities: Vec<&str> = self.steps.iter().map(|s| s.identity()).collect();
        f.debug_struct("Pipeline")
            .field("slot", &self.slot)
            .field("steps", &identities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amendment::{Check, Correction};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Nudge;

    impl Amendment for Nudge {
        fn identity(&self) -> &'static str {
            "nudge"
        }

        fn check(&self, value: &Value) -> Check {
            match value {
                Value::Int(n) if *n >= 0 => Check::Conforms,
                Value::Int(_) => Check::Amendable,
                _ => Check::Unsupported,
            }
        }

        fn correct(&self, _value: Value) -> anyhow::Result<Correction> {
            Ok(Correction::amended(0i64))
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let outcome = Pipeline::new().apply(Value::from("anything")).expect("apply");
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::from("anything"));
        assert!(outcome.reason.is_none());
    }

    #[test]
    fn concat_appends_in_order_and_keeps_left_slot() {
        let a = Pipeline::for_slot("retries").then(Nudge);
        let b = Pipeline::new().then(Nudge).then(Nudge);

        let combined = a.concat(b);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.slot(), Some("retries"));
    }

    #[test]
    fn concat_with_identity_is_noop_on_both_sides() {
        let p = Pipeline::new().then(Nudge);
        assert_eq!(p.clone().concat(Pipeline::new()).len(), 1);
        assert_eq!(Pipeline::new().concat(p).len(), 1);
    }

    #[test]
    fn concat_adopts_right_slot_when_left_is_unnamed() {
        let combined = Pipeline::new().concat(Pipeline::for_slot("depth"));
        assert_eq!(combined.slot(), Some("depth"));
    }

    #[test]
    fn debug_lists_step_identities() {
        let p = Pipeline::for_slot("n").then(Nudge).then(Nudge);
        let rendered = format!("{p:?}");
        assert!(rendered.contains("nudge"));
        assert!(rendered.contains("\"n\""));
    }
}
