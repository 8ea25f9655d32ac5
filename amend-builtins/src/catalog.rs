use std::collections::BTreeMap;

use amend_engine::{Pipeline, Registry};

use crate::containers::{CoerceToMap, CoerceToSeq, CoerceToSet};
use crate::numbers::{CoerceToInt, CoerceToReal};
use crate::paths::{CoerceToPath, NormalizePath};
use crate::temporals::{CoerceToDate, CoerceToDateTime, CoerceToOffset, CoerceToTime};
use crate::text::{CoerceToBinary, CoerceToText};

/// Explicitly constructed registry of intent descriptors.
///
/// Built once (usually at process start), then used read-only as a
/// `&dyn Registry`; there is no global instance and no hidden mutation.
/// Registering an intent that already exists replaces it, so embedders can
/// shadow a standard entry with their own pipeline.
#[derive(Debug, Clone)]
pub struct Catalog {
    intents: BTreeMap<String, Pipeline>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            intents: BTreeMap::new(),
        }
    }

    /// The standard catalog: one intent per built-in value kind, named after
    /// what the caller declares, not how it is realized.
    pub fn standard() -> Self {
        Self::empty()
            .register("integer", Pipeline::new().then(CoerceToInt::default()))
            .register("real-number", Pipeline::new().then(CoerceToReal::default()))
            .register("text", Pipeline::new().then(CoerceToText::default()))
            .register("binary", Pipeline::new().then(CoerceToBinary::default()))
            .register("sequence", Pipeline::new().then(CoerceToSeq))
            .register("data-set", Pipeline::new().then(CoerceToSet))
            .register("mapping", Pipeline::new().then(CoerceToMap))
            .register("date", Pipeline::new().then(CoerceToDate::default()))
            .register("time", Pipeline::new().then(CoerceToTime::default()))
            .register(
                "date-and-time",
                Pipeline::new().then(CoerceToDateTime::default()),
            )
            .register(
                "temporal-offset",
                Pipeline::new().then(CoerceToOffset::default()),
            )
            .register(
                "path",
                Pipeline::new()
                    .then(CoerceToPath::default())
                    .then(NormalizePath),
            )
    }

    pub fn register(mut self, intent: impl Into<String>, pipeline: Pipeline) -> Self {
        self.intents.insert(intent.into(), pipeline);
        self
    }

    /// Registered descriptors, in sorted order.
    pub fn intents(&self) -> impl Iterator<Item = &str> {
        self.intents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry for Catalog {
    fn resolve(&self, intent: &str) -> Option<Pipeline> {
        self.intents.get(intent).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_types::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_catalog_covers_the_builtin_intents() {
        let catalog = Catalog::standard();
        for intent in [
            "integer",
            "real-number",
            "text",
            "binary",
            "sequence",
            "data-set",
            "mapping",
            "date",
            "time",
            "date-and-time",
            "temporal-offset",
            "path",
        ] {
            assert!(catalog.resolve(intent).is_some(), "missing intent {intent}");
        }
        assert!(catalog.resolve("no-such-intent").is_none());
    }

    #[test]
    fn intents_enumerate_sorted() {
        let catalog = Catalog::empty()
            .register("zeta", Pipeline::new())
            .register("alpha", Pipeline::new());
        let names: Vec<&str> = catalog.intents().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn re_registering_replaces_the_pipeline() {
        let catalog = Catalog::empty()
            .register("integer", Pipeline::new().then(CoerceToInt::default()))
            .register("integer", Pipeline::new());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.resolve("integer").expect("resolved").is_empty());
    }

    #[test]
    fn resolved_pipelines_run_their_intent() {
        let catalog = Catalog::standard();
        let pipeline = catalog.resolve("integer").expect("resolved");
        let outcome = pipeline.apply(Value::from("42")).expect("apply");
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::Int(42));
    }

    #[test]
    fn resolution_is_deterministic() {
        let catalog = Catalog::standard();
        let a = catalog.resolve("path").expect("resolved");
        let b = catalog.resolve("path").expect("resolved");
        let outcome_a = a.apply(Value::from("a//b/./c")).expect("apply");
        let outcome_b = b.apply(Value::from("a//b/./c")).expect("apply");
        assert_eq!(outcome_a, outcome_b);
    }
}
