//! End-to-end scenarios through the facade: the standard catalog, custom
//! intents, and the short-circuit behavior argument-parsing callers rely on.

use amend::builtins::{Bounds, CoerceToInt, CoerceToReal, FiniteReal};
use amend::{amend_with, apply, Catalog, Pipeline, Registry, Value};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn non_negative_catalog() -> Catalog {
    Catalog::standard().register(
        "non-negative-integer",
        Pipeline::for_slot("value")
            .then(CoerceToInt::default())
            .then(Bounds::clamp_min(0i64).expect("valid bounds")),
    )
}

#[test]
fn numeric_text_coerces_to_an_integer() {
    let catalog = Catalog::standard();
    let outcome = amend_with(&catalog, "integer", Value::from("42")).expect("amend");
    assert!(outcome.conforms);
    assert_eq!(outcome.value, Value::Int(42));
}

#[test]
fn unparsable_text_reports_uncorrectable() {
    let catalog = Catalog::standard();
    let outcome = amend_with(&catalog, "integer", Value::from("abc")).expect("amend");
    assert!(!outcome.conforms);

    let reason = outcome.reason.expect("reason");
    assert!(reason.kind.is_uncorrectable());
    assert_eq!(reason.step.identity, "coerce-int");
}

#[test]
fn coerce_then_clamp_lifts_negative_text_to_zero() {
    let catalog = non_negative_catalog();
    let outcome =
        amend_with(&catalog, "non-negative-integer", Value::from("-5")).expect("amend");
    assert!(outcome.conforms);
    assert_eq!(outcome.value, Value::Int(0));
    assert_eq!(outcome.slot.as_deref(), Some("value"));
}

#[test]
fn failures_stop_before_later_steps() {
    let catalog = non_negative_catalog();
    let outcome =
        amend_with(&catalog, "non-negative-integer", Value::from("abc")).expect("amend");
    assert!(!outcome.conforms);

    // The failure is pinned to the coercion; the clamp never ran.
    let reason = outcome.reason.expect("reason");
    assert_eq!(reason.step.index, 0);
    assert_eq!(reason.step.identity, "coerce-int");
}

#[test]
fn already_conformant_values_pass_through_every_intent() {
    let catalog = Catalog::standard();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let cases = [
        ("integer", Value::Int(3)),
        ("real-number", Value::Real(1.5)),
        ("text", Value::from("hello")),
        ("date", Value::Date(date)),
    ];

    for (intent, value) in cases {
        let outcome = amend_with(&catalog, intent, value.clone()).expect("amend");
        assert!(outcome.conforms, "{intent} should conform");
        assert_eq!(outcome.value, value, "{intent} must not alter the value");
    }
}

#[test]
fn bare_slices_work_without_a_pipeline_object() {
    let steps: Vec<Arc<dyn amend::Amendment>> = vec![
        Arc::new(CoerceToReal::default()),
        Arc::new(FiniteReal),
    ];

    let outcome = apply(&steps, Value::from("2.75")).expect("apply");
    assert!(outcome.conforms);
    assert_eq!(outcome.value, Value::Real(2.75));

    let outcome = apply(&steps, Value::from("inf")).expect("apply");
    assert!(!outcome.conforms);
    assert_eq!(outcome.reason.expect("reason").step.identity, "finite-real");
}

#[test]
fn outcomes_aggregate_across_slots_without_raising() {
    // The argument-parser pattern: amend every slot, then report all
    // failures at once instead of stopping at the first bad argument.
    let catalog = non_negative_catalog();
    let slots = [
        ("retries", Value::from("3")),
        ("timeout", Value::from("abc")),
        ("depth", Value::from("-2")),
    ];

    let mut failures = Vec::new();
    for (slot, raw) in slots {
        let outcome = amend_with(&catalog, "non-negative-integer", raw)
            .expect("amend")
            .with_slot(slot);
        if !outcome.conforms {
            failures.push(outcome);
        }
    }

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].slot.as_deref(), Some("timeout"));
}

#[test]
fn intent_resolution_composes_with_concat() {
    let catalog = Catalog::standard();
    let to_int = catalog.resolve("integer").expect("resolved");
    let clamped = to_int.concat(
        Pipeline::new().then(Bounds::clamp(0i64, 10i64).expect("valid bounds")),
    );

    let outcome = clamped.apply(Value::from("99")).expect("apply");
    assert!(outcome.conforms);
    assert_eq!(outcome.value, Value::Int(10));
}
