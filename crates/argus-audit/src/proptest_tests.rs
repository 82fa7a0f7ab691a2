//! Property-based tests for record assembly and rendering.
//!
//! These verify the ordering and masking invariants across many randomly
//! generated field sequences, not just the handful of shapes the wrappers
//! produce.

use proptest::prelude::*;

use crate::field::{Field, FieldValue, SinkSet};
use crate::record::Record;
use crate::transport::{encode_nv, MemoryTransport};

/// Strategy for field names. Names are static identifiers in practice, so
/// sampling from a fixed set is faithful.
fn name_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["arg", "name", "interface", "args", "detail", "zone"])
}

/// Strategy for printable-ASCII values, safe and unsafe alike.
fn value_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

/// Strategy for an arbitrary domain field.
fn field_strategy() -> impl Strategy<Value = Field> {
    (
        name_strategy(),
        value_strategy(),
        any::<bool>(),
        prop_oneof![
            Just(SinkSet::ALL),
            Just(SinkSet::LOG),
            Just(SinkSet::AUDIT)
        ],
    )
        .prop_map(|(name, value, needs_encoding, sinks)| {
            Field::str(name, value, needs_encoding, sinks)
        })
}

fn domain_strategy() -> impl Strategy<Value = Vec<Field>> {
    prop::collection::vec(field_strategy(), 0..6)
}

proptest! {
    #[test]
    fn prop_operation_renders_first(domain in domain_strategy(), result in any::<bool>()) {
        let record = Record::build("test-op", domain, None, result, None);

        let mut log = String::new();
        record.render_log(&mut log);
        prop_assert!(log.starts_with("op=\"test-op\""));

        let mut audit = String::new();
        record.render_audit(&MemoryTransport::new(), &mut audit);
        prop_assert!(audit.starts_with("op=test-op"));
    }

    #[test]
    fn prop_result_field_exactly_once(domain in domain_strategy(), result in any::<bool>()) {
        let record = Record::build("test-op", domain, None, result, None);

        let results: Vec<_> = record
            .fields()
            .iter()
            .filter(|f| f.name() == "result")
            .collect();
        prop_assert_eq!(results.len(), 1);

        let expected = if result { "success" } else { "fail" };
        prop_assert_eq!(results[0].value(), &FieldValue::Str(expected.to_string()));
        prop_assert_eq!(results[0].sinks(), SinkSet::ALL);
    }

    #[test]
    fn prop_reason_only_reaches_log_sink(reason in "[ -~]{1,24}") {
        let record = Record::build("test-op", Vec::new(), None, false, Some(&reason));

        let mut audit = String::new();
        record.render_audit(&MemoryTransport::new(), &mut audit);
        prop_assert_eq!(audit, "op=test-op result=fail");

        let mut log = String::new();
        record.render_log(&mut log);
        prop_assert_eq!(log, format!("op=\"test-op\" result=\"fail\" reason=\"{reason}\""));
    }

    #[test]
    fn prop_needs_encoding_never_leaks_raw_values(value in value_strategy()) {
        let domain = vec![Field::str("arg", value.clone(), true, SinkSet::ALL)];
        let record = Record::build("test-op", domain, None, true, None);

        let mut audit = String::new();
        record.render_audit(&MemoryTransport::new(), &mut audit);

        // The arg fragment sits between the op and result fragments.
        let expected = encode_nv("arg", &value)
            .unwrap_or_else(|| "arg=???".to_string());
        prop_assert_eq!(audit, format!("op=test-op {expected} result=success"));
    }

    #[test]
    fn prop_domain_field_order_preserved(domain in domain_strategy()) {
        let domain_names: Vec<_> = domain.iter().map(Field::name).collect();
        let record = Record::build("test-op", domain, None, true, None);

        let recorded: Vec<_> = record.fields().iter().map(Field::name).collect();
        let mut expected = vec!["op"];
        expected.extend(&domain_names);
        expected.push("result");
        prop_assert_eq!(recorded, expected);
    }

    #[test]
    fn prop_masked_fields_skipped_not_reordered(domain in domain_strategy()) {
        let record = Record::build("test-op", domain, None, true, None);

        let mut audit = String::new();
        record.render_audit(&MemoryTransport::new(), &mut audit);

        // Every audit-masked field contributes exactly one fragment, in
        // record order.
        let expected_count = record
            .fields()
            .iter()
            .filter(|f| f.sinks().contains(crate::field::Sink::Audit))
            .count();
        prop_assert_eq!(audit.split(' ').count(), expected_count + count_value_spaces(&record));
    }
}

/// Spaces inside unencoded string values also split the rendered text, so
/// the fragment count has to account for them.
fn count_value_spaces(record: &Record) -> usize {
    record
        .fields()
        .iter()
        .filter(|f| f.sinks().contains(crate::field::Sink::Audit))
        .filter(|f| !f.needs_encoding())
        .map(|f| match f.value() {
            FieldValue::Str(s) => s.matches(' ').count(),
            FieldValue::U64(_) => 0,
        })
        .sum()
}
