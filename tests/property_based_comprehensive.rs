//! Property-based tests for the call-tree engine
//!
//! Core properties covered:
//! 1. Severity classification is total and monotonic
//! 2. Percentages never divide by zero
//! 3. Threshold filtering is strict and order-preserving
//! 4. Node ids survive a display/parse cycle
//! 5. Arbitrary JSON never panics the record parser

use arbol::duration::DurationValue;
use arbol::filter::{is_visible, ThresholdFilter};
use arbol::node::{CallNode, NodeId};
use arbol::parser::CallTreeParser;
use arbol::percentage::{percent_of, share_of};
use arbol::record::CallRecord;
use arbol::severity::{classify, BucketSet};
use proptest::prelude::*;

fn bucket_set() -> impl Strategy<Value = BucketSet> {
    prop_oneof![Just(BucketSet::Duration), Just(BucketSet::Percentage)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_classify_is_monotonic(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
        buckets in bucket_set(),
    ) {
        // Property: a larger magnitude never lands in a faster bucket
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(low, buckets) <= classify(high, buckets));
    }

    #[test]
    fn prop_classify_is_total(magnitude in any::<f64>(), buckets in bucket_set()) {
        // Property: every magnitude, NaN included, maps to some bucket
        let _ = classify(magnitude, buckets);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_percent_without_reference_is_none(
        duration in 0.0f64..1.0e6,
        reference in -1.0e6f64..=0.0,
    ) {
        let d = DurationValue::from_millis(duration);
        let r = DurationValue::from_millis(reference);
        prop_assert!(percent_of(&d, &r).is_none());
        prop_assert!(share_of(&d, &r).is_none());
    }

    #[test]
    fn prop_percent_has_one_decimal(
        duration in 0.0f64..1.0e4,
        reference in 1.0f64..1.0e4,
    ) {
        let d = DurationValue::from_millis(duration);
        let r = DurationValue::from_millis(reference);
        let value = percent_of(&d, &r).unwrap();
        prop_assert!(value >= 0.0);
        prop_assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-6);
        if duration <= reference {
            prop_assert!(value <= 100.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_filter_is_strict(
        millis in prop::collection::vec(0u32..2000, 0..30),
        cutoff in 0u32..2000,
    ) {
        let nodes: Vec<CallNode> = millis
            .iter()
            .enumerate()
            .map(|(i, ms)| CallNode {
                id: NodeId::root(i as u64 + 1),
                name: format!("call{}()", i),
                duration: DurationValue::from_millis(f64::from(*ms)),
                has_children: false,
            })
            .collect();

        let filter = ThresholdFilter::new(f64::from(cutoff), 0.0);
        let kept = filter.retain(nodes);

        // Property: exactly the strictly-slower calls survive, in order
        let expected: Vec<u64> = millis
            .iter()
            .enumerate()
            .filter(|(_, ms)| **ms > cutoff)
            .map(|(i, _)| i as u64 + 1)
            .collect();
        let actual: Vec<u64> = kept.iter().map(|n| n.id.line()).collect();
        prop_assert_eq!(actual, expected);
        for node in &kept {
            prop_assert!(is_visible(&node.duration, f64::from(cutoff)));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_node_id_display_parses_back(
        line in 1u64..100_000,
        path in prop::collection::vec(0usize..500, 0..8),
    ) {
        let mut id = NodeId::root(line);
        for index in &path {
            id = id.child(*index);
        }
        let parsed: NodeId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed.depth(), path.len());
        prop_assert_eq!(parsed, id);
    }

    #[test]
    fn prop_parse_record_never_panics(
        name in "[A-Za-z.()]{0,12}",
        duration in "[0-9a-z.]{0,8}",
        extra in proptest::option::of("[a-z]{1,6}"),
    ) {
        let mut json = serde_json::Map::new();
        json.insert(name.clone(), serde_json::Value::String(duration.clone()));
        if let Some(key) = extra {
            json.insert(key, serde_json::Value::from(3));
        }
        if let Ok(record) = serde_json::from_value::<CallRecord>(serde_json::Value::Object(json)) {
            if let Ok(node) = CallTreeParser::parse_record(&record, NodeId::root(1)) {
                prop_assert!(!node.has_children);
            }
        }
    }
}
