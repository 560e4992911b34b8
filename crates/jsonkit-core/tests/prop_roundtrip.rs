/// Property-based roundtrip tests.
///
/// Generates random `Value` trees with an object or array root and checks
/// that `deserialize(serialize(v)) == v`. Floats are finite only; the
/// serializer rejects NaN and the infinities.
use proptest::prelude::*;

use jsonkit_core::{deserialize, deserialize_with, serialize, Map, ParserConfig, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        Just(String::new()),
        Just("with space".to_string()),
        Just("quote\"key".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,24}",
        // Every char except lone surrogates, which Rust strings cannot hold.
        any::<String>(),
        Just("true".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("back\\slash \"quoted\"".to_string()),
        Just("\u{8}\u{c}\n\r\t".to_string()),
        Just("caf\u{e9} \u{4f60}\u{597d} \u{1f600}".to_string()),
    ]
}

fn arb_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        (-1_000_000i64..1_000_000i64, 0u32..6u32)
            .prop_map(|(m, d)| m as f64 / 10f64.powi(d as i32)),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        arb_float().prop_map(Value::Float),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect::<Map>())),
        ]
    })
}

/// Documents must be rooted at an object or an array.
fn arb_document() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(arb_value(), 0..6).prop_map(Value::Array),
        prop::collection::vec((arb_key(), arb_value()), 0..6)
            .prop_map(|members| Value::Object(members.into_iter().collect::<Map>())),
    ]
}

fn contains_null_member(value: &Value) -> bool {
    match value {
        Value::Object(members) => members
            .values()
            .any(|v| v.is_null() || contains_null_member(v)),
        Value::Array(items) => items.iter().any(contains_null_member),
        _ => false,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn value_roundtrip(doc in arb_document()) {
        let text = serialize(&doc).unwrap();
        let back = deserialize(&text);
        prop_assert!(back.is_ok(), "failed to parse our own output: {text}");
        prop_assert_eq!(back.unwrap(), doc);
    }

    #[test]
    fn output_is_stable(doc in arb_document()) {
        let once = serialize(&doc).unwrap();
        let twice = serialize(&deserialize(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dropping_nulls_changes_only_null_members(doc in arb_document()) {
        let text = serialize(&doc).unwrap();
        let config = ParserConfig::default().with_drop_null_members(true);
        let dropped = deserialize_with(&text, &config).unwrap();
        prop_assert!(!contains_null_member(&dropped));
        if !contains_null_member(&doc) {
            prop_assert_eq!(dropped, doc);
        }
    }

    #[test]
    fn parser_never_panics(text in "[\\[\\]{}\",:0-9a-z. \\\\-]{0,40}") {
        let _ = deserialize(&text);
    }
}
