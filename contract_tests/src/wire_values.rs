//! Wire value contract tests
//!
//! The JSON form of every wire shape. Both sides encode and decode these
//! independently.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use editor_core::ReplaceGranularity;
    use wire_codec::{encode, Number, WireValue};

    #[test]
    fn test_scalar_shapes() {
        assert_golden(&WireValue::Null, r#"{ "shape": "null" }"#);
        assert_golden(&WireValue::Bool(true), r#"{ "shape": "bool", "value": true }"#);
        assert_golden(
            &WireValue::Text("abc".into()),
            r#"{ "shape": "text", "value": "abc" }"#,
        );
    }

    #[test]
    fn test_numbers_carry_their_width() {
        assert_golden(
            &WireValue::Number(Number::I32(-7)),
            r#"{ "shape": "number", "value": { "kind": "i32", "value": -7 } }"#,
        );
        assert_golden(
            &WireValue::Number(Number::U64(42)),
            r#"{ "shape": "number", "value": { "kind": "u64", "value": 42 } }"#,
        );
        assert_golden(
            &WireValue::Number(Number::F64(0.5)),
            r#"{ "shape": "number", "value": { "kind": "f64", "value": 0.5 } }"#,
        );
    }

    #[test]
    fn test_non_finite_floats_are_text() {
        assert_golden(
            &WireValue::Number(Number::F64(f64::INFINITY)),
            r#"{ "shape": "number", "value": { "kind": "f64", "value": "Infinity" } }"#,
        );
        assert_golden(
            &WireValue::Number(Number::F32(f32::NEG_INFINITY)),
            r#"{ "shape": "number", "value": { "kind": "f32", "value": "-Infinity" } }"#,
        );
        assert_golden(
            &WireValue::Number(Number::F64(f64::NAN)),
            r#"{ "shape": "number", "value": { "kind": "f64", "value": "NaN" } }"#,
        );
    }

    #[test]
    fn test_list_and_nullable() {
        assert_golden(
            &encode(&vec![Some(1i32), None]),
            r#"{
                "shape": "list",
                "value": [
                    { "shape": "number", "value": { "kind": "i32", "value": 1 } },
                    { "shape": "null" }
                ]
            }"#,
        );
    }

    #[test]
    fn test_enumerations_are_string_tags() {
        assert_golden(
            &encode(&ReplaceGranularity::WholeDocument),
            r#"{ "shape": "text", "value": "wholeDocument" }"#,
        );
        assert_golden(
            &encode(&ReplaceGranularity::Line),
            r#"{ "shape": "text", "value": "line" }"#,
        );
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        assert!(serde_json::from_str::<WireValue>(r#"{"shape":"tuple","value":[]}"#).is_err());
    }
}
