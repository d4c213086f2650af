//! Codec conformance tests.
//!
//! Round-trip and behavioral properties of the codec, plus differential
//! tests comparing encoder output against serde_json on types that derive
//! both descriptions. serde_json is the test oracle only; the codec itself
//! never touches it.

use jsonshape::{
    deserialize, record_shape, scan_object_body, serialize, Error, ScanState, Shape, Shaped,
};
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Serialize)]
struct User {
    name: String,
    age: i64,
}

record_shape! { User { name: String, age: i64 } }

#[derive(Debug, Default, PartialEq, Serialize)]
struct Class {
    name: String,
    students: Vec<Box<User>>,
}

record_shape! { Class { name: String, students: Vec<Box<User>> } }

#[derive(Debug, Default, PartialEq, Serialize)]
struct Renamed {
    #[serde(rename = "userName")]
    user_name: String,
}

record_shape! { Renamed { user_name: String => "userName" } }

fn sample_class() -> Class {
    Class {
        name: "Math".to_string(),
        students: vec![
            Box::new(User {
                name: "John".to_string(),
                age: 30,
            }),
            Box::new(User {
                name: "Doe".to_string(),
                age: 25,
            }),
        ],
    }
}

fn oracle<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

// ============================================================================
// Differential: encoder output matches serde_json
// ============================================================================

#[test]
fn encode_integer_matches_oracle() {
    assert_eq!(serialize(&1i64), oracle(&1i64));
    assert_eq!(serialize(&-42i64), oracle(&-42i64));
    assert_eq!(serialize(&0u32), oracle(&0u32));
}

#[test]
fn encode_float_matches_oracle() {
    assert_eq!(serialize(&1.5f64), oracle(&1.5f64));
    assert_eq!(serialize(&-2.75f64), oracle(&-2.75f64));
    assert_eq!(serialize(&1.5f32), oracle(&1.5f32));
}

#[test]
fn encode_bool_matches_oracle() {
    assert_eq!(serialize(&true), oracle(&true));
    assert_eq!(serialize(&false), oracle(&false));
}

#[test]
fn encode_string_matches_oracle() {
    assert_eq!(serialize(&"hello".to_string()), oracle(&"hello".to_string()));
}

#[test]
fn encode_sequence_matches_oracle() {
    let values = vec![1i64, 2, 3];
    assert_eq!(serialize(&values), oracle(&values));
    assert_eq!(serialize(&Vec::<i64>::new()), oracle(&Vec::<i64>::new()));
}

#[test]
fn encode_record_matches_oracle() {
    let user = User {
        name: "John".to_string(),
        age: 30,
    };
    assert_eq!(serialize(&user), oracle(&user));
}

#[test]
fn encode_record_with_zero_field_matches_oracle() {
    let user = User {
        name: "John".to_string(),
        age: 0,
    };
    assert_eq!(serialize(&user), oracle(&user));
}

#[test]
fn encode_pointer_matches_oracle() {
    let boxed = Box::new(User {
        name: "John".to_string(),
        age: 30,
    });
    assert_eq!(serialize(&boxed), oracle(&boxed));
}

#[test]
fn encode_nested_document_matches_oracle() {
    let class = sample_class();
    assert_eq!(serialize(&class), oracle(&class));
}

#[test]
fn encode_renamed_field_matches_oracle() {
    let value = Renamed {
        user_name: "John".to_string(),
    };
    assert_eq!(serialize(&value), oracle(&value));
    assert_eq!(serialize(&value), r#"{"userName":"John"}"#);
}

// ============================================================================
// Round-trip: decode(encode(v)) == v
// ============================================================================

#[test]
fn roundtrip_int() {
    let mut dest = 0i64;
    deserialize(&serialize(&123i64), &mut dest).unwrap();
    assert_eq!(dest, 123);
}

#[test]
fn roundtrip_floats() {
    let mut single = 0f32;
    deserialize(&serialize(&1.5f32), &mut single).unwrap();
    assert_eq!(single, 1.5);

    let mut double = 0f64;
    deserialize(&serialize(&-2.75f64), &mut double).unwrap();
    assert_eq!(double, -2.75);
}

#[test]
fn roundtrip_bool() {
    let mut dest = false;
    deserialize(&serialize(&true), &mut dest).unwrap();
    assert!(dest);
}

#[test]
fn roundtrip_string() {
    let mut dest = String::new();
    deserialize(&serialize(&"hello".to_string()), &mut dest).unwrap();
    assert_eq!(dest, "hello");
}

#[test]
fn roundtrip_sequence_of_scalars() {
    let values = vec![1i64, 2, 3];
    let mut dest: Vec<i64> = Vec::new();
    deserialize(&serialize(&values), &mut dest).unwrap();
    assert_eq!(dest, values);
}

#[test]
fn roundtrip_record_with_nested_record_and_sequence() {
    let class = sample_class();
    let mut dest = Class::default();
    deserialize(&serialize(&class), &mut dest).unwrap();
    assert_eq!(dest, class);
}

#[test]
fn roundtrip_pointer_depth_one_and_two() {
    let mut one: Box<i64> = Box::new(0);
    deserialize(&serialize(&Box::new(7i64)), &mut one).unwrap();
    assert_eq!(*one, 7);

    let mut two: Box<Box<i64>> = Box::new(Box::new(0));
    deserialize(&serialize(&Box::new(Box::new(7i64))), &mut two).unwrap();
    assert_eq!(**two, 7);
}

// ============================================================================
// Decode behavior
// ============================================================================

#[test]
fn missing_field_keeps_zero_value() {
    let mut dest = User::default();
    deserialize(r#"{"name":"John"}"#, &mut dest).unwrap();
    assert_eq!(dest.name, "John");
    assert_eq!(dest.age, 0);
}

#[test]
fn object_field_order_is_irrelevant() {
    let mut a = User::default();
    let mut b = User::default();
    deserialize(r#"{"age":30,"name":"John"}"#, &mut a).unwrap();
    deserialize(r#"{"name":"John","age":30}"#, &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn array_element_order_is_significant() {
    let mut a: Vec<i64> = Vec::new();
    let mut b: Vec<i64> = Vec::new();
    deserialize("[1,2,3]", &mut a).unwrap();
    deserialize("[3,2,1]", &mut b).unwrap();
    assert_ne!(a, b);
}

#[test]
fn whitespace_tolerant_object_decode() {
    let mut spaced = User::default();
    let mut compact = User::default();
    deserialize(r#"{"age": 30,  "name": "John"}"#, &mut spaced).unwrap();
    deserialize(r#"{"age":30,"name":"John"}"#, &mut compact).unwrap();
    assert_eq!(spaced, compact);
}

#[test]
fn nested_document_decodes_fully() {
    let raw = r#"{"name":"Math","students":[{"name":"John","age":30},{"name":"Doe","age":25}]}"#;
    let mut dest = Class::default();
    deserialize(raw, &mut dest).unwrap();
    assert_eq!(dest, sample_class());
}

#[test]
fn final_single_char_value_bounded_at_end_of_input() {
    let mut dest = User::default();
    deserialize(r#"{"name":"John","age":3}"#, &mut dest).unwrap();
    assert_eq!(dest.age, 3);
}

#[test]
fn renamed_field_decodes_by_external_name() {
    let mut dest = Renamed::default();
    deserialize(r#"{"userName":"John"}"#, &mut dest).unwrap();
    assert_eq!(dest.user_name, "John");

    // The internal identifier is not recognized.
    let mut other = Renamed::default();
    deserialize(r#"{"user_name":"John"}"#, &mut other).unwrap();
    assert_eq!(other.user_name, "");
}

// ============================================================================
// Failure paths
// ============================================================================

#[test]
fn scan_failure_names_state() {
    let err = scan_object_body("age:30").unwrap_err();
    assert_eq!(
        err,
        Error::Scan {
            state: ScanState::AwaitFieldNameQuote,
            ch: 'a',
        }
    );
}

#[test]
fn number_failure_names_span() {
    let mut dest = 0i64;
    assert_eq!(
        deserialize("abc", &mut dest),
        Err(Error::NumberFormat {
            text: "abc".to_string(),
        })
    );
}

#[test]
fn bool_failure_names_span() {
    let mut dest = false;
    assert_eq!(
        deserialize("TRUE", &mut dest),
        Err(Error::BoolFormat {
            text: "TRUE".to_string(),
        })
    );
}

#[test]
fn malformed_nested_field_aborts_whole_decode() {
    let mut dest = Class::default();
    let raw = r#"{"name":"Math","students":[{"name":"John","age":x}]}"#;
    assert_eq!(
        deserialize(raw, &mut dest),
        Err(Error::NumberFormat {
            text: "x".to_string(),
        })
    );
    // No partial result was written back.
    assert_eq!(dest, Class::default());
}

#[test]
fn unsupported_shape_encodes_sentinel_and_fails_decode() {
    #[derive(Default)]
    struct Opaque;
    impl Shaped for Opaque {
        fn shape() -> Shape {
            Shape::Unknown
        }
    }

    assert_eq!(serialize(&Opaque), "unknown");

    let mut dest = Opaque;
    assert_eq!(deserialize("1", &mut dest), Err(Error::UnsupportedShape));
}

// ============================================================================
// Shape metadata
// ============================================================================

#[test]
fn pointer_shapes_report_folded_depth() {
    assert_eq!(<Box<i64>>::shape().pointer_depth(), Some(1));
    assert_eq!(<Box<Box<i64>>>::shape().pointer_depth(), Some(2));
    assert_eq!(<Vec<i64>>::shape().pointer_depth(), None);
}
