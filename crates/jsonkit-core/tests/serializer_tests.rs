use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use jsonkit_core::{json_record, serialize, JsonError, Map, Value};

fn object(members: &[(&str, Value)]) -> Value {
    members.iter().cloned().collect()
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn serialize_primitives_in_arrays() {
    let value = Value::Array(vec![
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::Integer(-42),
        Value::Float(3.25),
        Value::String("hi".into()),
    ]);
    assert_eq!(serialize(&value).unwrap(), r#"[null,true,false,-42,3.25,"hi"]"#);
}

#[test]
fn serialize_object_in_insertion_order() {
    let value = object(&[
        ("Name", Value::from("John")),
        ("Age", Value::from(30)),
        ("IsStudent", Value::from(false)),
    ]);
    assert_eq!(
        serialize(&value).unwrap(),
        r#"{"Name":"John","Age":30,"IsStudent":false}"#
    );
}

#[test]
fn serialize_empty_containers() {
    assert_eq!(serialize(&Value::Object(Map::new())).unwrap(), "{}");
    assert_eq!(serialize(&Value::Array(vec![])).unwrap(), "[]");
}

#[test]
fn serialize_nested() {
    let value = object(&[(
        "a",
        Value::Array(vec![object(&[("b", Value::Null)]), Value::Array(vec![])]),
    )]);
    assert_eq!(serialize(&value).unwrap(), r#"{"a":[{"b":null},[]]}"#);
}

#[test]
fn top_level_null_value_is_written() {
    assert_eq!(serialize(&Value::Null).unwrap(), "null");
}

#[test]
fn top_level_none_is_rejected() {
    let absent: Option<Value> = None;
    assert!(matches!(serialize(&absent), Err(JsonError::NullInput)));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn escapes_quote_and_backslash() {
    assert_eq!(serialize("a\"b\\c").unwrap(), r#""a\"b\\c""#);
}

#[test]
fn escapes_whitespace_controls() {
    assert_eq!(
        serialize("\u{8}\u{c}\n\r\t").unwrap(),
        r#""\b\f\n\r\t""#
    );
}

#[test]
fn other_characters_pass_through() {
    assert_eq!(serialize("é/日\u{1f}").unwrap(), "\"é/日\u{1f}\"");
}

#[test]
fn keys_are_escaped() {
    let value = object(&[("say \"hi\"", Value::Integer(1))]);
    assert_eq!(serialize(&value).unwrap(), r#"{"say \"hi\"":1}"#);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn floats_never_look_like_integers() {
    assert_eq!(serialize(&Value::from(vec![30.0, -2.0, 0.0])).unwrap(), "[30.0,-2.0,0.0]");
}

#[test]
fn floats_use_plain_decimal_notation() {
    assert_eq!(serialize(&vec![1e21f64]).unwrap(), "[1000000000000000000000.0]");
    assert_eq!(serialize(&vec![1.5e-7f64]).unwrap(), "[0.00000015]");
}

#[test]
fn integer_extremes() {
    assert_eq!(
        serialize(&vec![i64::MIN, i64::MAX]).unwrap(),
        "[-9223372036854775808,9223372036854775807]"
    );
}

#[test]
fn unsigned_integers_within_i64_are_written() {
    assert_eq!(
        serialize(&vec![0u64, i64::MAX as u64]).unwrap(),
        "[0,9223372036854775807]"
    );
    assert_eq!(serialize(&vec![usize::MIN]).unwrap(), "[0]");
}

#[test]
fn unsigned_integers_beyond_i64_are_unsupported() {
    for n in [i64::MAX as u64 + 1, u64::MAX] {
        let err = serialize(&vec![n]).unwrap_err();
        assert!(matches!(err, JsonError::UnsupportedType(_)), "{err:?}");
    }
}

#[test]
fn non_finite_floats_are_unsupported() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            serialize(&Value::Float(f)),
            Err(JsonError::UnsupportedType(_))
        ));
    }
}

// ============================================================================
// Rust types
// ============================================================================

#[test]
fn serialize_rust_collections() {
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), vec![Some(1u8), None]);
    map.insert("a".to_string(), vec![]);
    assert_eq!(serialize(&map).unwrap(), r#"{"a":[],"b":[1,null]}"#);
    assert_eq!(serialize(&['x', 'y'][..]).unwrap(), r#"["x","y"]"#);
}

#[derive(Debug, Default)]
struct Person {
    name: String,
    age: i32,
    is_student: bool,
}

json_record!(Person {
    "Name" => name,
    "Age" => age,
    "IsStudent" => is_student,
});

#[derive(Debug, Default)]
struct Classroom {
    room: String,
    tutor: Option<Person>,
    students: Vec<Person>,
}

json_record!(Classroom {
    "Room" => room,
    "Tutor" => readonly tutor,
    "Students" => readonly students,
});

fn john() -> Person {
    Person {
        name: "John".into(),
        age: 30,
        is_student: false,
    }
}

#[test]
fn serialize_record_in_registration_order() {
    assert_eq!(
        serialize(&john()).unwrap(),
        r#"{"Name":"John","Age":30,"IsStudent":false}"#
    );
}

#[test]
fn serialize_nested_records() {
    let room = Classroom {
        room: "B12".into(),
        tutor: None,
        students: vec![john(), Person::default()],
    };
    assert_eq!(
        serialize(&room).unwrap(),
        concat!(
            r#"{"Room":"B12","Tutor":null,"Students":["#,
            r#"{"Name":"John","Age":30,"IsStudent":false},"#,
            r#"{"Name":"","Age":0,"IsStudent":false}]}"#
        )
    );
}

// ============================================================================
// Cycles
// ============================================================================

#[derive(Debug, Default)]
struct Node {
    label: String,
    next: Option<Rc<RefCell<Node>>>,
}

json_record!(Node {
    "Label" => label,
    "Next" => readonly next,
});

#[test]
fn self_reference_is_a_circular_reference() {
    let node = Rc::new(RefCell::new(Node {
        label: "loop".into(),
        next: None,
    }));
    node.borrow_mut().next = Some(Rc::clone(&node));

    let err = serialize(&node).unwrap_err();
    assert!(
        matches!(err, JsonError::CircularReference { type_name } if type_name.ends_with("Node")),
        "unexpected error: {err:?}"
    );

    // Break the cycle so the Rc is freed.
    node.borrow_mut().next = None;
}

#[test]
fn longer_cycles_are_detected() {
    let a = Rc::new(RefCell::new(Node {
        label: "a".into(),
        next: None,
    }));
    let b = Rc::new(RefCell::new(Node {
        label: "b".into(),
        next: Some(Rc::clone(&a)),
    }));
    a.borrow_mut().next = Some(Rc::clone(&b));

    assert!(matches!(
        serialize(&a),
        Err(JsonError::CircularReference { .. })
    ));
    a.borrow_mut().next = None;
}

#[test]
fn shared_references_without_a_cycle_serialize() {
    let tail = Rc::new(RefCell::new(Node {
        label: "tail".into(),
        next: None,
    }));
    let list = vec![
        Node {
            label: "x".into(),
            next: Some(Rc::clone(&tail)),
        },
        Node {
            label: "y".into(),
            next: Some(Rc::clone(&tail)),
        },
    ];
    assert_eq!(
        serialize(&list).unwrap(),
        concat!(
            r#"[{"Label":"x","Next":{"Label":"tail","Next":null}},"#,
            r#"{"Label":"y","Next":{"Label":"tail","Next":null}}]"#
        )
    );
}

#[test]
fn each_call_starts_with_a_fresh_guard() {
    let node = Node {
        label: "solo".into(),
        next: None,
    };
    for _ in 0..3 {
        assert_eq!(
            serialize(&node).unwrap(),
            r#"{"Label":"solo","Next":null}"#
        );
    }
}
