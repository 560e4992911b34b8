use std::io::{self, Cursor, Read, Write};

use jsonkit_core::{
    deserialize_from_reader, deserialize_typed_from_reader, json_record, serialize_to_writer,
    JsonError, Value,
};

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: i32,
}

json_record!(Person {
    "Name" => name,
    "Age" => age,
});

#[test]
fn write_value_to_vec() {
    let value: Value = [("Name", Value::from("John")), ("Age", Value::from(30))]
        .into_iter()
        .collect();
    let mut sink = Vec::new();
    serialize_to_writer(&value, &mut sink).unwrap();
    assert_eq!(sink, br#"{"Name":"John","Age":30}"#);
}

#[test]
fn sink_stays_usable_after_writing() {
    let mut sink = Cursor::new(Vec::new());
    serialize_to_writer(&vec![1, 2], &mut sink).unwrap();
    sink.write_all(b"\n").unwrap();
    serialize_to_writer(&vec![3], &mut sink).unwrap();
    assert_eq!(sink.into_inner(), b"[1,2]\n[3]");
}

#[test]
fn non_ascii_is_written_as_utf8() {
    let mut sink = Vec::new();
    serialize_to_writer(&vec!["日本"], &mut sink).unwrap();
    assert_eq!(String::from_utf8(sink).unwrap(), r#"["日本"]"#);
}

#[test]
fn serialization_errors_write_nothing() {
    let mut sink = Vec::new();
    let err = serialize_to_writer(&vec![f64::NAN], &mut sink).unwrap_err();
    assert!(matches!(err, JsonError::UnsupportedType(_)));
    assert!(sink.is_empty());
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failures_are_io_errors() {
    let err = serialize_to_writer(&vec![1], &mut BrokenSink).unwrap_err();
    assert!(matches!(err, JsonError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn read_value_from_cursor() {
    let mut source = Cursor::new(br#"{"a":[true,null]}"#.to_vec());
    let value = deserialize_from_reader(&mut source).unwrap();
    assert_eq!(
        value.get("a"),
        Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
    );
}

#[test]
fn read_record_from_bytes() {
    let mut source: &[u8] = br#"{"Name":"Ann","Age":52}"#;
    let person: Person = deserialize_typed_from_reader(&mut source).unwrap();
    assert_eq!(
        person,
        Person {
            name: "Ann".into(),
            age: 52
        }
    );
}

#[test]
fn invalid_utf8_is_rejected() {
    let mut source: &[u8] = b"[\"\xff\"]";
    let err = deserialize_from_reader(&mut source).unwrap_err();
    assert!(matches!(err, JsonError::Utf8(_)));
}

#[test]
fn empty_stream_is_an_input_error() {
    let mut source = io::empty();
    assert!(matches!(
        deserialize_from_reader(&mut source),
        Err(JsonError::Input(_))
    ));
}

struct FailingSource;

impl Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk gone"))
    }
}

#[test]
fn read_failures_are_io_errors() {
    assert!(matches!(
        deserialize_from_reader(&mut FailingSource),
        Err(JsonError::Io(_))
    ));
}

#[test]
fn parse_errors_surface_unchanged() {
    let mut source: &[u8] = b"[1,]";
    let err = deserialize_from_reader(&mut source).unwrap_err();
    assert_eq!(err.as_parse().map(|p| p.offset), Some(3));
}
