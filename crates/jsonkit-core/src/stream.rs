//! Byte-stream adapters around the serializer and parser.
//!
//! The sink is borrowed for the duration of the call and left open; the
//! caller keeps ownership.

use std::io::{BufWriter, Read, Write};

use crate::error::Result;
use crate::mapper::from_value;
use crate::parser::deserialize;
use crate::property::Record;
use crate::serializer::{serialize, ToJson};
use crate::value::Value;

/// Serialize `value` and write it to `writer` as UTF-8.
pub fn serialize_to_writer<T, W>(value: &T, writer: &mut W) -> Result<()>
where
    T: ToJson + ?Sized,
    W: Write + ?Sized,
{
    let text = serialize(value)?;
    let mut buffered = BufWriter::new(writer);
    buffered.write_all(text.as_bytes())?;
    buffered.flush()?;
    Ok(())
}

/// Read `reader` to the end and parse the bytes as UTF-8 JSON.
pub fn deserialize_from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Value> {
    let text = read_text(reader)?;
    deserialize(&text)
}

/// Read `reader` to the end and bind the document to a new `T`.
pub fn deserialize_typed_from_reader<T: Record, R: Read + ?Sized>(reader: &mut R) -> Result<T> {
    let value = deserialize_from_reader(reader)?;
    from_value(&value)
}

fn read_text<R: Read + ?Sized>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}
