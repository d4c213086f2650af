//! Encoder: typed value to JSON text.
//!
//! Encoding is total: every supported shape renders to text, and any
//! unsupported shape or shape/value disagreement degrades to the sentinel
//! literal `unknown` for that position instead of failing. Strings are
//! wrapped in quotes without internal escaping, a documented limitation of
//! the minimal grammar.

use std::any::Any;

use crate::shape::{RecordShape, SequenceShape, Shape, Shaped};

/// Sentinel literal emitted for unsupported shapes and mismatched values.
pub const UNKNOWN: &str = "unknown";

/// Encode a value to JSON text. Never fails.
pub fn serialize<T: Shaped>(value: &T) -> String {
    let mut out = String::new();
    encode_value(value, &T::shape(), &mut out);
    out
}

/// Encode one value of the given shape, appending to the output buffer.
pub(crate) fn encode_value(value: &dyn Any, shape: &Shape, out: &mut String) {
    match shape {
        Shape::Int(int) => match (int.render)(value) {
            Some(text) => out.push_str(&text),
            None => out.push_str(UNKNOWN),
        },
        Shape::Float(float) => match (float.render)(value) {
            Some(text) => out.push_str(&text),
            None => out.push_str(UNKNOWN),
        },
        Shape::Bool => match value.downcast_ref::<bool>() {
            Some(true) => out.push_str("true"),
            Some(false) => out.push_str("false"),
            None => out.push_str(UNKNOWN),
        },
        Shape::String => match value.downcast_ref::<String>() {
            Some(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            None => out.push_str(UNKNOWN),
        },
        Shape::Sequence(sequence) => encode_sequence(value, sequence, out),
        Shape::Record(record) => encode_record(value, record, out),
        Shape::Pointer(pointer) => match (pointer.deref)(value) {
            Some(pointee) => encode_value(pointee, &(pointer.inner)(), out),
            None => out.push_str(UNKNOWN),
        },
        Shape::Unknown => out.push_str(UNKNOWN),
    }
}

fn encode_sequence(value: &dyn Any, sequence: &SequenceShape, out: &mut String) {
    let len = match (sequence.length)(value) {
        Some(len) => len,
        None => {
            out.push_str(UNKNOWN);
            return;
        }
    };
    let element = (sequence.element)();

    out.push('[');
    for index in 0..len {
        if index > 0 {
            out.push(',');
        }
        match (sequence.item)(value, index) {
            Some(item) => encode_value(item, &element, out),
            None => out.push_str(UNKNOWN),
        }
    }
    out.push(']');
}

fn encode_record(value: &dyn Any, record: &RecordShape, out: &mut String) {
    out.push('{');
    // Fields in declaration order, never omitted.
    for (index, field) in record.fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(field.name);
        out.push_str("\":");
        match (field.get)(value) {
            Some(field_value) => encode_value(field_value, &(field.shape)(), out),
            None => out.push_str(UNKNOWN),
        }
    }
    out.push('}');
}
