//! Decoder: JSON text to typed value.
//!
//! Decoding dispatches on the target shape and recurses through composite
//! shapes, using the token scanner to split object and array bodies into
//! raw member spans. The first error encountered aborts the entire decode
//! of the enclosing value; there are no partial results.

use std::any::Any;

use crate::error::{CodecResult, Error};
use crate::scan::{scan_array_body, scan_object_body};
use crate::shape::{PointerShape, RecordShape, SequenceShape, Shape, Shaped};

/// Decode JSON text into a caller-provided destination.
///
/// Decoding builds a fresh value and assigns it to `dest` only on success;
/// on any error the destination is left untouched.
pub fn deserialize<T: Shaped>(raw: &str, dest: &mut T) -> CodecResult<()> {
    let shape = T::shape();
    let value = decode_value(raw, &shape)?;
    match value.downcast::<T>() {
        Ok(decoded) => {
            *dest = *decoded;
            Ok(())
        }
        Err(_) => Err(Error::InvalidDestination {
            expected: shape.kind_name(),
        }),
    }
}

/// Decode one raw span against the given shape.
pub(crate) fn decode_value(raw: &str, shape: &Shape) -> CodecResult<Box<dyn Any>> {
    match shape {
        Shape::Int(int) => {
            let parsed: i64 = raw.parse().map_err(|_| Error::NumberFormat {
                text: raw.to_string(),
            })?;
            (int.make)(parsed).ok_or_else(|| Error::NumberFormat {
                text: raw.to_string(),
            })
        }
        Shape::Float(float) => {
            let parsed: f64 = raw.parse().map_err(|_| Error::NumberFormat {
                text: raw.to_string(),
            })?;
            Ok((float.make)(parsed))
        }
        Shape::Bool => match raw {
            "true" => Ok(Box::new(true)),
            "false" => Ok(Box::new(false)),
            _ => Err(Error::BoolFormat {
                text: raw.to_string(),
            }),
        },
        Shape::String => {
            let inner = strip_delimiters(raw)?;
            Ok(Box::new(inner.to_string()))
        }
        Shape::Sequence(sequence) => decode_sequence(raw, sequence),
        Shape::Record(record) => decode_record(raw, record),
        Shape::Pointer(pointer) => decode_pointer(raw, pointer),
        Shape::Unknown => Err(Error::UnsupportedShape),
    }
}

/// Strip exactly one leading and one trailing character. The strip is
/// positional, not delimiter-validated, but bounds and UTF-8 alignment are
/// checked so malformed spans error instead of slicing out of range.
fn strip_delimiters(raw: &str) -> CodecResult<&str> {
    if raw.len() < 2 {
        return Err(Error::Truncated {
            text: raw.to_string(),
        });
    }
    raw.get(1..raw.len() - 1).ok_or_else(|| Error::Truncated {
        text: raw.to_string(),
    })
}

fn decode_sequence(raw: &str, sequence: &SequenceShape) -> CodecResult<Box<dyn Any>> {
    let body = strip_delimiters(raw)?;
    let elements = scan_array_body(body)?;
    let element_shape = (sequence.element)();

    let mut items = Vec::with_capacity(elements.len());
    for element in &elements {
        items.push(decode_value(element, &element_shape)?);
    }
    (sequence.from_items)(items).ok_or(Error::InvalidDestination {
        expected: "sequence element",
    })
}

fn decode_record(raw: &str, record: &RecordShape) -> CodecResult<Box<dyn Any>> {
    let body = strip_delimiters(raw)?;
    let raw_fields = scan_object_body(body)?;

    let mut value = (record.new_value)();
    for field in &record.fields {
        let raw_field = match raw_fields.get(field.name) {
            Some(raw_field) => raw_field,
            // Absent fields keep their zero value.
            None => continue,
        };
        let decoded = decode_value(raw_field, &(field.shape)())?;
        if !(field.set)(value.as_mut(), decoded) {
            return Err(Error::InvalidDestination {
                expected: field.name,
            });
        }
    }
    Ok(value)
}

fn decode_pointer(raw: &str, pointer: &PointerShape) -> CodecResult<Box<dyn Any>> {
    // Unwrap to the innermost non-pointer shape, decode once, then re-wrap
    // through exactly `depth` allocation layers.
    let mut wraps = Vec::with_capacity(pointer.depth);
    wraps.push(pointer.wrap);
    let mut inner = (pointer.inner)();
    while let Shape::Pointer(next) = inner {
        wraps.push(next.wrap);
        inner = (next.inner)();
    }

    let mut value = decode_value(raw, &inner)?;
    for wrap in wraps.into_iter().rev() {
        value = wrap(value).ok_or(Error::InvalidDestination {
            expected: "pointer target",
        })?;
    }
    Ok(value)
}
