//! Shape descriptors: the codec's reflection substitute.
//!
//! A [`Shape`] classifies a value or target type as one of the kinds the
//! codec understands: intlike scalar, float scalar, boolean, string,
//! sequence, record, pointer-of-N-depth, or unknown. Because Rust has no
//! runtime type inspection, each composite shape carries a small capability
//! table of plain function pointers through which the codec reads and builds
//! concrete values behind `&dyn Any` without knowing their types.
//!
//! Shapes are produced by the [`Shaped`] trait, implemented once per
//! concrete type: scalar impls are macro-generated, `Vec<T>` and `Box<T>`
//! have generic impls, and user structs get theirs from the
//! [`record_shape!`](crate::record_shape) macro. A shape is recomputed on
//! demand via `fn() -> Shape` thunks rather than cached, so there is no
//! shared mutable state between concurrent codec calls.

use std::any::Any;

/// Renders the concrete scalar behind a value, or `None` on a type mismatch.
pub type RenderFn = fn(&dyn Any) -> Option<String>;

/// Produces a shape on demand. Thunks keep shape construction lazy so that
/// composite shapes only expand one level per codec call.
pub type ShapeFn = fn() -> Shape;

/// Reads a field or pointee out of a value, or `None` on a type mismatch.
pub type AccessFn = fn(&dyn Any) -> Option<&dyn Any>;

/// Capability table for intlike scalars of any width.
pub struct IntShape {
    /// Renders the integer in ordinary decimal form.
    pub render: RenderFn,
    /// Narrows a parsed `i64` into the concrete integer type; `None` when
    /// the value does not fit the width.
    pub make: fn(i64) -> Option<Box<dyn Any>>,
}

/// Capability table for float scalars.
pub struct FloatShape {
    /// True for the 64-bit width, false for 32-bit.
    pub wide: bool,
    /// Renders the float in ordinary decimal form.
    pub render: RenderFn,
    /// Builds the concrete float from a value parsed at 64-bit precision,
    /// narrowing when the width calls for it.
    pub make: fn(f64) -> Box<dyn Any>,
}

/// Capability table for sequences.
pub struct SequenceShape {
    /// Shape of the sequence's elements.
    pub element: ShapeFn,
    /// Length of a concrete sequence value.
    pub length: fn(&dyn Any) -> Option<usize>,
    /// Element of a concrete sequence value by position.
    pub item: fn(&dyn Any, usize) -> Option<&dyn Any>,
    /// Assembles decoded elements into the concrete sequence type; `None`
    /// when an element has the wrong type.
    pub from_items: fn(Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>,
}

/// One field of a record shape.
pub struct Field {
    /// External name: the field name used in the JSON text. Defaults to the
    /// field's identifier verbatim when no explicit mapping is supplied.
    pub name: &'static str,
    /// Shape of the field's value.
    pub shape: ShapeFn,
    /// Reads the field out of a concrete record value.
    pub get: AccessFn,
    /// Assigns a decoded value into the field of a concrete record value;
    /// false on a type mismatch.
    pub set: fn(&mut dyn Any, Box<dyn Any>) -> bool,
}

/// Capability table for records.
pub struct RecordShape {
    /// Builds the record's zero value; decoding starts from it so that
    /// absent fields keep their defaults.
    pub new_value: fn() -> Box<dyn Any>,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

/// Capability table for pointer indirection.
pub struct PointerShape {
    /// Total indirection depth down to the innermost non-pointer shape,
    /// folded when the shape is built.
    pub depth: usize,
    /// Shape one level of indirection down.
    pub inner: ShapeFn,
    /// Dereferences one level of a concrete pointer value.
    pub deref: AccessFn,
    /// Re-wraps a decoded value in one level of newly allocated indirection;
    /// `None` on a type mismatch.
    pub wrap: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
}

/// Structural classification of a value or target type, driving codec
/// dispatch.
pub enum Shape {
    /// Intlike scalar of any width.
    Int(IntShape),
    /// Float scalar, 32 or 64 bit.
    Float(FloatShape),
    /// Boolean scalar.
    Bool,
    /// Owned string.
    String,
    /// Sequence of a single element shape.
    Sequence(SequenceShape),
    /// Record with named fields in declaration order.
    Record(RecordShape),
    /// Pointer indirection of some depth over an inner shape.
    Pointer(PointerShape),
    /// Defined degradation for unsupported kinds: the encoder emits the
    /// sentinel literal for it, the decoder fails loudly.
    Unknown,
}

impl Shape {
    /// Kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Int(_) => "integer",
            Shape::Float(float) if float.wide => "float64",
            Shape::Float(_) => "float32",
            Shape::Bool => "boolean",
            Shape::String => "string",
            Shape::Sequence(_) => "sequence",
            Shape::Record(_) => "record",
            Shape::Pointer(_) => "pointer",
            Shape::Unknown => "unknown",
        }
    }

    /// Indirection depth for pointer shapes, `None` otherwise.
    pub fn pointer_depth(&self) -> Option<usize> {
        match self {
            Shape::Pointer(pointer) => Some(pointer.depth),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Types the codec can describe. One impl per concrete type; the codec
/// never inspects a value except through the shape's capability table.
pub trait Shaped: 'static {
    /// Describe this type's shape.
    fn shape() -> Shape;
}

macro_rules! int_shapes {
    ($($ty:ty),+ $(,)?) => {$(
        impl Shaped for $ty {
            fn shape() -> Shape {
                fn render(value: &dyn Any) -> Option<String> {
                    value.downcast_ref::<$ty>().map(|value| value.to_string())
                }
                fn make(parsed: i64) -> Option<Box<dyn Any>> {
                    <$ty>::try_from(parsed)
                        .ok()
                        .map(|narrowed| Box::new(narrowed) as Box<dyn Any>)
                }
                Shape::Int(IntShape { render, make })
            }
        }
    )+};
}

int_shapes!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl Shaped for f32 {
    fn shape() -> Shape {
        fn render(value: &dyn Any) -> Option<String> {
            value.downcast_ref::<f32>().map(|value| value.to_string())
        }
        fn make(parsed: f64) -> Box<dyn Any> {
            // Parsed at 64-bit precision, narrowed here.
            Box::new(parsed as f32)
        }
        Shape::Float(FloatShape {
            wide: false,
            render,
            make,
        })
    }
}

impl Shaped for f64 {
    fn shape() -> Shape {
        fn render(value: &dyn Any) -> Option<String> {
            value.downcast_ref::<f64>().map(|value| value.to_string())
        }
        fn make(parsed: f64) -> Box<dyn Any> {
            Box::new(parsed)
        }
        Shape::Float(FloatShape {
            wide: true,
            render,
            make,
        })
    }
}

impl Shaped for bool {
    fn shape() -> Shape {
        Shape::Bool
    }
}

impl Shaped for String {
    fn shape() -> Shape {
        Shape::String
    }
}

fn sequence_length<T: 'static>(value: &dyn Any) -> Option<usize> {
    value.downcast_ref::<Vec<T>>().map(Vec::len)
}

fn sequence_item<T: 'static>(value: &dyn Any, index: usize) -> Option<&dyn Any> {
    value
        .downcast_ref::<Vec<T>>()
        .and_then(|items| items.get(index))
        .map(|item| item as &dyn Any)
}

fn sequence_from_items<T: 'static>(items: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match item.downcast::<T>() {
            Ok(item) => out.push(*item),
            Err(_) => return None,
        }
    }
    Some(Box::new(out))
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(SequenceShape {
            element: T::shape,
            length: sequence_length::<T>,
            item: sequence_item::<T>,
            from_items: sequence_from_items::<T>,
        })
    }
}

fn pointer_deref<T: 'static>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<Box<T>>()
        .map(|boxed| boxed.as_ref() as &dyn Any)
}

fn pointer_wrap<T: 'static>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
    match value.downcast::<T>() {
        Ok(value) => Some(Box::new(value)),
        Err(_) => None,
    }
}

impl<T: Shaped> Shaped for Box<T> {
    fn shape() -> Shape {
        // Fold nested boxes into a single depth count so the codec can
        // unwrap to the innermost shape and re-wrap symmetrically.
        let depth = match T::shape() {
            Shape::Pointer(inner) => inner.depth + 1,
            _ => 1,
        };
        Shape::Pointer(PointerShape {
            depth,
            inner: T::shape,
            deref: pointer_deref::<T>,
            wrap: pointer_wrap::<T>,
        })
    }
}

/// Implements [`Shaped`] for a struct, describing it as a record shape.
///
/// Every field is listed with its type; an optional `=> "externalName"`
/// maps the field to a different name in the JSON text, otherwise the
/// identifier is used verbatim. The struct must implement `Default`
/// (decoding starts from the zero value) and every field type must be
/// [`Shaped`].
///
/// ```
/// use jsonshape::record_shape;
///
/// #[derive(Default)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// record_shape! { User { name: String, age: i64 } }
/// ```
#[macro_export]
macro_rules! record_shape {
    ($ty:ident { $($field:ident : $fty:ty $(=> $ext:literal)?),+ $(,)? }) => {
        impl $crate::shape::Shaped for $ty {
            fn shape() -> $crate::shape::Shape {
                $crate::shape::Shape::Record($crate::shape::RecordShape {
                    new_value: || {
                        ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
                    },
                    fields: ::std::vec![$(
                        $crate::shape::Field {
                            name: $crate::record_shape!(@external $field $(, $ext)?),
                            shape: <$fty as $crate::shape::Shaped>::shape,
                            get: {
                                fn get(
                                    value: &dyn ::std::any::Any,
                                ) -> ::std::option::Option<&dyn ::std::any::Any> {
                                    value
                                        .downcast_ref::<$ty>()
                                        .map(|record| &record.$field as &dyn ::std::any::Any)
                                }
                                get
                            },
                            set: {
                                fn set(
                                    value: &mut dyn ::std::any::Any,
                                    field_value: ::std::boxed::Box<dyn ::std::any::Any>,
                                ) -> bool {
                                    match (
                                        value.downcast_mut::<$ty>(),
                                        field_value.downcast::<$fty>(),
                                    ) {
                                        (
                                            ::std::option::Option::Some(record),
                                            ::std::result::Result::Ok(field_value),
                                        ) => {
                                            record.$field = *field_value;
                                            true
                                        }
                                        _ => false,
                                    }
                                }
                                set
                            },
                        }
                    ),+],
                })
            }
        }
    };
    (@external $field:ident) => {
        stringify!($field)
    };
    (@external $field:ident, $ext:literal) => {
        $ext
    };
}
