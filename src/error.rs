//! Error handling for the codec.
//!
//! Encoding is total and never produces an error (unsupported shapes degrade
//! to a sentinel literal instead). Every error in this module comes from the
//! decode path: either the token scanner rejected the input text, or a scalar
//! span failed to parse, or a shape and its concrete value disagreed.
//!
//! Errors carry enough context to localize the problem in the source text:
//! the scanner state and offending character, or the offending scalar span.

use std::fmt;

use crate::scan::ScanState;

/// Result alias used throughout the crate.
pub type CodecResult<T> = Result<T, Error>;

/// Errors produced while decoding JSON text into a typed value.
///
/// The first error encountered aborts the entire decode of the enclosing
/// value and propagates upward unchanged; there are no partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The decoded value did not match the destination type. This indicates
    /// a shape descriptor that disagrees with the concrete type it claims to
    /// describe.
    InvalidDestination {
        /// Kind name of the shape that was being decoded.
        expected: &'static str,
    },
    /// The scanner met a character it does not accept in its current state.
    Scan {
        /// State the scanner was in when it aborted.
        state: ScanState,
        /// The offending character.
        ch: char,
    },
    /// A scalar span could not be parsed as an integer or float, or the
    /// parsed value did not fit the destination's width.
    NumberFormat {
        /// The offending span.
        text: String,
    },
    /// A scalar span was not a `true`/`false` literal.
    BoolFormat {
        /// The offending span.
        text: String,
    },
    /// A delimited span was too short (or not UTF-8-aligned) to strip one
    /// leading and one trailing delimiter from.
    Truncated {
        /// The offending span.
        text: String,
    },
    /// The target shape is not supported by the decoder.
    UnsupportedShape,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDestination { expected } => {
                write!(f, "destination does not match decoded {expected} value")
            }
            Error::Scan { state, ch } => {
                write!(f, "invalid format in state {state}: char {ch:?}")
            }
            Error::NumberFormat { text } => write!(f, "invalid number literal: {text:?}"),
            Error::BoolFormat { text } => write!(f, "invalid boolean literal: {text:?}"),
            Error::Truncated { text } => {
                write!(f, "span too short to strip delimiters: {text:?}")
            }
            Error::UnsupportedShape => write!(f, "shape is not supported by the decoder"),
        }
    }
}

impl std::error::Error for Error {}
