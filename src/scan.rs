//! Single-pass value tokenizer for object and array bodies.
//!
//! The scanner splits the text between the outer `{`/`}` or `[`/`]`
//! delimiters (already stripped by the caller) into its top-level member
//! spans: field-name/value pairs for objects, ordered element spans for
//! arrays. Nested brackets and braces are skipped by depth counting, quoted
//! values by looking for the closing unescaped quote. One left-to-right pass
//! over the input bytes, O(n), with the state machine and in-flight token
//! positions held in locals of the scan function.
//!
//! The scanner recognizes a deliberately partial JSON grammar:
//!
//! - Only the space character (0x20) is whitespace; tabs and newlines in a
//!   skipping state are scan errors.
//! - A quote counts as escaped iff the single preceding byte is a backslash,
//!   so a literal backslash immediately before a closing quote is
//!   misclassified.
//! - Brace/bracket depth counting does not track quoted strings inside the
//!   nested value, so a brace character inside a nested string corrupts the
//!   depth count.
//!
//! The last two are preserved limitations of the grammar, not bugs to fix
//! silently; the unit tests pin the observable behavior.

use std::collections::BTreeMap;

use crate::error::{CodecResult, Error};
use std::fmt;

/// Field name (quotes stripped) to still-raw value span (quotes and brackets
/// preserved, outer whitespace trimmed). Ordering is irrelevant; the decoder
/// only performs lookups.
pub type FieldMap = BTreeMap<String, String>;

/// Raw element spans of an array body in encounter order. Order is
/// significant: elements correspond positionally to the target sequence.
pub type ElementList = Vec<String>;

/// State of the scanning state machine. Exactly one is active at a time
/// during a scan; bracket/brace depth is tracked in a separate counter.
///
/// An object scan starts in [`AwaitFieldNameQuote`](Self::AwaitFieldNameQuote)
/// and loops through the field-name, colon, and value states. An array scan
/// is the same machine minus the field-name and colon states, starting in
/// [`AwaitValue`](Self::AwaitValue). There is no terminal state: the scan
/// ends when input is exhausted, and any unquoted, bracket, or brace value
/// still open at that point is implicitly closed (the last value needs no
/// trailing comma).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Skipping spaces before the opening quote of a field name.
    AwaitFieldNameQuote,
    /// Inside a field name, looking for its closing quote.
    InFieldName,
    /// Skipping spaces before the colon separating name and value.
    AwaitColon,
    /// Skipping spaces before the first character of a value.
    AwaitValue,
    /// Inside a bare scalar value, closing on a top-level comma or
    /// end-of-input.
    InUnquotedValue,
    /// Inside a `[...]` value, counting bracket depth.
    InBracketValue,
    /// Inside a `{...}` value, counting brace depth.
    InBraceValue,
    /// Inside a quoted value, closing on an unescaped quote.
    InQuotedValue,
    /// Skipping spaces before the comma separating members.
    AwaitComma,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::AwaitFieldNameQuote => "AwaitFieldNameQuote",
            ScanState::InFieldName => "InFieldName",
            ScanState::AwaitColon => "AwaitColon",
            ScanState::AwaitValue => "AwaitValue",
            ScanState::InUnquotedValue => "InUnquotedValue",
            ScanState::InBracketValue => "InBracketValue",
            ScanState::InBraceValue => "InBraceValue",
            ScanState::InQuotedValue => "InQuotedValue",
            ScanState::AwaitComma => "AwaitComma",
        };
        f.write_str(name)
    }
}

/// Inclusive-end byte range of one recognized token within the scanned text.
/// Created when a token begins, finalized when its terminating delimiter is
/// found, then immediately consumed and cleared by the emit step.
#[derive(Clone, Copy)]
struct TokenPosition {
    start: usize,
    end: usize,
    completed: bool,
}

impl TokenPosition {
    fn starting_at(start: usize) -> Self {
        Self {
            start,
            end: start,
            completed: false,
        }
    }

    fn complete(&mut self, end: usize) {
        self.end = end;
        self.completed = true;
    }
}

fn scan_error(state: ScanState, byte: u8) -> Error {
    Error::Scan {
        state,
        ch: byte as char,
    }
}

/// Implicitly close an unquoted, bracket, or brace token left open at
/// end-of-input. Unterminated quoted tokens and field names stay open and
/// are dropped.
fn close_open_token(state: ScanState, token: &mut Option<TokenPosition>, len: usize) {
    let closeable = matches!(
        state,
        ScanState::InUnquotedValue | ScanState::InBracketValue | ScanState::InBraceValue
    );
    if !closeable || len == 0 {
        return;
    }
    if let Some(token) = token.as_mut() {
        if !token.completed {
            token.complete(len - 1);
        }
    }
}

fn emit_field(
    fields: &mut FieldMap,
    src: &str,
    name: &mut Option<TokenPosition>,
    value: &mut Option<TokenPosition>,
) {
    let (name_token, value_token) = match (name.as_ref(), value.as_ref()) {
        (Some(n), Some(v)) if n.completed && v.completed => (*n, *v),
        _ => return,
    };
    // Name span excludes its quotes; value span keeps its delimiters.
    let field_name = &src[name_token.start + 1..name_token.end];
    let field_value = src[value_token.start..=value_token.end].trim();
    fields.insert(field_name.to_string(), field_value.to_string());
    *name = None;
    *value = None;
}

fn emit_element(elements: &mut ElementList, src: &str, item: &mut Option<TokenPosition>) {
    let token = match item.as_ref() {
        Some(token) if token.completed => *token,
        _ => return,
    };
    elements.push(src[token.start..=token.end].trim().to_string());
    *item = None;
}

/// Scan the body of a JSON object (the text strictly between `{` and `}`)
/// into a [`FieldMap`].
///
/// Any character not recognized by the current state aborts the scan with
/// [`Error::Scan`] naming the state and the character; no partial result is
/// returned.
pub fn scan_object_body(src: &str) -> CodecResult<FieldMap> {
    let bytes = src.as_bytes();
    let mut fields = FieldMap::new();
    let mut state = ScanState::AwaitFieldNameQuote;
    let mut name: Option<TokenPosition> = None;
    let mut value: Option<TokenPosition> = None;
    let mut depth = 0usize;

    for (index, &byte) in bytes.iter().enumerate() {
        match state {
            ScanState::AwaitFieldNameQuote => {
                if byte == b' ' {
                    continue;
                }
                if byte == b'"' {
                    name = Some(TokenPosition::starting_at(index));
                    state = ScanState::InFieldName;
                } else {
                    return Err(scan_error(state, byte));
                }
            }
            ScanState::InFieldName => {
                if byte == b'"' && bytes[index - 1] != b'\\' {
                    if let Some(token) = name.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitColon;
                }
            }
            ScanState::AwaitColon => {
                if byte == b' ' {
                    continue;
                }
                if byte == b':' {
                    state = ScanState::AwaitValue;
                } else {
                    return Err(scan_error(state, byte));
                }
            }
            ScanState::AwaitValue => {
                if byte == b' ' {
                    continue;
                }
                value = Some(TokenPosition::starting_at(index));
                state = match byte {
                    b'[' => {
                        depth = 1;
                        ScanState::InBracketValue
                    }
                    b'{' => {
                        depth = 1;
                        ScanState::InBraceValue
                    }
                    b'"' => ScanState::InQuotedValue,
                    _ => ScanState::InUnquotedValue,
                };
            }
            ScanState::InUnquotedValue => {
                if byte == b',' {
                    if let Some(token) = value.as_mut() {
                        token.complete(index - 1);
                    }
                    state = ScanState::AwaitFieldNameQuote;
                }
            }
            ScanState::InBracketValue => {
                match byte {
                    b'[' => depth += 1,
                    b']' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    if let Some(token) = value.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::InBraceValue => {
                match byte {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    if let Some(token) = value.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::InQuotedValue => {
                if byte == b'"' && bytes[index - 1] != b'\\' {
                    if let Some(token) = value.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::AwaitComma => {
                if byte == b' ' {
                    continue;
                }
                if byte == b',' {
                    state = ScanState::AwaitFieldNameQuote;
                } else {
                    return Err(scan_error(state, byte));
                }
            }
        }

        emit_field(&mut fields, src, &mut name, &mut value);
    }

    close_open_token(state, &mut value, src.len());
    emit_field(&mut fields, src, &mut name, &mut value);
    Ok(fields)
}

/// Scan the body of a JSON array (the text strictly between `[` and `]`)
/// into an [`ElementList`].
///
/// Same machine as [`scan_object_body`] minus the field-name and colon
/// states: each element directly enters the value sub-scanners and is
/// appended in encounter order.
pub fn scan_array_body(src: &str) -> CodecResult<ElementList> {
    let bytes = src.as_bytes();
    let mut elements = ElementList::new();
    let mut state = ScanState::AwaitValue;
    let mut item: Option<TokenPosition> = None;
    let mut depth = 0usize;

    for (index, &byte) in bytes.iter().enumerate() {
        match state {
            ScanState::AwaitValue => {
                if byte == b' ' {
                    continue;
                }
                item = Some(TokenPosition::starting_at(index));
                state = match byte {
                    b'[' => {
                        depth = 1;
                        ScanState::InBracketValue
                    }
                    b'{' => {
                        depth = 1;
                        ScanState::InBraceValue
                    }
                    b'"' => ScanState::InQuotedValue,
                    _ => ScanState::InUnquotedValue,
                };
            }
            ScanState::InUnquotedValue => {
                if byte == b',' {
                    if let Some(token) = item.as_mut() {
                        token.complete(index - 1);
                    }
                    state = ScanState::AwaitValue;
                }
            }
            ScanState::InBracketValue => {
                match byte {
                    b'[' => depth += 1,
                    b']' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    if let Some(token) = item.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::InBraceValue => {
                match byte {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    if let Some(token) = item.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::InQuotedValue => {
                if byte == b'"' && bytes[index - 1] != b'\\' {
                    if let Some(token) = item.as_mut() {
                        token.complete(index);
                    }
                    state = ScanState::AwaitComma;
                }
            }
            ScanState::AwaitComma => {
                if byte == b' ' {
                    continue;
                }
                if byte == b',' {
                    state = ScanState::AwaitValue;
                } else {
                    return Err(scan_error(state, byte));
                }
            }
            // Field-name states never occur in an array scan.
            ScanState::AwaitFieldNameQuote | ScanState::InFieldName | ScanState::AwaitColon => {
                return Err(scan_error(state, byte));
            }
        }

        emit_element(&mut elements, src, &mut item);
    }

    close_open_token(state, &mut item, src.len());
    emit_element(&mut elements, src, &mut item);
    Ok(elements)
}
