//! Lexical scanning over Go-like source text.
//!
//! This is not a parser. It knows just enough to bound a composite literal
//! and split it on top-level commas: bracket nesting, interpreted strings
//! with escapes, raw strings, rune literals and comments. Everything else is
//! opaque text.
//!
//! All structural characters are ASCII, so scanning bytes and slicing at the
//! returned offsets always lands on UTF-8 character boundaries.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A literal or bracket is never closed.
    Unterminated,
    /// A closing bracket does not match the innermost open one.
    Unbalanced,
    /// A comment sits where rewriting would silently drop it.
    Comment,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Unterminated => write!(f, "unterminated literal or bracket"),
            LexError::Unbalanced => write!(f, "unbalanced brackets"),
            LexError::Comment => write!(f, "comment inside field map"),
        }
    }
}

/// Return the offset of the bracket closing the one at `open`.
///
/// `open` must index `(`, `[` or `{`.
pub fn find_closing(text: &str, open: usize) -> Result<usize, LexError> {
    let bytes = text.as_bytes();
    let Some(first) = bytes.get(open).copied().and_then(closer_for) else {
        return Err(LexError::Unbalanced);
    };
    let mut stack = vec![first];
    let mut i = open + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                i = skip_literal(bytes, i)?;
                continue;
            }
            b'/' if starts_comment(bytes, i) => return Err(LexError::Comment),
            b @ (b'(' | b'[' | b'{') => stack.extend(closer_for(b)),
            b @ (b')' | b']' | b'}') => {
                if stack.pop() != Some(b) {
                    return Err(LexError::Unbalanced);
                }
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(LexError::Unterminated)
}

/// Split `text` on commas at bracket depth zero, outside literals.
///
/// Segments are returned untrimmed. A text without commas yields one segment.
pub fn split_top_level(text: &str) -> Result<Vec<&str>, LexError> {
    let mut segments = Vec::new();
    let mut start = 0;
    walk(text, |comma| {
        segments.push(&text[start..comma]);
        start = comma + 1;
    })?;
    segments.push(&text[start..]);
    Ok(segments)
}

/// Check that every bracket and literal in `text` is closed.
pub fn check_balanced(text: &str) -> Result<(), LexError> {
    walk(text, |_| {})
}

/// Visit the offset of every top-level comma, failing on unbalanced input.
fn walk(text: &str, mut on_comma: impl FnMut(usize)) -> Result<(), LexError> {
    let bytes = text.as_bytes();
    let mut stack: Vec<u8> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                i = skip_literal(bytes, i)?;
                continue;
            }
            b'/' if starts_comment(bytes, i) => return Err(LexError::Comment),
            b @ (b'(' | b'[' | b'{') => stack.extend(closer_for(b)),
            b @ (b')' | b']' | b'}') => {
                if stack.pop() != Some(b) {
                    return Err(LexError::Unbalanced);
                }
            }
            b',' if stack.is_empty() => on_comma(i),
            _ => {}
        }
        i += 1;
    }

    if stack.is_empty() {
        Ok(())
    } else {
        Err(LexError::Unterminated)
    }
}

/// Skip the literal opening at `start`, returning the offset just past it.
fn skip_literal(bytes: &[u8], start: usize) -> Result<usize, LexError> {
    let quote = bytes[start];
    let raw = quote == b'`';
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !raw => i += 2,
            b'\n' if !raw => return Err(LexError::Unterminated),
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }

    Err(LexError::Unterminated)
}

fn starts_comment(bytes: &[u8], i: usize) -> bool {
    matches!(bytes.get(i + 1), Some(b'/') | Some(b'*'))
}

fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}
