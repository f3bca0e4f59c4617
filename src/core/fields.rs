//! Field-map parsing.
//!
//! Turns the body of a map literal (the text between its braces) into an
//! ordered list of [`FieldEntry`] values. The parse is lexical: keys must be
//! quoted strings, values are copied verbatim as source fragments and never
//! interpreted.

use std::{fmt, sync::LazyLock};

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexer::{LexError, check_balanced, split_top_level};

/// How the field-map body is bounded and split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ScanMode {
    /// Balance brackets and respect literals; split on top-level commas.
    #[default]
    DepthAware,
    /// Historical behavior: the body ends at the first `}` and values stop
    /// at the next `,` or `}`.
    Legacy,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::DepthAware => write!(f, "depth-aware"),
            ScanMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Historical entry rule, applied with find-all semantics over the body.
static LEGACY_ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)":\s*([^,}]+)"#).unwrap());

/// One key/value pair from a field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Key text without quotes. Never empty.
    pub key: String,
    /// Value expression as written, trimmed. Never empty.
    pub value: String,
}

impl FieldEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Lex(LexError),
    /// An entry does not start with a quoted key.
    MissingKey { entry: String },
    MissingColon { key: String },
    EmptyValue { key: String },
    /// Two commas with nothing between them.
    EmptyEntry,
    /// Legacy mode cut a value in the middle of a bracket or literal.
    UnbalancedValue { key: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Lex(err) => write!(f, "{}", err),
            FieldError::MissingKey { entry } => {
                write!(f, "entry is not a quoted key: `{}`", entry)
            }
            FieldError::MissingColon { key } => write!(f, "missing `:` after key \"{}\"", key),
            FieldError::EmptyValue { key } => write!(f, "empty value for key \"{}\"", key),
            FieldError::EmptyEntry => write!(f, "empty entry between commas"),
            FieldError::UnbalancedValue { key } => {
                write!(f, "value for key \"{}\" was cut at a nested brace or comma", key)
            }
        }
    }
}

impl From<LexError> for FieldError {
    fn from(err: LexError) -> Self {
        FieldError::Lex(err)
    }
}

/// Parse a field-map body into entries in first-seen key order.
///
/// A repeated key keeps its first position and takes the later value.
pub fn parse_fields(body: &str, mode: ScanMode) -> Result<Vec<FieldEntry>, FieldError> {
    match mode {
        ScanMode::DepthAware => parse_depth_aware(body),
        ScanMode::Legacy => parse_legacy(body),
    }
}

fn parse_depth_aware(body: &str) -> Result<Vec<FieldEntry>, FieldError> {
    let segments = split_top_level(body)?;
    let last = segments.len() - 1;
    let mut entries = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            // trailing comma, or an empty literal
            if idx == last {
                continue;
            }
            return Err(FieldError::EmptyEntry);
        }
        let (key, value) = split_entry(segment)?;
        insert(&mut entries, key, value);
    }

    Ok(entries)
}

fn parse_legacy(body: &str) -> Result<Vec<FieldEntry>, FieldError> {
    let mut entries = Vec::new();

    for caps in LEGACY_ENTRY_REGEX.captures_iter(body) {
        let key = &caps[1];
        let value = caps[2].trim();
        if value.is_empty() {
            return Err(FieldError::EmptyValue {
                key: key.to_string(),
            });
        }
        if check_balanced(value).is_err() {
            return Err(FieldError::UnbalancedValue {
                key: key.to_string(),
            });
        }
        insert(&mut entries, key, value);
    }

    Ok(entries)
}

/// Split a trimmed `"key": value` segment.
fn split_entry(segment: &str) -> Result<(&str, &str), FieldError> {
    let missing_key = || FieldError::MissingKey {
        entry: segment.to_string(),
    };

    let rest = segment.strip_prefix('"').ok_or_else(missing_key)?;
    let close = rest.find('"').ok_or_else(missing_key)?;
    let key = &rest[..close];
    if key.is_empty() || key.contains('\\') {
        return Err(missing_key());
    }

    let value = rest[close + 1..]
        .trim_start()
        .strip_prefix(':')
        .ok_or_else(|| FieldError::MissingColon {
            key: key.to_string(),
        })?
        .trim();
    if value.is_empty() {
        return Err(FieldError::EmptyValue {
            key: key.to_string(),
        });
    }

    Ok((key, value))
}

fn insert(entries: &mut Vec<FieldEntry>, key: &str, value: &str) {
    match entries.iter_mut().find(|entry| entry.key == key) {
        Some(existing) => existing.value = value.to_string(),
        None => entries.push(FieldEntry::new(key, value)),
    }
}
