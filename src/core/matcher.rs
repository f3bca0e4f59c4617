//! Call-site matching.
//!
//! Each [`CallIdiom`] compiles to two regexes: a head that runs up to and
//! including the opening brace of the field map, and an anchored tail that
//! follows the closing brace. The map body between them is bounded by the
//! lexer (depth-aware) or by the first `}` (legacy), never by a regex, so
//! nested literals do not confuse the tail.

use std::{fmt, ops::Range};

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::{
    fields::{FieldError, ScanMode},
    idiom::{CallIdiom, CallShape, Level, WILDCARD},
    lexer::{LexError, find_closing},
};

const IDENT_PATTERN: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// Body of a Go interpreted string literal, escapes allowed, no newlines.
const MESSAGE_PATTERN: &str = r#""(?P<message>(?:[^"\\\n]|\\.)+)""#;

/// One located occurrence of an idiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSiteMatch {
    /// Byte range of the whole call, qualifier through closing parenthesis.
    pub span: Range<usize>,
    pub raw_text: String,
    /// Qualifier text as written (wildcards resolved).
    pub qualifier: String,
    /// Map literal body, between the braces.
    pub fields_text: String,
    /// Message literal body, without quotes.
    pub message: String,
    pub level: Level,
}

/// Why a call site whose head matched could not be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The map literal could not be bounded.
    FieldMap(LexError),
    /// Legacy scanning needs at least one character before the first `}`.
    EmptyLegacyFieldMap,
    /// After the map: message is not a plain string literal, or the call
    /// continues in a shape the idiom does not describe.
    UnsupportedCall,
    /// The field map was bounded but its entries could not be parsed.
    Fields(FieldError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldMap(err) => write!(f, "field map: {}", err),
            SkipReason::EmptyLegacyFieldMap => write!(f, "empty field map (legacy scan)"),
            SkipReason::UnsupportedCall => {
                write!(f, "message is not a string literal or call shape differs")
            }
            SkipReason::Fields(err) => write!(f, "field map: {}", err),
        }
    }
}

/// A head match that was abandoned, located by the offset of its qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub offset: usize,
    pub reason: SkipReason,
}

/// Matches found for one idiom in one buffer.
#[derive(Debug, Default)]
pub struct MatchResults {
    pub matches: Vec<CallSiteMatch>,
    pub rejections: Vec<Rejection>,
}

/// An idiom compiled for scanning.
pub struct CompiledIdiom {
    pub idiom: CallIdiom,
    head: Regex,
    tail: Regex,
}

impl CompiledIdiom {
    pub fn new(idiom: &CallIdiom) -> Result<Self> {
        idiom.validate()?;

        let qualifier = template_pattern(&idiom.qualifier);
        let map_types = idiom
            .map_types
            .iter()
            .map(|t| template_pattern(t))
            .collect::<Vec<_>>()
            .join("|");
        let levels = idiom
            .levels
            .iter()
            .map(|level| level.name())
            .collect::<Vec<_>>()
            .join("|");

        let (head, tail) = match idiom.shape {
            CallShape::Function => (
                format!(
                    r"\b(?P<qualifier>{})\.(?P<level>{})WithFields\(\s*(?:{})\s*\{{",
                    qualifier, levels, map_types
                ),
                format!(r"^\s*,\s*{}\s*,?\s*\)", MESSAGE_PATTERN),
            ),
            CallShape::Receiver => (
                format!(
                    r"\b(?P<qualifier>{})\.WithFields\(\s*(?:{})\s*\{{",
                    qualifier, map_types
                ),
                format!(
                    r"^\s*,?\s*\)\s*\.\s*(?P<level>{})\(\s*{}\s*,?\s*\)",
                    levels, MESSAGE_PATTERN
                ),
            ),
        };

        Ok(Self {
            idiom: idiom.clone(),
            head: Regex::new(&head)
                .with_context(|| format!("Invalid call pattern for idiom '{}'", idiom.name))?,
            tail: Regex::new(&tail)
                .with_context(|| format!("Invalid call pattern for idiom '{}'", idiom.name))?,
        })
    }

    /// Find all non-overlapping occurrences of this idiom in `buffer`.
    pub fn find_call_sites(&self, buffer: &str, mode: ScanMode) -> MatchResults {
        let mut results = MatchResults::default();
        let mut pos = 0;

        while let Some(head) = self.head.captures_at(buffer, pos) {
            let Some(whole) = head.get(0).map(|m| m.range()) else {
                break;
            };
            match self.complete(buffer, &head, whole.clone(), mode) {
                Ok(site) => {
                    pos = site.span.end;
                    results.matches.push(site);
                }
                Err(reason) => {
                    pos = whole.end;
                    results.rejections.push(Rejection {
                        offset: whole.start,
                        reason,
                    });
                }
            }
        }

        results
    }

    /// Extend a head match over the map body and the call tail.
    fn complete(
        &self,
        buffer: &str,
        head: &Captures<'_>,
        whole: Range<usize>,
        mode: ScanMode,
    ) -> Result<CallSiteMatch, SkipReason> {
        // the head always ends on the opening brace
        let open = whole.end - 1;
        let close = match mode {
            ScanMode::DepthAware => find_closing(buffer, open).map_err(SkipReason::FieldMap)?,
            ScanMode::Legacy => {
                let close = buffer[open + 1..]
                    .find('}')
                    .map(|i| open + 1 + i)
                    .ok_or(SkipReason::FieldMap(LexError::Unterminated))?;
                if close == open + 1 {
                    return Err(SkipReason::EmptyLegacyFieldMap);
                }
                close
            }
        };

        let rest = &buffer[close + 1..];
        let tail = self
            .tail
            .captures(rest)
            .ok_or(SkipReason::UnsupportedCall)?;
        let level_token = head
            .name("level")
            .or_else(|| tail.name("level"))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let level = Level::from_name(level_token).ok_or(SkipReason::UnsupportedCall)?;

        let end = close + 1 + tail.get(0).map_or(0, |m| m.end());
        Ok(CallSiteMatch {
            span: whole.start..end,
            raw_text: buffer[whole.start..end].to_string(),
            qualifier: head["qualifier"].to_string(),
            fields_text: buffer[open + 1..close].to_string(),
            message: tail["message"].to_string(),
            level,
        })
    }
}

/// Convert a dotted template into a regex; `*` segments match one identifier.
fn template_pattern(template: &str) -> String {
    template
        .split('.')
        .map(|segment| {
            if segment == WILDCARD {
                IDENT_PATTERN.to_string()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(r"\.")
}
