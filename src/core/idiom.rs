//! Idiom catalog: the structured logging call shapes the rewriter recognizes.
//!
//! A [`CallIdiom`] is pure data. It is compiled into regex heads by the
//! matcher once per run and never changes afterwards.
//!
//! Two shapes are supported:
//!
//! ```text
//! Function:  <qualifier>.<Level>WithFields(<mapType>{ "k": v, ... }, "message")
//! Receiver:  <qualifier>.WithFields(<mapType>{ "k": v, ... }).<Level>("message")
//! ```
//!
//! Both rewrite to `<qualifier>.<Level>f("message: k=%s, ...", v, ...)`.

use std::{collections::HashSet, fmt};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Suffix appended to a level name to form the printf-style destination method.
pub const FORMAT_SUFFIX: &str = "f";

/// Wildcard segment in qualifier and map type templates: matches one identifier.
pub const WILDCARD: &str = "*";

/// Log level named by a structured logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
        }
    }

    /// Resolve a level from the token captured in source (`"Info"`, `"Warn"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.name() == name)
    }

    /// Destination method name, e.g. `Infof`.
    pub fn destination(self) -> String {
        format!("{}{}", self.name(), FORMAT_SUFFIX)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Syntactic shape of a structured logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallShape {
    /// Level is part of the function name: `pkg.InfoWithFields(map, "msg")`.
    Function,
    /// Level is the chained method: `s.logger.WithFields(map).Info("msg")`.
    Receiver,
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallShape::Function => write!(f, "function"),
            CallShape::Receiver => write!(f, "receiver"),
        }
    }
}

/// One recognized call shape and its rewrite target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallIdiom {
    /// Human-readable name used in reports.
    pub name: String,
    pub shape: CallShape,
    /// Dotted call qualifier (`utils`, `s.logger`). A `*` segment matches any
    /// identifier; the text actually matched is reused in the destination.
    pub qualifier: String,
    /// Composite literal types accepted for the field map (`logrus.Fields`,
    /// `map[string]interface{}`). A `*` segment matches any identifier.
    pub map_types: Vec<String>,
    /// Levels this idiom accepts.
    pub levels: Vec<Level>,
}

impl CallIdiom {
    pub fn function(name: &str, qualifier: &str, map_types: &[&str], levels: &[Level]) -> Self {
        Self::new(name, CallShape::Function, qualifier, map_types, levels)
    }

    pub fn receiver(name: &str, qualifier: &str, map_types: &[&str], levels: &[Level]) -> Self {
        Self::new(name, CallShape::Receiver, qualifier, map_types, levels)
    }

    fn new(
        name: &str,
        shape: CallShape,
        qualifier: &str,
        map_types: &[&str],
        levels: &[Level],
    ) -> Self {
        Self {
            name: name.to_string(),
            shape,
            qualifier: qualifier.to_string(),
            map_types: map_types.iter().map(|t| t.to_string()).collect(),
            levels: levels.to_vec(),
        }
    }

    /// Check that the idiom can be compiled into a matcher.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Idiom name must not be empty");
        }
        validate_template(&self.qualifier)
            .map_err(|reason| anyhow::anyhow!("Idiom '{}': qualifier {}", self.name, reason))?;
        if self.map_types.is_empty() {
            bail!("Idiom '{}': at least one map type is required", self.name);
        }
        for map_type in &self.map_types {
            validate_template(map_type).map_err(|reason| {
                anyhow::anyhow!("Idiom '{}': map type {}", self.name, reason)
            })?;
        }
        if self.levels.is_empty() {
            bail!("Idiom '{}': at least one level is required", self.name);
        }
        Ok(())
    }

    /// A representative source call for this idiom, for display purposes.
    pub fn example_source(&self) -> String {
        let qualifier = fill_wildcards(&self.qualifier, "pkg");
        let map_type = self
            .map_types
            .first()
            .map(|t| fill_wildcards(t, "logrus"))
            .unwrap_or_default();
        let level = self.levels.first().copied().unwrap_or(Level::Info);
        match self.shape {
            CallShape::Function => format!(
                r#"{}.{}WithFields({}{{"id": id}}, "done")"#,
                qualifier, level, map_type
            ),
            CallShape::Receiver => format!(
                r#"{}.WithFields({}{{"id": id}}).{}("done")"#,
                qualifier, map_type, level
            ),
        }
    }

    /// The destination call for [`Self::example_source`].
    pub fn example_rewrite(&self) -> String {
        let qualifier = fill_wildcards(&self.qualifier, "pkg");
        let level = self.levels.first().copied().unwrap_or(Level::Info);
        format!(r#"{}.{}("done: id=%s", id)"#, qualifier, level.destination())
    }
}

/// The built-in catalog, in application order.
pub fn default_catalog() -> Vec<CallIdiom> {
    use Level::*;
    vec![
        CallIdiom::function(
            "package-functions",
            WILDCARD,
            &["map[string]interface{}", "map[string]any"],
            &[Info, Error, Warn],
        ),
        CallIdiom::receiver(
            "service-logger",
            "s.logger",
            &["*.Fields"],
            &[Info, Error, Warn, Debug],
        ),
        CallIdiom::receiver(
            "manager-logger",
            "m.logger",
            &["*.Fields"],
            &[Info, Error, Warn, Debug],
        ),
    ]
}

/// Validate a whole catalog: every idiom valid, names unique.
pub fn validate_catalog(idioms: &[CallIdiom]) -> Result<()> {
    let mut names = HashSet::new();
    for idiom in idioms {
        idiom.validate()?;
        if !names.insert(idiom.name.as_str()) {
            bail!("Duplicate idiom name: '{}'", idiom.name);
        }
    }
    Ok(())
}

fn validate_template(template: &str) -> Result<(), &'static str> {
    if template.is_empty() {
        return Err("must not be empty");
    }
    if template.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace");
    }
    if template.split('.').any(str::is_empty) {
        return Err("must not contain empty segments");
    }
    Ok(())
}

fn fill_wildcards(template: &str, filler: &str) -> String {
    template
        .split('.')
        .map(|segment| if segment == WILDCARD { filler } else { segment })
        .collect::<Vec<_>>()
        .join(".")
}
