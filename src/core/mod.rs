//! Core rewrite engine.
//!
//! ## Pipeline
//!
//! ```text
//! buffer
//!   ↓  matcher   (idiom heads, map body bounding, call tail)
//! CallSiteMatch
//!   ↓  fields    (ordered key/value entries)
//! Vec<FieldEntry>
//!   ↓  synth     (printf-style destination call)
//! replacement text, spliced by rewrite in a single pass
//! ```
//!
//! ## Module Structure
//!
//! - `idiom`: Call shapes the rewriter recognizes and the default catalog
//! - `lexer`: Bracket and literal aware scanning
//! - `matcher`: Call-site matching per idiom
//! - `fields`: Field-map parsing
//! - `synth`: Destination call rendering
//! - `rewrite`: Whole-buffer rewriting
//! - `location`: Offset to line/column conversion
//! - `file_scanner`: Target discovery
//! - `context`: Per-run state and in-memory planning

pub mod context;
pub mod fields;
pub mod file_scanner;
pub mod idiom;
pub mod lexer;
pub mod location;
pub mod matcher;
pub mod rewrite;
pub mod synth;

pub use context::{FailureKind, FileFailure, FilePlan, PlanOutcome, RunContext};
pub use fields::{FieldEntry, FieldError, ScanMode, parse_fields};
pub use idiom::{CallIdiom, CallShape, Level, default_catalog, validate_catalog};
pub use location::SourceLocation;
pub use matcher::{CallSiteMatch, CompiledIdiom, SkipReason};
pub use rewrite::{AppliedRewrite, BufferRewrite, Rewriter, SkippedSite};
pub use synth::render_call;
