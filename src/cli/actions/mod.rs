//! Actions that turn planned rewrites into file changes.
//!
//! ## Architecture
//!
//! ```text
//! FilePlan (rewritten in memory)
//!     ↓
//! Action (FilePlan → Operation conversion)
//!     ↓
//! Operation (low-level file operation)
//!     ↓
//! execute (atomic file replacement)
//! ```
//!
//! ## Actions
//!
//! - [`ApplyRewrites`]: Replace files with their rewritten buffers (rewrite)

mod apply_rewrites;
mod operation;
mod traits;

pub use apply_rewrites::ApplyRewrites;
pub use operation::Operation;
pub use traits::{Action, ActionStats};
