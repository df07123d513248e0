//! rethrow - traced error chains with wrap/rethrow/throw helpers
//!
//! # Overview
//!
//! `rethrow` wraps an arbitrary failure with a call-site trace, keeps the
//! root failure (the "original") apart from an unrelated failure that was
//! already propagating when the new one occurred (the "cause"), and merges
//! trace data correctly when an already-chained failure passes another
//! boundary. All invocations return `Result<T>` - no hidden control flow.
//!
//! # Quick Start
//!
//! ```
//! use rethrow::{traced, Result};
//!
//! fn load_data(path: &str) -> Result<String> {
//!     traced! { std::fs::read_to_string(path)? }
//! }
//! ```
//!
//! # Helpers
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `traced! { }` | Run a block, chain any error at this site |
//! | `traced!(after prev; )` | Same, with an in-flight failure as candidate cause |
//! | `rethrow!(e)` | Attach one more trace frame, no new cause level |
//! | `throw!(e)` | Raise a fresh failure value |
//! | `throw!(e, after prev)` | Raise fresh, demoting `prev` to the cause |
//! | `throw_os!(code)` | Raise a raw OS error code |
//! | `throw_last_os!()` | Raise the thread's last OS error |
//! | `location!()` | Capture function/file/line/column |
//!
//! # Chain shape
//!
//! Every chain node is immutable after construction and shared by
//! reference count: the original, the cause link and the rendered text are
//! written once and observed identically by every clone. Wrapping a chain
//! again appends one trace frame; it never copies the cause data. The
//! rendering walks the cause chain oldest-trace-first:
//!
//! ```text
//! Exception in thread ThreadId(1) rethrow::traced::StringError: disk full
//!     at demo::write (src/demo.rs:42:9)
//!     at demo::save (src/demo.rs:10:5)
//! Caused by std::io::Error: permission denied
//!     at demo::open (src/demo.rs:30:9)
//! ```

// ============================================================
// Modules
// ============================================================

mod ext;
mod location;
mod macros;
pub mod os;
mod traced;

// ============================================================
// Re-exports
// ============================================================

pub use ext::TracedExt;
pub use location::Location;
pub use macros::{rethrow_at, throw_at, wrap_traced};
pub use traced::{BoxedError, Failure, InvalidState, StringError, Traced};

// ============================================================
// Type aliases
// ============================================================

/// Result type alias.
///
/// - `Result<T>` = `core::result::Result<T, Traced>`
/// - `Result<T, Failure>` = for callers handing bare failures around
pub type Result<T, E = Traced> = core::result::Result<T, E>;
