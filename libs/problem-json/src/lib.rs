//! JSON codec for RFC 7807 Problem Details documents.
//!
//! [`ProblemModule`] is the composition root: it owns the status index, the
//! subtype registry and the stack-trace setting, and exposes the encode and
//! decode operations. The module is immutable after construction and safe to
//! share across threads.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "type": "https://example.org/out-of-stock",
//!   "title": "Out of Stock",
//!   "status": 400,
//!   "detail": "Item B00027Y5QG is no longer available",
//!   "product": "B00027Y5QG",
//!   "cause": { "title": "..." }
//! }
//! ```
//!
//! `type` is omitted when it equals `about:blank`; `status` is a bare number;
//! additional members are flattened to the top level; `cause` nests
//! recursively; `stacktrace` appears only for raised problems when the module
//! was built with stack traces enabled.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod de;
mod ser;

pub mod error;
pub mod index;
pub mod module;

// Re-export commonly used types
pub use error::Error;
pub use index::{StatusIndex, UnknownStatus};
pub use module::ProblemModule;

/// Content type for Problem Details as per RFC 7807.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";
