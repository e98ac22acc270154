//! RFC 7807 Problem Details data model (pure data, no HTTP framework dependencies)
//!
//! This crate provides the value types consumed by the `cf-problem-json`
//! codec:
//! - the [`Problem`] contract and the [`DefaultProblem`] catch-all document
//! - pluggable status vocabularies ([`StatusType`], [`StatusSource`])
//! - the [`ProblemError`] carrier for raising a problem as a Rust error
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod error;
pub mod problem;
pub mod status;

// Re-export commonly used types
pub use error::ProblemError;
pub use problem::{DefaultProblem, Parameters, Problem, ProblemBuilder, DEFAULT_TYPE};
pub use status::{StandardStatuses, StatusSource, StatusType};
