//! Crate-wide error type.
//!
//! The routing engine itself is total on well-formed input (see `routing`):
//! a search always returns a `Route`, empty when no path exists. The only
//! fallible entry point is the contact plan loader, whose failure modes are
//! collected here.

use thiserror::Error;

/// Failure modes of [`crate::contact_plan::load_contact_plan`].
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file could not be opened or read.
    #[error("failed to read contact plan: {0}")]
    Io(#[from] std::io::Error),

    /// The plan file was not valid JSON, or a field had the wrong shape
    /// (e.g. a string where an integer was expected).
    #[error("malformed contact plan: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Shorthand result type for fallible operations in this crate.
pub type PlanResult<T> = Result<T, PlanError>;
