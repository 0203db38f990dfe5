//! Common error types for the Wai'tuMusic splitsheet services

use crate::isrc::FormatError;
use crate::model::RoleCategory;
use crate::validate::ValidationError;
use thiserror::Error;

/// Common result type for splitsheet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the splitsheet services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A participant already holds a role in the requested category.
    /// Rejected at the point of the edit; the edit is not applied.
    #[error("{participant} already holds a {category} role")]
    DuplicateRole {
        participant: String,
        category: RoleCategory,
    },

    /// The category carries no composition/publishing economic weight,
    /// so its percentage is fixed at 0 and not editable.
    #[error("{0} roles carry a fixed 0% share and cannot be edited")]
    FixedZeroCategory(RoleCategory),

    /// A submission is already outstanding for this working copy.
    /// At most one in-flight submission is allowed per splitsheet.
    #[error("a submission is already in progress for this splitsheet")]
    SubmissionInFlight,

    /// Release identifier failed format validation
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Submission gate failure
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
