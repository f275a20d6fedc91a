//! Error types shared across the workspace.

use thiserror::Error;

/// Failure signalled by an external collaborator
///
/// The payment gateway returns this when it refuses a charge. The purchase
/// logic treats any such error as a failed payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CollaboratorError {
    /// Human-readable reason given by the collaborator
    pub reason: String,
}

impl CollaboratorError {
    /// Creates a new collaborator error with the given reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors produced when parsing identifiers and request lines from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Account identifier was not a positive integer
    #[error("invalid account id '{0}': expected a positive integer")]
    InvalidAccountId(String),

    /// Unknown ticket category name
    #[error("unknown ticket category '{0}': expected ADULT, CHILD or INFANT")]
    UnknownCategory(String),

    /// Request line was not of the form `CATEGORY:COUNT`
    #[error("malformed ticket request '{0}': expected CATEGORY:COUNT")]
    MalformedLine(String),

    /// Ticket count was not a non-negative integer
    #[error("invalid ticket count '{0}'")]
    InvalidCount(String),
}
