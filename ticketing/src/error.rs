//! Purchase failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a purchase failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseErrorKind {
    /// The request itself was missing or empty
    InvalidInput,
    /// The request broke a purchase rule (ticket limit, adult requirement)
    RuleViolation,
    /// The payment collaborator refused the charge
    PaymentFailure,
    /// The purchase stopped before reaching a final state
    Internal,
}

impl PurchaseErrorKind {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::RuleViolation => "rule_violation",
            Self::PaymentFailure => "payment_failure",
            Self::Internal => "internal",
        }
    }
}

/// Why a purchase was refused
///
/// Every variant is terminal for the call: nothing is retried and the caller
/// has to submit a corrected request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PurchaseError {
    /// No request lines were supplied
    #[error("empty or missing request")]
    EmptyRequest,

    /// More tickets than a single purchase allows
    #[error("ticket limit exceeded: {requested} tickets requested, at most {limit} allowed")]
    TicketLimitExceeded {
        /// Tickets requested across all lines
        requested: u32,
        /// Maximum allowed per purchase
        limit: u32,
    },

    /// No adult ticket in the request
    #[error("adult ticket required")]
    AdultTicketRequired,

    /// The payment gateway declined the charge
    #[error("payment failed: {reason}")]
    PaymentFailed {
        /// Reason reported by the gateway
        reason: String,
    },

    /// The purchase never reached a completed or rejected state
    #[error("purchase incomplete")]
    Incomplete,
}

impl PurchaseError {
    /// Classify the failure
    #[must_use]
    pub const fn kind(&self) -> PurchaseErrorKind {
        match self {
            Self::EmptyRequest => PurchaseErrorKind::InvalidInput,
            Self::TicketLimitExceeded { .. } | Self::AdultTicketRequired => {
                PurchaseErrorKind::RuleViolation
            },
            Self::PaymentFailed { .. } => PurchaseErrorKind::PaymentFailure,
            Self::Incomplete => PurchaseErrorKind::Internal,
        }
    }

    /// Fixed, detail-free reason for the failure
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::EmptyRequest => "empty or missing request",
            Self::TicketLimitExceeded { .. } => "ticket limit exceeded",
            Self::AdultTicketRequired => "adult ticket required",
            Self::PaymentFailed { .. } => "payment failed",
            Self::Incomplete => "purchase incomplete",
        }
    }
}
