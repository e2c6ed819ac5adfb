// Copyright 2025 Cowboy AI, LLC.

//! Error types for raffle operations

use crate::value_objects::TicketNumber;
use thiserror::Error;

/// Errors that can occur while handling raffle commands or replaying history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaffleError {
    /// A command carried invalid input (blank title, zero tickets, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Every ticket of the raffle has already been bought
    #[error("No tickets left to buy")]
    NoTicketsAvailable,

    /// The requested ticket is not in the available pool
    #[error("Ticket {0} is not available")]
    TicketUnavailable(TicketNumber),

    /// A winner was requested before any ticket was sold
    #[error("No tickets have been bought, cannot select a winner")]
    NoTicketsSold,

    /// Every bought ticket has already been drawn as a winner
    #[error("Every bought ticket has already been selected")]
    NoRemainingCandidates,

    /// Persisted events are internally inconsistent
    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    /// An event kind reached the dispatcher without a handler
    #[error("Unhandled event kind: {0}")]
    UnhandledEventKind(String),

    /// A winner selector returned a number it was not offered
    #[error("Selector returned ticket {0} which is not a candidate")]
    SelectionOutOfPool(TicketNumber),
}

/// Result type for raffle operations
pub type RaffleResult<T> = Result<T, RaffleError>;

impl RaffleError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        RaffleError::Validation(msg.into())
    }

    /// Create an invalid-history error
    pub fn invalid_history(msg: impl Into<String>) -> Self {
        RaffleError::InvalidHistory(msg.into())
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, RaffleError::Validation(_))
    }

    /// Check if the command conflicts with the current raffle state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RaffleError::NoTicketsAvailable
                | RaffleError::TicketUnavailable(_)
                | RaffleError::NoTicketsSold
                | RaffleError::NoRemainingCandidates
        )
    }

    /// Check if the error means stored data or code is broken rather than the request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RaffleError::InvalidHistory(_)
                | RaffleError::UnhandledEventKind(_)
                | RaffleError::SelectionOutOfPool(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Error categories drive how callers respond
    ///
    /// ```mermaid
    /// graph TD
    ///     A[RaffleError] -->|Validation| B[rejected command]
    ///     A -->|Conflict| C[state conflict]
    ///     A -->|InvalidHistory / UnhandledEventKind| D[fatal]
    /// ```
    #[test]
    fn test_error_categories() {
        assert!(RaffleError::validation("blank").is_validation_error());
        assert!(!RaffleError::validation("blank").is_conflict());

        for err in [
            RaffleError::NoTicketsAvailable,
            RaffleError::TicketUnavailable(TicketNumber::new(1001)),
            RaffleError::NoTicketsSold,
            RaffleError::NoRemainingCandidates,
        ] {
            assert!(err.is_conflict(), "{err} should be a conflict");
            assert!(!err.is_fatal());
        }

        assert!(RaffleError::invalid_history("gap").is_fatal());
        assert!(RaffleError::UnhandledEventKind("Refunded".into()).is_fatal());
    }

    #[test]
    fn test_error_display_messages() {
        assert_eq!(
            RaffleError::TicketUnavailable(TicketNumber::new(1002)).to_string(),
            "Ticket 1002 is not available"
        );
        assert_eq!(
            RaffleError::validation("Title cannot be empty").to_string(),
            "Validation error: Title cannot be empty"
        );
        assert_eq!(
            RaffleError::invalid_history("first event must be RaffleCreated").to_string(),
            "Invalid history: first event must be RaffleCreated"
        );
    }
}
