// Copyright 2025 Cowboy AI, LLC.

//! Raffle tickets

use crate::value_objects::TicketNumber;
use serde::{Deserialize, Serialize};

/// One numbered slot in a raffle and its current holder
///
/// A ticket without a holder is available. Once a holder is assigned the
/// ticket is bought and stays bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    number: TicketNumber,
    holder: Option<String>,
}

impl Ticket {
    /// Create an unsold ticket
    pub const fn available(number: TicketNumber) -> Self {
        Self {
            number,
            holder: None,
        }
    }

    /// The number printed on the ticket
    pub const fn number(&self) -> TicketNumber {
        self.number
    }

    /// Name of the buyer, if the ticket has been bought
    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    /// Whether nobody holds this ticket yet
    pub const fn is_available(&self) -> bool {
        self.holder.is_none()
    }

    pub(crate) fn assign_holder(&mut self, holder: impl Into<String>) {
        self.holder = Some(holder.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_becomes_bought_once_held() {
        let mut ticket = Ticket::available(TicketNumber::new(1000));
        assert!(ticket.is_available());
        assert_eq!(ticket.holder(), None);

        ticket.assign_holder("Ann");
        assert!(!ticket.is_available());
        assert_eq!(ticket.holder(), Some("Ann"));
        assert_eq!(ticket.number(), TicketNumber::new(1000));
    }
}
