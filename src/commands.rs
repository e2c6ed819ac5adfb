// Copyright 2025 Cowboy AI, LLC.

//! Commands accepted by the raffle aggregate
//!
//! Commands are requests to change state. They carry only the caller's
//! intent; which raffle they target is decided by whoever loads the aggregate.

use crate::value_objects::{Money, TicketNumber};
use serde::{Deserialize, Serialize};

/// Open a new raffle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRaffle {
    /// Title shown to buyers
    pub title: String,
    /// Size of the ticket pool
    pub number_of_tickets: u32,
    /// Price of one ticket
    pub price: Money,
}

impl CreateRaffle {
    /// Build the command
    pub fn new(title: impl Into<String>, number_of_tickets: u32, price: Money) -> Self {
        Self {
            title: title.into(),
            number_of_tickets,
            price,
        }
    }
}

/// Buy one ticket, optionally a specific one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyTicket {
    /// Who is buying
    pub buyer_name: String,
    /// Specific ticket wanted; the lowest available one otherwise
    #[serde(default)]
    pub ticket_number: Option<TicketNumber>,
}

impl BuyTicket {
    /// Buy whichever ticket is next in line
    pub fn next_available(buyer_name: impl Into<String>) -> Self {
        Self {
            buyer_name: buyer_name.into(),
            ticket_number: None,
        }
    }

    /// Buy a specific ticket
    pub fn numbered(buyer_name: impl Into<String>, ticket_number: TicketNumber) -> Self {
        Self {
            buyer_name: buyer_name.into(),
            ticket_number: Some(ticket_number),
        }
    }
}

/// Draw one more winner among the unselected bought tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectWinner;
