// Copyright 2025 Cowboy AI, LLC.

//! Raffle events enum wrapper
//!
//! Every fact that can happen to a raffle is one variant of [`RaffleEvent`].
//! The enum is internally tagged with `"type"` so stored events stay
//! self-describing.

use crate::entity::RaffleId;
use crate::events::DomainEvent;
use crate::value_objects::{Money, TicketNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enum wrapper for all raffle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RaffleEvent {
    /// A raffle was created with its ticket pool
    RaffleCreated(RaffleCreated),
    /// A ticket was bought by a named buyer
    TicketBought(TicketBought),
    /// A bought ticket was drawn as a winner
    WinnerSelected(WinnerSelected),
}

impl RaffleEvent {
    /// Every `type` tag a stored raffle event may carry
    pub const KINDS: [&'static str; 3] = ["RaffleCreated", "TicketBought", "WinnerSelected"];

    /// The raffle this event belongs to
    pub fn raffle_id(&self) -> RaffleId {
        match self {
            RaffleEvent::RaffleCreated(e) => e.id,
            RaffleEvent::TicketBought(e) => e.raffle_id,
            RaffleEvent::WinnerSelected(e) => e.raffle_id,
        }
    }
}

impl DomainEvent for RaffleEvent {
    fn aggregate_id(&self) -> Uuid {
        *self.raffle_id().as_uuid()
    }

    fn event_type(&self) -> &'static str {
        match self {
            RaffleEvent::RaffleCreated(_) => "RaffleCreated",
            RaffleEvent::TicketBought(_) => "TicketBought",
            RaffleEvent::WinnerSelected(_) => "WinnerSelected",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RaffleEvent::RaffleCreated(e) => e.occurred_at,
            RaffleEvent::TicketBought(e) => e.occurred_at,
            RaffleEvent::WinnerSelected(e) => e.occurred_at,
        }
    }
}

/// Raffle created event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleCreated {
    /// Identity assigned to the raffle, reused verbatim on replay
    pub id: RaffleId,
    /// Title shown to buyers
    pub title: String,
    /// Size of the ticket pool
    pub number_of_tickets: u32,
    /// Price of one ticket
    pub price: Money,
    /// When the raffle was created
    pub occurred_at: DateTime<Utc>,
}

impl RaffleCreated {
    /// Create the event, stamped now
    pub fn new(id: RaffleId, title: impl Into<String>, number_of_tickets: u32, price: Money) -> Self {
        Self {
            id,
            title: title.into(),
            number_of_tickets,
            price,
            occurred_at: Utc::now(),
        }
    }
}

/// Ticket bought event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBought {
    /// The raffle the ticket belongs to
    pub raffle_id: RaffleId,
    /// Who bought the ticket
    pub buyer_name: String,
    /// The ticket that changed hands
    pub ticket_number: TicketNumber,
    /// When the ticket was bought
    pub occurred_at: DateTime<Utc>,
}

impl TicketBought {
    /// Create the event, stamped now
    pub fn new(raffle_id: RaffleId, buyer_name: impl Into<String>, ticket_number: TicketNumber) -> Self {
        Self {
            raffle_id,
            buyer_name: buyer_name.into(),
            ticket_number,
            occurred_at: Utc::now(),
        }
    }
}

/// Winner selected event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSelected {
    /// The raffle the draw happened in
    pub raffle_id: RaffleId,
    /// The winning ticket
    pub ticket_number: TicketNumber,
    /// When the winner was drawn
    pub occurred_at: DateTime<Utc>,
}

impl WinnerSelected {
    /// Create the event, stamped now
    pub fn new(raffle_id: RaffleId, ticket_number: TicketNumber) -> Self {
        Self {
            raffle_id,
            ticket_number,
            occurred_at: Utc::now(),
        }
    }
}

impl From<RaffleCreated> for RaffleEvent {
    fn from(event: RaffleCreated) -> Self {
        RaffleEvent::RaffleCreated(event)
    }
}

impl From<TicketBought> for RaffleEvent {
    fn from(event: TicketBought) -> Self {
        RaffleEvent::TicketBought(event)
    }
}

impl From<WinnerSelected> for RaffleEvent {
    fn from(event: WinnerSelected) -> Self {
        RaffleEvent::WinnerSelected(event)
    }
}
