// Copyright 2025 Cowboy AI, LLC.

//! Query handlers and read models for raffles

use crate::aggregate::AggregateRoot;
use crate::command_handlers::HandlerError;
use crate::entity::RaffleId;
use crate::persistence::RaffleRepository;
use crate::raffle::Raffle;
use crate::ticket::Ticket;
use crate::value_objects::{Money, TicketNumber};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A sold ticket as shown to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    /// Ticket number
    pub number: TicketNumber,
    /// Buyer's name
    pub holder: String,
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            number: ticket.number(),
            holder: ticket.holder().unwrap_or_default().to_string(),
        }
    }
}

/// Read model of one raffle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleView {
    /// Raffle id
    pub id: RaffleId,
    /// Title shown to buyers
    pub title: String,
    /// Price of one ticket
    pub ticket_price: Money,
    /// Size of the ticket pool
    pub number_of_tickets: u32,
    /// How many tickets can still be bought
    pub available_tickets: usize,
    /// Sold tickets in purchase order
    pub bought_tickets: Vec<TicketView>,
    /// Winning tickets in draw order
    pub winners: Vec<TicketView>,
}

impl From<&Raffle> for RaffleView {
    fn from(raffle: &Raffle) -> Self {
        Self {
            id: raffle.id(),
            title: raffle.title().to_string(),
            ticket_price: raffle.ticket_price(),
            number_of_tickets: raffle.number_of_tickets(),
            available_tickets: raffle.available_tickets().len(),
            bought_tickets: raffle.bought_tickets().map(TicketView::from).collect(),
            winners: raffle.selected_tickets().map(TicketView::from).collect(),
        }
    }
}

/// Answers "show me raffle X"
#[derive(Clone)]
pub struct GetRaffleHandler {
    repository: Arc<dyn RaffleRepository>,
}

impl GetRaffleHandler {
    /// Create a handler reading from `repository`
    pub fn new(repository: Arc<dyn RaffleRepository>) -> Self {
        Self { repository }
    }

    /// Current view of `raffle_id`
    pub async fn handle(&self, raffle_id: RaffleId) -> Result<RaffleView, HandlerError> {
        let raffle = self
            .repository
            .get_by_id(raffle_id)
            .await?
            .ok_or(HandlerError::RaffleNotFound(raffle_id))?;
        Ok(RaffleView::from(&raffle))
    }
}

/// Answers "show me every raffle"
#[derive(Clone)]
pub struct ListRafflesHandler {
    repository: Arc<dyn RaffleRepository>,
}

impl ListRafflesHandler {
    /// Create a handler reading from `repository`
    pub fn new(repository: Arc<dyn RaffleRepository>) -> Self {
        Self { repository }
    }

    /// Views of every stored raffle, ordered by id
    pub async fn handle(&self) -> Result<Vec<RaffleView>, HandlerError> {
        let raffles = self.repository.get_all().await?;
        Ok(raffles.iter().map(RaffleView::from).collect())
    }
}
