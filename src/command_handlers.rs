// Copyright 2025 Cowboy AI, LLC.

//! Command handlers for raffles
//!
//! Each handler loads the raffle it targets, lets the aggregate decide, and
//! saves whatever was raised. They return only the identifier of what
//! changed; use the query handlers to read state.

use crate::aggregate::AggregateRoot;
use crate::commands::{BuyTicket, CreateRaffle, SelectWinner};
use crate::entity::RaffleId;
use crate::errors::RaffleError;
use crate::persistence::{RaffleRepository, RepositoryError};
use crate::raffle::Raffle;
use crate::selection::WinnerSelector;
use crate::value_objects::TicketNumber;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

/// Errors returned by the command and query handlers
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No events are stored for the requested raffle
    #[error("Raffle not found: {0}")]
    RaffleNotFound(RaffleId),

    /// The aggregate rejected the command
    #[error(transparent)]
    Domain(#[from] RaffleError),

    /// Loading or saving failed
    #[error(transparent)]
    Repository(RepositoryError),
}

impl HandlerError {
    /// Check if the raffle does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, HandlerError::RaffleNotFound(_))
    }
}

impl From<RepositoryError> for HandlerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Domain(e) => HandlerError::Domain(e),
            other => HandlerError::Repository(other),
        }
    }
}

/// Log a rejected command before handing the error back
fn rejected(raffle_id: Option<RaffleId>, command: &'static str, err: RaffleError) -> HandlerError {
    match raffle_id {
        Some(id) => warn!(raffle_id = %id, command, error = %err, "Command rejected"),
        None => warn!(command, error = %err, "Command rejected"),
    }
    HandlerError::Domain(err)
}

async fn load(repository: &dyn RaffleRepository, id: RaffleId) -> Result<Raffle, HandlerError> {
    repository
        .get_by_id(id)
        .await?
        .ok_or(HandlerError::RaffleNotFound(id))
}

/// Handles [`CreateRaffle`]
#[derive(Clone)]
pub struct CreateRaffleHandler {
    repository: Arc<dyn RaffleRepository>,
}

impl CreateRaffleHandler {
    /// Create a handler saving to `repository`
    pub fn new(repository: Arc<dyn RaffleRepository>) -> Self {
        Self { repository }
    }

    /// Open the raffle and return its new id
    pub async fn handle(&self, command: CreateRaffle) -> Result<RaffleId, HandlerError> {
        let mut raffle = Raffle::create(command).map_err(|e| rejected(None, "CreateRaffle", e))?;
        self.repository.save(&mut raffle).await?;
        Ok(raffle.id())
    }
}

/// Handles [`BuyTicket`]
#[derive(Clone)]
pub struct BuyTicketHandler {
    repository: Arc<dyn RaffleRepository>,
}

impl BuyTicketHandler {
    /// Create a handler over `repository`
    pub fn new(repository: Arc<dyn RaffleRepository>) -> Self {
        Self { repository }
    }

    /// Buy a ticket of `raffle_id`, returning its number
    pub async fn handle(&self, raffle_id: RaffleId, command: BuyTicket) -> Result<TicketNumber, HandlerError> {
        let mut raffle = load(self.repository.as_ref(), raffle_id).await?;
        let number = raffle
            .buy_ticket(command)
            .map_err(|e| rejected(Some(raffle_id), "BuyTicket", e))?;
        self.repository.save(&mut raffle).await?;
        Ok(number)
    }
}

/// Handles [`SelectWinner`] with an owned selection strategy
pub struct SelectWinnerHandler {
    repository: Arc<dyn RaffleRepository>,
    selector: Mutex<Box<dyn WinnerSelector>>,
}

impl SelectWinnerHandler {
    /// Create a handler drawing with `selector`
    pub fn new(repository: Arc<dyn RaffleRepository>, selector: impl WinnerSelector + 'static) -> Self {
        Self {
            repository,
            selector: Mutex::new(Box::new(selector)),
        }
    }

    /// Draw the next winner of `raffle_id`, returning the winning number
    pub async fn handle(&self, raffle_id: RaffleId, command: SelectWinner) -> Result<TicketNumber, HandlerError> {
        let mut raffle = load(self.repository.as_ref(), raffle_id).await?;
        let winner = {
            let mut selector = self.selector.lock().await;
            raffle
                .select_winner(command, selector.as_mut())
                .map_err(|e| rejected(Some(raffle_id), "SelectWinner", e))?
        };
        self.repository.save(&mut raffle).await?;
        Ok(winner)
    }
}
