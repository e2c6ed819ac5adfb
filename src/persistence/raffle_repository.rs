// Copyright 2025 Cowboy AI, LLC.

//! Event-sourced raffle repository

use crate::aggregate::AggregateRoot;
use crate::entity::RaffleId;
use crate::errors::RaffleError;
use crate::infrastructure::{EventStore, EventStoreError, StoredEvent};
use crate::raffle::Raffle;
use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info};

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing event store failed
    #[error("Event store error: {0}")]
    Store(#[from] EventStoreError),

    /// Stored events could not be replayed
    #[error(transparent)]
    Domain(#[from] RaffleError),
}

impl RepositoryError {
    /// Check if another writer saved the raffle first
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, RepositoryError::Store(e) if e.is_concurrency_error())
    }
}

/// Persistence contract for raffles
#[async_trait]
pub trait RaffleRepository: Send + Sync {
    /// Persist the raffle's uncommitted events, then clear them
    ///
    /// On error the buffer is left untouched so the caller can inspect or
    /// discard it.
    async fn save(&self, raffle: &mut Raffle) -> Result<(), RepositoryError>;

    /// Rebuild a raffle from its stored history, `None` if nothing is stored
    async fn get_by_id(&self, id: RaffleId) -> Result<Option<Raffle>, RepositoryError>;

    /// Rebuild every stored raffle, ordered by id
    async fn get_all(&self) -> Result<Vec<Raffle>, RepositoryError>;
}

/// [`RaffleRepository`] replaying streams from an [`EventStore`]
#[derive(Debug)]
pub struct EventSourcedRaffleRepository<S> {
    store: S,
}

impl<S: EventStore> EventSourcedRaffleRepository<S> {
    /// Create a repository over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Check a loaded stream is gap-free and belongs to `id` before replaying it
fn ensure_stream_integrity(id: RaffleId, stream: &[StoredEvent]) -> Result<(), RaffleError> {
    for (expected, stored) in (1u64..).zip(stream) {
        if stored.sequence != expected {
            return Err(RaffleError::invalid_history(format!(
                "stream {id} has sequence {} where {expected} was expected",
                stored.sequence
            )));
        }
        if stored.aggregate_id != id || stored.event.raffle_id() != id {
            return Err(RaffleError::invalid_history(format!(
                "stream {id} contains an event of raffle {}",
                stored.event.raffle_id()
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl<S: EventStore> RaffleRepository for EventSourcedRaffleRepository<S> {
    async fn save(&self, raffle: &mut Raffle) -> Result<(), RepositoryError> {
        let pending = raffle.uncommitted_events().to_vec();
        if pending.is_empty() {
            debug!(raffle_id = %raffle.id(), "Nothing to save");
            return Ok(());
        }

        let expected_version = raffle.version() - pending.len() as u64;
        let count = pending.len();
        let version = self
            .store
            .append_events(raffle.id(), pending, expected_version)
            .await?;

        raffle.clear_uncommitted();
        info!(raffle_id = %raffle.id(), events = count, version, "Saved raffle");
        Ok(())
    }

    async fn get_by_id(&self, id: RaffleId) -> Result<Option<Raffle>, RepositoryError> {
        let stream = self.store.load_events(id).await?;
        if stream.is_empty() {
            return Ok(None);
        }

        ensure_stream_integrity(id, &stream)?;
        let raffle = Raffle::load_from_history(stream.into_iter().map(|stored| stored.event))?;
        Ok(Some(raffle))
    }

    async fn get_all(&self) -> Result<Vec<Raffle>, RepositoryError> {
        let ids = self.store.aggregate_ids().await?;
        let loaded = try_join_all(ids.into_iter().map(|id| self.get_by_id(id))).await?;

        let mut raffles: Vec<Raffle> = loaded.into_iter().flatten().collect();
        raffles.sort_by_key(|raffle| raffle.id());
        Ok(raffles)
    }
}
