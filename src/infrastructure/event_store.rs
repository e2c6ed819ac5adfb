// Copyright 2025 Cowboy AI, LLC.

//! Event store trait and related types

use crate::domain_events::RaffleEvent;
use crate::entity::RaffleId;
use crate::errors::RaffleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with the event store
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Reading or writing the backing storage failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize event data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Optimistic concurrency check failed
    #[error("Concurrency conflict: expected version {expected}, but current version is {current}")]
    ConcurrencyConflict {
        /// The version that was expected
        expected: u64,
        /// The actual current version
        current: u64,
    },

    /// Stored data does not have the expected shape
    #[error("Corrupted event data: {0}")]
    Corrupted(String),

    /// Stored data names something the domain does not know
    #[error(transparent)]
    Domain(#[from] RaffleError),
}

impl EventStoreError {
    /// Check if this is a concurrency error
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, EventStoreError::ConcurrencyConflict { .. })
    }
}

/// A stored event with its position in the aggregate's stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Aggregate ID this event belongs to
    pub aggregate_id: RaffleId,

    /// Event sequence number within the aggregate, starting at 1
    pub sequence: u64,

    /// When the event was stored
    pub stored_at: DateTime<Utc>,

    /// The actual domain event
    pub event: RaffleEvent,
}

impl StoredEvent {
    /// Wrap a freshly appended event
    pub fn new(aggregate_id: RaffleId, sequence: u64, event: RaffleEvent) -> Self {
        Self {
            aggregate_id,
            sequence,
            stored_at: Utc::now(),
            event,
        }
    }
}

/// Stamp `events` with consecutive sequence numbers following `current_version`
pub(crate) fn sequence_events(
    aggregate_id: RaffleId,
    current_version: u64,
    events: Vec<RaffleEvent>,
) -> Vec<StoredEvent> {
    events
        .into_iter()
        .zip(current_version + 1..)
        .map(|(event, sequence)| StoredEvent::new(aggregate_id, sequence, event))
        .collect()
}

/// Event store trait for persisting and retrieving raffle events
#[async_trait]
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Append events to an aggregate's stream
    ///
    /// `expected_version` is the number of events the writer believes are
    /// already stored; a mismatch fails with
    /// [`EventStoreError::ConcurrencyConflict`] and stores nothing. Returns
    /// the new version.
    async fn append_events(
        &self,
        aggregate_id: RaffleId,
        events: Vec<RaffleEvent>,
        expected_version: u64,
    ) -> Result<u64, EventStoreError>;

    /// Get all events of an aggregate in sequence order
    async fn load_events(&self, aggregate_id: RaffleId) -> Result<Vec<StoredEvent>, EventStoreError>;

    /// IDs of every aggregate with at least one stored event
    async fn aggregate_ids(&self) -> Result<Vec<RaffleId>, EventStoreError>;
}
