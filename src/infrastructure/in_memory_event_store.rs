// Copyright 2025 Cowboy AI, LLC.

//! In-memory event store

use crate::domain_events::RaffleEvent;
use crate::entity::RaffleId;
use crate::infrastructure::event_store::{sequence_events, EventStore, EventStoreError, StoredEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Event store keeping every stream in process memory
///
/// Clones share the same streams.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<RaffleId, Vec<StoredEvent>>>>,
}

impl InMemoryEventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored event across all aggregates, for diagnostics
    pub async fn all_events(&self) -> Vec<StoredEvent> {
        let events = self.events.read().await;
        let mut all: Vec<StoredEvent> = events.values().flatten().cloned().collect();
        all.sort_by_key(|e| e.stored_at);
        all
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        aggregate_id: RaffleId,
        events: Vec<RaffleEvent>,
        expected_version: u64,
    ) -> Result<u64, EventStoreError> {
        let mut streams = self.events.write().await;
        let stream = streams.entry(aggregate_id).or_default();

        let current = stream.len() as u64;
        if current != expected_version {
            return Err(EventStoreError::ConcurrencyConflict {
                expected: expected_version,
                current,
            });
        }

        stream.extend(sequence_events(aggregate_id, current, events));
        let version = stream.len() as u64;

        debug!(%aggregate_id, version, "Appended events in memory");
        Ok(version)
    }

    async fn load_events(&self, aggregate_id: RaffleId) -> Result<Vec<StoredEvent>, EventStoreError> {
        let streams = self.events.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn aggregate_ids(&self) -> Result<Vec<RaffleId>, EventStoreError> {
        let streams = self.events.read().await;
        let mut ids: Vec<RaffleId> = streams
            .iter()
            .filter(|(_, stream)| !stream.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
