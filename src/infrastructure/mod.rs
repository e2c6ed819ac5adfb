// Copyright 2025 Cowboy AI, LLC.

//! Infrastructure layer for raffle persistence
//!
//! This module contains the event store abstraction and its backends:
//! - [`InMemoryEventStore`] for tests and ephemeral use
//! - [`FileEventStore`] keeping one JSON file per raffle

pub mod event_store;
pub mod file_event_store;
pub mod in_memory_event_store;

pub use event_store::{EventStore, EventStoreError, StoredEvent};
pub use file_event_store::FileEventStore;
pub use in_memory_event_store::InMemoryEventStore;
