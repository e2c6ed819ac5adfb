// Copyright 2025 Cowboy AI, LLC.

//! Event-sourced aggregate roots
//!
//! An aggregate root is the single authority over its state. Commands raise
//! events; raising applies the event and buffers it until the persistence
//! layer stores it. Replaying stored events goes through the very same
//! [`AggregateRoot::apply`], so live and rehydrated state cannot drift apart.

use crate::errors::{RaffleError, RaffleResult};
use crate::events::DomainEvent;
use std::fmt;
use tracing::debug;

/// Events raised since the aggregate was last loaded or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBuffer<E> {
    changes: Vec<E>,
}

impl<E> EventBuffer<E> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Append a freshly raised event
    pub fn record(&mut self, event: E) {
        self.changes.push(event);
    }

    /// Buffered events in the order they were raised
    pub fn as_slice(&self) -> &[E] {
        &self.changes
    }

    /// Number of buffered events
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing is waiting to be persisted
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Drop every buffered event
    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for event-sourced aggregate roots
///
/// Implementors supply the state transition ([`apply`](Self::apply)) and
/// access to their version counter and change buffer; raising, replay and
/// buffer management come for free.
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use raffle_draw::{AggregateRoot, DomainEvent, EventBuffer, RaffleResult};
/// use uuid::Uuid;
///
/// #[derive(Debug, Clone)]
/// struct Counted { id: Uuid, at: DateTime<Utc> }
///
/// impl DomainEvent for Counted {
///     fn aggregate_id(&self) -> Uuid { self.id }
///     fn event_type(&self) -> &'static str { "Counted" }
///     fn occurred_at(&self) -> DateTime<Utc> { self.at }
/// }
///
/// struct Counter { id: Uuid, total: u32, version: u64, changes: EventBuffer<Counted> }
///
/// impl AggregateRoot for Counter {
///     type Id = Uuid;
///     type Event = Counted;
///
///     fn initial_state() -> Self {
///         Counter { id: Uuid::nil(), total: 0, version: 0, changes: EventBuffer::new() }
///     }
///     fn id(&self) -> Uuid { self.id }
///     fn version(&self) -> u64 { self.version }
///     fn increment_version(&mut self) { self.version += 1; }
///     fn apply(&mut self, event: &Counted) -> RaffleResult<()> {
///         self.id = event.id;
///         self.total += 1;
///         Ok(())
///     }
///     fn changes(&self) -> &EventBuffer<Counted> { &self.changes }
///     fn changes_mut(&mut self) -> &mut EventBuffer<Counted> { &mut self.changes }
/// }
///
/// let mut counter = Counter::initial_state();
/// counter.raise(Counted { id: Uuid::new_v4(), at: Utc::now() }).unwrap();
/// assert_eq!(counter.version(), 1);
/// assert_eq!(counter.uncommitted_events().len(), 1);
///
/// let replayed = Counter::load_from_history(counter.uncommitted_events().to_vec()).unwrap();
/// assert_eq!(replayed.total, 1);
/// assert!(replayed.uncommitted_events().is_empty());
/// ```
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync + fmt::Display;

    /// The event type this aggregate is sourced from
    type Event: DomainEvent + Clone;

    /// State before any event has been applied
    fn initial_state() -> Self;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Number of events applied so far
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);

    /// Apply one event to the in-memory state
    ///
    /// Must not validate business rules (history is trusted); it only
    /// rejects events that cannot be reconciled with the current state.
    fn apply(&mut self, event: &Self::Event) -> RaffleResult<()>;

    /// Events raised but not yet persisted
    fn changes(&self) -> &EventBuffer<Self::Event>;

    /// Mutable access to the change buffer
    fn changes_mut(&mut self) -> &mut EventBuffer<Self::Event>;

    /// Apply a new event and buffer it for persistence
    fn raise(&mut self, event: Self::Event) -> RaffleResult<()> {
        self.apply(&event)?;
        self.increment_version();
        debug!(
            aggregate_id = %self.id(),
            event_type = event.event_type(),
            version = self.version(),
            "Raised event"
        );
        self.changes_mut().record(event);
        Ok(())
    }

    /// Events raised since the last load or save, oldest first
    fn uncommitted_events(&self) -> &[Self::Event] {
        self.changes().as_slice()
    }

    /// Forget buffered events once they have been persisted
    fn clear_uncommitted(&mut self) {
        self.changes_mut().clear();
    }

    /// Rebuild an aggregate by applying its history in order
    ///
    /// Nothing is raised while replaying, so the returned aggregate has an
    /// empty change buffer.
    fn load_from_history<I>(history: I) -> RaffleResult<Self>
    where
        I: IntoIterator<Item = Self::Event>,
    {
        let mut aggregate = Self::initial_state();
        for event in history {
            aggregate.apply(&event)?;
            aggregate.increment_version();
        }

        if aggregate.version() == 0 {
            return Err(RaffleError::invalid_history("history contains no events"));
        }

        debug!(
            aggregate_id = %aggregate.id(),
            version = aggregate.version(),
            "Rehydrated aggregate from history"
        );
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_buffer_records_in_order_and_clears() {
        let mut buffer = EventBuffer::new();
        assert!(buffer.is_empty());

        buffer.record("created");
        buffer.record("bought");
        assert_eq!(buffer.as_slice(), &["created", "bought"]);
        assert_eq!(buffer.len(), 2);

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
