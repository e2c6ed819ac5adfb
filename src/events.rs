// Copyright (c) 2025 - Cowboy AI, LLC.

//! Domain events
//!
//! Events represent facts that have occurred in the domain. They are immutable
//! and form the basis of event sourcing: aggregate state is nothing more than
//! the fold of its events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all domain events
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use raffle_draw::DomainEvent;
/// use uuid::Uuid;
///
/// #[derive(Debug)]
/// struct DrawScheduled {
///     raffle_id: Uuid,
///     occurred_at: DateTime<Utc>,
/// }
///
/// impl DomainEvent for DrawScheduled {
///     fn aggregate_id(&self) -> Uuid {
///         self.raffle_id
///     }
///
///     fn event_type(&self) -> &'static str {
///         "DrawScheduled"
///     }
///
///     fn occurred_at(&self) -> DateTime<Utc> {
///         self.occurred_at
///     }
/// }
///
/// let event = DrawScheduled { raffle_id: Uuid::new_v4(), occurred_at: Utc::now() };
/// assert_eq!(event.event_type(), "DrawScheduled");
/// assert_eq!(event.version(), "v1");
/// ```
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// When the event was raised
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}
