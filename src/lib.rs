//! # Raffle Draw
//!
//! An event-sourced raffle: a fixed pool of numbered tickets, bought one at a
//! time by named buyers, from which winners are drawn without replacement.
//!
//! This crate provides:
//! - **Aggregate**: [`Raffle`], the only place raffle state changes
//! - **Domain Events**: [`RaffleEvent`], the persisted history of a raffle
//! - **Commands**: [`CreateRaffle`], [`BuyTicket`], [`SelectWinner`]
//! - **Selection**: the pluggable [`WinnerSelector`] strategy
//! - **Persistence**: [`EventStore`] backends and the [`RaffleRepository`] replaying them
//! - **Handlers**: use-case handlers and the [`RaffleView`] read model
//!
//! ## Design Principles
//!
//! 1. **Events are the truth**: state is the fold of a raffle's events, and
//!    the same apply logic serves fresh commands and replay
//! 2. **Deterministic core**: the aggregate never does I/O; randomness enters
//!    only through a [`WinnerSelector`]
//! 3. **Type Safety**: phantom-typed ids and newtype value objects
//!
//! ## Example
//!
//! ```rust
//! use raffle_draw::{
//!     AggregateRoot, BuyTicket, CreateRaffle, LastCandidateSelector, Money, Raffle,
//!     SelectWinner, TicketNumber,
//! };
//!
//! let mut raffle = Raffle::create(CreateRaffle::new("Spring Raffle", 3, Money::from_major(5))).unwrap();
//! raffle.buy_ticket(BuyTicket::next_available("Ann")).unwrap();
//! raffle.buy_ticket(BuyTicket::next_available("Bo")).unwrap();
//!
//! let winner = raffle.select_winner(SelectWinner, &mut LastCandidateSelector).unwrap();
//! assert_eq!(winner, TicketNumber::new(1001));
//!
//! let replayed = Raffle::load_from_history(raffle.uncommitted_events().to_vec()).unwrap();
//! assert_eq!(replayed.version(), raffle.version());
//! ```

#![warn(missing_docs)]

mod aggregate;
mod command_handlers;
mod commands;
mod config;
mod domain_events;
mod entity;
mod errors;
mod events;
mod query_handlers;
mod raffle;
mod selection;
mod ticket;
mod value_objects;
pub mod infrastructure;
pub mod persistence;

pub use aggregate::{AggregateRoot, EventBuffer};
pub use command_handlers::{BuyTicketHandler, CreateRaffleHandler, HandlerError, SelectWinnerHandler};
pub use commands::{BuyTicket, CreateRaffle, SelectWinner};
pub use config::{build_repository, StorageBackend, StorageConfig, STORAGE_DIR_ENV};
pub use domain_events::{RaffleCreated, RaffleEvent, TicketBought, WinnerSelected};
pub use entity::{EntityId, RaffleId, RaffleMarker};
pub use errors::{RaffleError, RaffleResult};
pub use events::DomainEvent;
pub use infrastructure::{EventStore, EventStoreError, FileEventStore, InMemoryEventStore, StoredEvent};
pub use persistence::{EventSourcedRaffleRepository, RaffleRepository, RepositoryError};
pub use query_handlers::{GetRaffleHandler, ListRafflesHandler, RaffleView, TicketView};
pub use raffle::Raffle;
pub use selection::{LastCandidateSelector, RandomWinnerSelector, WinnerSelector};
pub use ticket::Ticket;
pub use value_objects::{Money, TicketNumber, FIRST_TICKET_NUMBER, MAX_TICKETS};
