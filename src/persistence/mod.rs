// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! Raffles are stored as their event streams. The repository replays a
//! stream through [`AggregateRoot::load_from_history`](crate::AggregateRoot::load_from_history)
//! on load and appends the uncommitted buffer on save, using the number of
//! already-stored events as the expected version.

pub mod raffle_repository;

pub use raffle_repository::{EventSourcedRaffleRepository, RaffleRepository, RepositoryError};
