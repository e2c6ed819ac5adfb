// Copyright 2025 Cowboy AI, LLC.

//! Value objects for raffles
//!
//! Immutable types defined entirely by their attributes: ticket numbers and
//! ticket prices.

use crate::errors::RaffleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of the first ticket in every raffle
pub const FIRST_TICKET_NUMBER: u32 = 1000;

/// Largest ticket pool a single raffle may hold
pub const MAX_TICKETS: u32 = 1_000_000;

/// Number printed on a raffle ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(u32);

impl TicketNumber {
    /// Wrap a raw ticket number
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the raw ticket number
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TicketNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Monetary amount in cents (avoids floating point issues)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Create an amount from cents
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create an amount from whole currency units
    ///
    /// # Panics
    ///
    /// Panics if the amount in cents does not fit in a `u64`; use
    /// [`Money::checked_from_major`] for untrusted input.
    pub const fn from_major(units: u64) -> Self {
        match Self::checked_from_major(units) {
            Some(money) => money,
            None => panic!("Money::from_major overflows u64 cents"),
        }
    }

    /// Create an amount from whole currency units, `None` on overflow
    pub const fn checked_from_major(units: u64) -> Option<Self> {
        match units.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Get the amount in cents
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Check if this amount is zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = RaffleError;

    /// Parse a decimal amount such as `5`, `5.5` or `5.00`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RaffleError::validation(format!("Invalid amount: {s:?}"));
        let trimmed = s.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Money)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("5", 500 ; "whole units")]
    #[test_case("5.5", 550 ; "one fractional digit")]
    #[test_case("5.00", 500 ; "two fractional digits")]
    #[test_case(" 0.99 ", 99 ; "surrounding whitespace")]
    fn test_money_parses(input: &str, cents: u64) {
        assert_eq!(input.parse::<Money>().unwrap(), Money::from_cents(cents));
    }

    #[test_case("" ; "empty")]
    #[test_case("-5.00" ; "negative")]
    #[test_case("5.001" ; "too precise")]
    #[test_case(".50" ; "missing units")]
    #[test_case("five" ; "not a number")]
    fn test_money_rejects(input: &str) {
        assert!(input.parse::<Money>().unwrap_err().is_validation_error());
    }

    #[test]
    fn test_money_from_major_checks_overflow() {
        assert_eq!(Money::checked_from_major(7), Some(Money::from_cents(700)));
        assert_eq!(Money::checked_from_major(u64::MAX / 10), None);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_money_from_major_panics_on_overflow() {
        let _ = Money::from_major(u64::MAX / 10);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_major(5).to_string(), "5.00");
        assert_eq!(Money::from_cents(1205).to_string(), "12.05");
    }

    #[test]
    fn test_values_serialize_transparently() {
        assert_eq!(serde_json::to_string(&TicketNumber::new(1000)).unwrap(), "1000");
        assert_eq!(serde_json::to_string(&Money::from_cents(500)).unwrap(), "500");
    }
}
