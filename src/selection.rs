// Copyright 2025 Cowboy AI, LLC.

//! Winner selection strategies
//!
//! Non-determinism lives here and nowhere else: the raffle hands a selector
//! the ordered candidate numbers and records whatever it picks.

use crate::value_objects::TicketNumber;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy choosing one winning ticket from a list of candidates
///
/// Callers never pass an empty slice. Implementations must return one of the
/// given numbers.
pub trait WinnerSelector: Send {
    /// Pick the winner among `candidates`
    fn choose_winner(&mut self, candidates: &[TicketNumber]) -> TicketNumber;
}

/// Uniform pseudo-random selection from an owned generator
#[derive(Debug, Clone)]
pub struct RandomWinnerSelector {
    rng: StdRng,
}

impl RandomWinnerSelector {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed, for reproducible draws
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomWinnerSelector {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl WinnerSelector for RandomWinnerSelector {
    fn choose_winner(&mut self, candidates: &[TicketNumber]) -> TicketNumber {
        let index = self.rng.gen_range(0..candidates.len());
        candidates[index]
    }
}

/// Always picks the last candidate offered
#[derive(Debug, Clone, Copy, Default)]
pub struct LastCandidateSelector;

impl WinnerSelector for LastCandidateSelector {
    fn choose_winner(&mut self, candidates: &[TicketNumber]) -> TicketNumber {
        candidates[candidates.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(raw: &[u32]) -> Vec<TicketNumber> {
        raw.iter().copied().map(TicketNumber::new).collect()
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let candidates = numbers(&[1000, 1001, 1002, 1003, 1004, 1005]);
        let mut first = RandomWinnerSelector::seeded(42);
        let mut second = RandomWinnerSelector::seeded(42);

        for _ in 0..20 {
            assert_eq!(
                first.choose_winner(&candidates),
                second.choose_winner(&candidates)
            );
        }
    }

    #[test]
    fn test_random_selector_stays_within_candidates() {
        let candidates = numbers(&[1003, 1007, 1011]);
        let mut selector = RandomWinnerSelector::from_entropy();

        for _ in 0..100 {
            assert!(candidates.contains(&selector.choose_winner(&candidates)));
        }
    }

    #[test]
    fn test_single_candidate_always_wins() {
        let candidates = numbers(&[1000]);
        assert_eq!(
            RandomWinnerSelector::seeded(7).choose_winner(&candidates),
            TicketNumber::new(1000)
        );
        assert_eq!(
            LastCandidateSelector.choose_winner(&candidates),
            TicketNumber::new(1000)
        );
    }

    #[test]
    fn test_last_candidate_selector() {
        let candidates = numbers(&[1002, 1000, 1001]);
        assert_eq!(
            LastCandidateSelector.choose_winner(&candidates),
            TicketNumber::new(1001)
        );
    }
}
