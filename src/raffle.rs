// Copyright 2025 Cowboy AI, LLC.

//! The raffle aggregate
//!
//! Owns the ticket pools of one raffle. Every change goes through an event:
//! commands validate against the current pools, raise exactly one
//! [`RaffleEvent`], and [`Raffle::apply`](AggregateRoot::apply) moves tickets
//! between pools. A ticket only ever moves forward:
//!
//! ```text
//! available ──TicketBought──▶ bought ──WinnerSelected──▶ bought + selected
//! ```
//!
//! Pools are [`IndexMap`]s keyed by ticket number. The available pool is
//! built in ascending order and removals keep that order, so the lowest
//! available ticket is always the first entry. The bought pool iterates in
//! purchase order, which is the candidate order offered to a
//! [`WinnerSelector`].

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::commands::{BuyTicket, CreateRaffle, SelectWinner};
use crate::domain_events::{RaffleCreated, RaffleEvent, TicketBought, WinnerSelected};
use crate::entity::RaffleId;
use crate::errors::{RaffleError, RaffleResult};
use crate::selection::WinnerSelector;
use crate::ticket::Ticket;
use crate::value_objects::{Money, TicketNumber, FIRST_TICKET_NUMBER, MAX_TICKETS};
use indexmap::map::Values;
use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;

/// Event-sourced raffle
#[derive(Debug, Clone)]
pub struct Raffle {
    id: RaffleId,
    title: String,
    ticket_price: Money,
    number_of_tickets: u32,
    available_tickets: IndexMap<TicketNumber, Ticket>,
    bought_tickets: IndexMap<TicketNumber, Ticket>,
    selected_tickets: IndexMap<TicketNumber, Ticket>,
    version: u64,
    changes: EventBuffer<RaffleEvent>,
}

impl Raffle {
    /// Open a new raffle with a fresh identity
    ///
    /// The returned raffle carries the `RaffleCreated` event in its
    /// uncommitted buffer.
    pub fn create(command: CreateRaffle) -> RaffleResult<Self> {
        let CreateRaffle {
            title,
            number_of_tickets,
            price,
        } = command;

        if title.trim().is_empty() {
            return Err(RaffleError::validation("Title cannot be empty"));
        }
        if number_of_tickets == 0 {
            return Err(RaffleError::validation(
                "Number of tickets must be greater than zero",
            ));
        }
        if number_of_tickets > MAX_TICKETS {
            return Err(RaffleError::validation(format!(
                "Number of tickets cannot exceed {MAX_TICKETS}"
            )));
        }
        if price.is_zero() {
            return Err(RaffleError::validation(
                "Ticket price must be greater than zero",
            ));
        }

        let mut raffle = Self::initial_state();
        raffle.raise(RaffleCreated::new(RaffleId::new(), title, number_of_tickets, price).into())?;

        info!(
            raffle_id = %raffle.id,
            title = %raffle.title,
            number_of_tickets,
            price = %price,
            "Raffle created"
        );
        Ok(raffle)
    }

    /// Sell a ticket and return its number
    ///
    /// Without a requested number the lowest available ticket is sold.
    pub fn buy_ticket(&mut self, command: BuyTicket) -> RaffleResult<TicketNumber> {
        if self.available_tickets.is_empty() {
            return Err(RaffleError::NoTicketsAvailable);
        }
        if command.buyer_name.trim().is_empty() {
            return Err(RaffleError::validation("Buyer name cannot be empty"));
        }

        let ticket_number = match command.ticket_number {
            Some(requested) if self.available_tickets.contains_key(&requested) => requested,
            Some(requested) => return Err(RaffleError::TicketUnavailable(requested)),
            None => match self.available_tickets.keys().next() {
                Some(lowest) => *lowest,
                None => return Err(RaffleError::NoTicketsAvailable),
            },
        };

        self.raise(TicketBought::new(self.id, command.buyer_name, ticket_number).into())?;
        Ok(ticket_number)
    }

    /// Draw one more winner and return the winning number
    ///
    /// Tickets already drawn are never offered again, so repeated calls
    /// produce distinct winners until the bought pool is exhausted.
    pub fn select_winner<S>(&mut self, _command: SelectWinner, selector: &mut S) -> RaffleResult<TicketNumber>
    where
        S: WinnerSelector + ?Sized,
    {
        if self.bought_tickets.is_empty() {
            return Err(RaffleError::NoTicketsSold);
        }

        let candidates = self.remaining_candidates();
        if candidates.is_empty() {
            return Err(RaffleError::NoRemainingCandidates);
        }

        let winner = selector.choose_winner(&candidates);
        if !candidates.contains(&winner) {
            return Err(RaffleError::SelectionOutOfPool(winner));
        }

        self.raise(WinnerSelected::new(self.id, winner).into())?;

        info!(
            raffle_id = %self.id,
            ticket_number = %winner,
            candidates = candidates.len(),
            "Winner selected"
        );
        Ok(winner)
    }

    /// Bought tickets not yet drawn, in purchase order
    pub fn remaining_candidates(&self) -> Vec<TicketNumber> {
        self.bought_tickets
            .keys()
            .filter(|number| !self.selected_tickets.contains_key(*number))
            .copied()
            .collect()
    }

    /// Title shown to buyers
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Price of one ticket
    pub const fn ticket_price(&self) -> Money {
        self.ticket_price
    }

    /// Size of the ticket pool
    pub const fn number_of_tickets(&self) -> u32 {
        self.number_of_tickets
    }

    /// Unsold tickets, lowest number first
    pub fn available_tickets(&self) -> Values<'_, TicketNumber, Ticket> {
        self.available_tickets.values()
    }

    /// Sold tickets in purchase order
    pub fn bought_tickets(&self) -> Values<'_, TicketNumber, Ticket> {
        self.bought_tickets.values()
    }

    /// Winning tickets in draw order
    pub fn selected_tickets(&self) -> Values<'_, TicketNumber, Ticket> {
        self.selected_tickets.values()
    }

    /// Look up any ticket of this raffle by number
    pub fn ticket(&self, number: TicketNumber) -> Option<&Ticket> {
        self.available_tickets
            .get(&number)
            .or_else(|| self.bought_tickets.get(&number))
    }

    fn is_created(&self) -> bool {
        self.version > 0
    }

    fn ensure_same_raffle(&self, raffle_id: RaffleId, event_type: &str) -> RaffleResult<()> {
        if !self.is_created() {
            return Err(RaffleError::invalid_history(format!(
                "{event_type} before RaffleCreated"
            )));
        }
        if raffle_id != self.id {
            return Err(RaffleError::invalid_history(format!(
                "{event_type} for raffle {raffle_id} replayed into raffle {}",
                self.id
            )));
        }
        Ok(())
    }

    fn when_created(&mut self, event: &RaffleCreated) -> RaffleResult<()> {
        if self.is_created() {
            return Err(RaffleError::invalid_history(format!(
                "raffle {} created twice",
                self.id
            )));
        }

        if event.number_of_tickets == 0 || event.number_of_tickets > MAX_TICKETS {
            return Err(RaffleError::invalid_history(format!(
                "raffle created with {} tickets, expected 1 to {MAX_TICKETS}",
                event.number_of_tickets
            )));
        }
        let last = FIRST_TICKET_NUMBER + event.number_of_tickets;

        self.id = event.id;
        self.title = event.title.clone();
        self.ticket_price = event.price;
        self.number_of_tickets = event.number_of_tickets;
        self.available_tickets = (FIRST_TICKET_NUMBER..last)
            .map(|n| (TicketNumber::new(n), Ticket::available(TicketNumber::new(n))))
            .collect();
        Ok(())
    }

    fn when_ticket_bought(&mut self, event: &TicketBought) -> RaffleResult<()> {
        self.ensure_same_raffle(event.raffle_id, "TicketBought")?;

        let number = event.ticket_number;
        let Some(mut ticket) = self.available_tickets.shift_remove(&number) else {
            let reason = if self.bought_tickets.contains_key(&number) {
                "was already bought"
            } else {
                "is not part of the raffle"
            };
            return Err(RaffleError::invalid_history(format!(
                "TicketBought for ticket {number} which {reason}"
            )));
        };

        ticket.assign_holder(event.buyer_name.clone());
        self.bought_tickets.insert(number, ticket);
        Ok(())
    }

    fn when_winner_selected(&mut self, event: &WinnerSelected) -> RaffleResult<()> {
        self.ensure_same_raffle(event.raffle_id, "WinnerSelected")?;

        let number = event.ticket_number;
        if self.selected_tickets.contains_key(&number) {
            return Err(RaffleError::invalid_history(format!(
                "ticket {number} selected twice"
            )));
        }
        let ticket = self.bought_tickets.get(&number).cloned().ok_or_else(|| {
            RaffleError::invalid_history(format!(
                "WinnerSelected for ticket {number} which was never bought"
            ))
        })?;

        self.selected_tickets.insert(number, ticket);
        Ok(())
    }
}

impl AggregateRoot for Raffle {
    type Id = RaffleId;
    type Event = RaffleEvent;

    fn initial_state() -> Self {
        Self {
            id: RaffleId::from_uuid(Uuid::nil()),
            title: String::new(),
            ticket_price: Money::default(),
            number_of_tickets: 0,
            available_tickets: IndexMap::new(),
            bought_tickets: IndexMap::new(),
            selected_tickets: IndexMap::new(),
            version: 0,
            changes: EventBuffer::new(),
        }
    }

    fn id(&self) -> RaffleId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }

    fn apply(&mut self, event: &RaffleEvent) -> RaffleResult<()> {
        match event {
            RaffleEvent::RaffleCreated(e) => self.when_created(e),
            RaffleEvent::TicketBought(e) => self.when_ticket_bought(e),
            RaffleEvent::WinnerSelected(e) => self.when_winner_selected(e),
        }
    }

    fn changes(&self) -> &EventBuffer<RaffleEvent> {
        &self.changes
    }

    fn changes_mut(&mut self) -> &mut EventBuffer<RaffleEvent> {
        &mut self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::LastCandidateSelector;
    use test_case::test_case;

    fn numbers<'a>(tickets: impl Iterator<Item = &'a Ticket>) -> Vec<u32> {
        tickets.map(|t| t.number().value()).collect()
    }

    fn spring_raffle(tickets: u32) -> Raffle {
        Raffle::create(CreateRaffle::new("Spring Raffle", tickets, Money::from_major(5))).unwrap()
    }

    #[test]
    fn test_create_populates_available_pool() {
        let raffle = spring_raffle(3);

        assert_eq!(raffle.title(), "Spring Raffle");
        assert_eq!(raffle.ticket_price(), Money::from_cents(500));
        assert_eq!(raffle.number_of_tickets(), 3);
        assert_eq!(numbers(raffle.available_tickets()), vec![1000, 1001, 1002]);
        assert_eq!(raffle.bought_tickets().len(), 0);
        assert_eq!(raffle.selected_tickets().len(), 0);
        assert_eq!(raffle.version(), 1);
    }

    #[test]
    fn test_create_raises_created_event_with_own_id() {
        let raffle = spring_raffle(2);

        match raffle.uncommitted_events() {
            [RaffleEvent::RaffleCreated(created)] => {
                assert_eq!(created.id, raffle.id());
                assert_eq!(created.number_of_tickets, 2);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test_case("", 3, 500 ; "empty title")]
    #[test_case("   ", 3, 500 ; "blank title")]
    #[test_case("Spring Raffle", 0, 500 ; "no tickets")]
    #[test_case("Spring Raffle", MAX_TICKETS + 1, 500 ; "pool too large")]
    #[test_case("Spring Raffle", u32::MAX, 500 ; "ticket range overflow")]
    #[test_case("Spring Raffle", 3, 0 ; "free tickets")]
    fn test_create_rejects_invalid_input(title: &str, tickets: u32, cents: u64) {
        let err = Raffle::create(CreateRaffle::new(title, tickets, Money::from_cents(cents)))
            .unwrap_err();
        assert!(err.is_validation_error(), "unexpected error: {err}");
    }

    #[test]
    fn test_buy_picks_lowest_available_ticket() {
        let mut raffle = spring_raffle(3);
        raffle
            .buy_ticket(BuyTicket::numbered("Bo", TicketNumber::new(1000)))
            .unwrap();

        let number = raffle.buy_ticket(BuyTicket::next_available("Ann")).unwrap();

        assert_eq!(number, TicketNumber::new(1001));
        assert_eq!(numbers(raffle.available_tickets()), vec![1002]);
        assert_eq!(
            raffle.ticket(TicketNumber::new(1001)).and_then(Ticket::holder),
            Some("Ann")
        );
    }

    #[test]
    fn test_buy_rejects_unavailable_ticket_without_change() {
        let mut raffle = spring_raffle(3);
        raffle
            .buy_ticket(BuyTicket::numbered("Ann", TicketNumber::new(1001)))
            .unwrap();

        for requested in [1001, 999, 1003] {
            let err = raffle
                .buy_ticket(BuyTicket::numbered("Bo", TicketNumber::new(requested)))
                .unwrap_err();
            assert_eq!(err, RaffleError::TicketUnavailable(TicketNumber::new(requested)));
        }

        assert_eq!(raffle.bought_tickets().len(), 1);
        assert_eq!(raffle.uncommitted_events().len(), 2);
    }

    #[test]
    fn test_buy_checks_stock_before_buyer_name() {
        let mut raffle = spring_raffle(1);
        raffle.buy_ticket(BuyTicket::next_available("Ann")).unwrap();

        let version = raffle.version();

        assert_eq!(
            raffle.buy_ticket(BuyTicket::next_available("")),
            Err(RaffleError::NoTicketsAvailable)
        );
        assert_eq!(
            raffle.buy_ticket(BuyTicket::numbered("Bo", TicketNumber::new(1000))),
            Err(RaffleError::NoTicketsAvailable)
        );
        assert_eq!(raffle.version(), version);
        assert_eq!(raffle.uncommitted_events().len(), 2);
        assert_eq!(raffle.available_tickets().len(), 0);
        assert_eq!(numbers(raffle.bought_tickets()), vec![1000]);
        assert_eq!(
            raffle.ticket(TicketNumber::new(1000)).and_then(Ticket::holder),
            Some("Ann")
        );
    }

    #[test]
    fn test_buy_rejects_blank_buyer() {
        let mut raffle = spring_raffle(1);
        let err = raffle.buy_ticket(BuyTicket::next_available(" ")).unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(raffle.available_tickets().len(), 1);
    }

    #[test]
    fn test_select_winner_requires_sales() {
        let mut raffle = spring_raffle(2);
        assert_eq!(
            raffle.select_winner(SelectWinner, &mut LastCandidateSelector),
            Err(RaffleError::NoTicketsSold)
        );
    }

    #[test]
    fn test_selected_ticket_stays_bought() {
        let mut raffle = spring_raffle(2);
        raffle.buy_ticket(BuyTicket::next_available("Ann")).unwrap();
        raffle.buy_ticket(BuyTicket::next_available("Bo")).unwrap();

        let winner = raffle
            .select_winner(SelectWinner, &mut LastCandidateSelector)
            .unwrap();

        assert_eq!(winner, TicketNumber::new(1001));
        assert_eq!(numbers(raffle.bought_tickets()), vec![1000, 1001]);
        assert_eq!(numbers(raffle.selected_tickets()), vec![1001]);
        assert_eq!(raffle.remaining_candidates(), vec![TicketNumber::new(1000)]);
    }

    struct Rogue;

    impl WinnerSelector for Rogue {
        fn choose_winner(&mut self, _candidates: &[TicketNumber]) -> TicketNumber {
            TicketNumber::new(4242)
        }
    }

    #[test]
    fn test_selector_outside_pool_is_rejected() {
        let mut raffle = spring_raffle(2);
        raffle.buy_ticket(BuyTicket::next_available("Ann")).unwrap();

        let err = raffle.select_winner(SelectWinner, &mut Rogue).unwrap_err();

        assert_eq!(err, RaffleError::SelectionOutOfPool(TicketNumber::new(4242)));
        assert_eq!(raffle.selected_tickets().len(), 0);
    }

    #[test]
    fn test_replay_keeps_event_id() {
        let id = RaffleId::new();
        let raffle = Raffle::load_from_history(vec![
            RaffleCreated::new(id, "Replayed", 1, Money::from_major(1)).into(),
        ])
        .unwrap();

        assert_eq!(raffle.id(), id);
        assert!(raffle.uncommitted_events().is_empty());
    }

    #[test]
    fn test_replay_rejects_history_without_creation() {
        let err = Raffle::load_from_history(vec![
            TicketBought::new(RaffleId::new(), "Ann", TicketNumber::new(1000)).into(),
        ])
        .unwrap_err();

        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test]
    fn test_replay_rejects_empty_history() {
        let err = Raffle::load_from_history(Vec::new()).unwrap_err();
        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test_case(0 ; "empty pool")]
    #[test_case(MAX_TICKETS + 1 ; "pool too large")]
    #[test_case(u32::MAX ; "ticket range overflow")]
    fn test_replay_rejects_unbuildable_pool(tickets: u32) {
        let err = Raffle::load_from_history(vec![
            RaffleCreated::new(RaffleId::new(), "Huge", tickets, Money::from_major(1)).into(),
        ])
        .unwrap_err();

        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test]
    fn test_create_accepts_largest_pool() {
        let raffle = spring_raffle(MAX_TICKETS);
        assert_eq!(raffle.available_tickets().len(), MAX_TICKETS as usize);
        assert_eq!(
            raffle.available_tickets().last().map(Ticket::number),
            Some(TicketNumber::new(FIRST_TICKET_NUMBER + MAX_TICKETS - 1))
        );
    }

    #[test]
    fn test_replay_rejects_second_creation() {
        let id = RaffleId::new();
        let created: RaffleEvent = RaffleCreated::new(id, "Twice", 1, Money::from_major(1)).into();

        let err = Raffle::load_from_history(vec![created.clone(), created]).unwrap_err();
        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test]
    fn test_replay_rejects_foreign_raffle_events() {
        let err = Raffle::load_from_history(vec![
            RaffleCreated::new(RaffleId::new(), "Mine", 2, Money::from_major(1)).into(),
            TicketBought::new(RaffleId::new(), "Ann", TicketNumber::new(1000)).into(),
        ])
        .unwrap_err();

        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test_case(999 ; "below the pool")]
    #[test_case(1002 ; "above the pool")]
    fn test_replay_rejects_ticket_outside_pool(number: u32) {
        let id = RaffleId::new();
        let err = Raffle::load_from_history(vec![
            RaffleCreated::new(id, "Small", 2, Money::from_major(1)).into(),
            TicketBought::new(id, "Ann", TicketNumber::new(number)).into(),
        ])
        .unwrap_err();

        assert!(matches!(err, RaffleError::InvalidHistory(_)));
    }

    #[test]
    fn test_replay_rejects_double_purchase_and_unsold_winner() {
        let id = RaffleId::new();
        let created: RaffleEvent = RaffleCreated::new(id, "Small", 2, Money::from_major(1)).into();
        let bought: RaffleEvent = TicketBought::new(id, "Ann", TicketNumber::new(1000)).into();

        let double_purchase =
            Raffle::load_from_history(vec![created.clone(), bought.clone(), bought.clone()]);
        assert!(matches!(double_purchase, Err(RaffleError::InvalidHistory(_))));

        let unsold_winner = Raffle::load_from_history(vec![
            created.clone(),
            bought.clone(),
            WinnerSelected::new(id, TicketNumber::new(1001)).into(),
        ]);
        assert!(matches!(unsold_winner, Err(RaffleError::InvalidHistory(_))));

        let drawn_twice = Raffle::load_from_history(vec![
            created,
            bought,
            WinnerSelected::new(id, TicketNumber::new(1000)).into(),
            WinnerSelected::new(id, TicketNumber::new(1000)).into(),
        ]);
        assert!(matches!(drawn_twice, Err(RaffleError::InvalidHistory(_))));
    }
}
