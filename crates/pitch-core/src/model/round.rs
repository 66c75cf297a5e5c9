use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::ledger::{CardLedger, LedgerError};
use crate::model::player::PlayerPosition;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickResult};
use crate::model::trump::TrumpRules;
use rand::Rng;
use std::cmp::Reverse;
use std::{array, fmt};
use thiserror::Error;
use tracing::{Level, event};

pub const DEAL_SIZE: usize = 9;
pub const HAND_SIZE: usize = 6;
pub const TRICKS_PER_ROUND: usize = 6;

/// Named piles tracked by the round's card ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Deck,
    Discard,
    Center,
    Hand(PlayerPosition),
}

impl Location {
    /// Registration order; the deck comes first so it receives the cards.
    pub const ALL: [Location; 7] = [
        Location::Deck,
        Location::Discard,
        Location::Center,
        Location::Hand(PlayerPosition::North),
        Location::Hand(PlayerPosition::East),
        Location::Hand(PlayerPosition::South),
        Location::Hand(PlayerPosition::West),
    ];
}

/// Progress through one round. `Playing(n)` counts completed tricks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Dealt,
    Bid,
    Discarded,
    Redealt,
    Buried,
    Playing(usize),
    Complete,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Playing(n) => write!(f, "playing (trick {})", n + 1),
            other => write!(f, "{}", format!("{other:?}").to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("{operation} is not allowed while the round is {actual}")]
    PhaseOrder {
        operation: &'static str,
        actual: RoundPhase,
    },
    #[error("{0} cannot be trump")]
    InvalidTrump(Suit),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Summary of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub bidder: PlayerPosition,
    pub trump: Suit,
    pub bid_token: String,
    /// Running team totals after the round, indexed by `Team::index`.
    pub scores: [u32; 2],
    pub tricks: Vec<TrickResult>,
}

impl RoundOutcome {
    pub fn bidder_team_score(&self) -> u32 {
        self.scores[self.bidder.team().index()]
    }
}

#[derive(Debug, Clone)]
pub struct RoundState {
    ledger: CardLedger<Location>,
    rules: TrumpRules,
    bidder: PlayerPosition,
    lead: PlayerPosition,
    out: [bool; 4],
    bid_token: String,
    played: Vec<Card>,
    buried: [Vec<Card>; 4],
    current_trick: Trick,
    tricks: Vec<TrickResult>,
    phase: RoundPhase,
}

impl RoundState {
    pub fn new() -> Result<Self, RoundError> {
        Ok(Self {
            ledger: CardLedger::new(&Location::ALL)?,
            rules: TrumpRules::new(Suit::Hearts),
            bidder: PlayerPosition::North,
            lead: PlayerPosition::North,
            out: [false; 4],
            bid_token: String::new(),
            played: Vec::new(),
            buried: array::from_fn(|_| Vec::new()),
            current_trick: Trick::new(),
            tricks: Vec::new(),
            phase: RoundPhase::Idle,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn ledger(&self) -> &CardLedger<Location> {
        &self.ledger
    }

    pub fn rules(&self) -> TrumpRules {
        self.rules
    }

    pub fn trump(&self) -> Suit {
        self.rules.trump()
    }

    pub fn bidder(&self) -> PlayerPosition {
        self.bidder
    }

    pub fn bid_token(&self) -> &str {
        &self.bid_token
    }

    pub fn hand(&self, seat: PlayerPosition) -> &[Card] {
        self.ledger.cards(Location::Hand(seat))
    }

    pub fn hands(&self) -> [Vec<Card>; 4] {
        array::from_fn(|index| self.ledger.get(Location::Hand(PlayerPosition::LOOP[index])))
    }

    pub fn is_out(&self, seat: PlayerPosition) -> bool {
        self.out[seat.index()]
    }

    pub fn out_flags(&self) -> [bool; 4] {
        self.out
    }

    /// Cards played in tricks that have already been settled.
    pub fn played(&self) -> &[Card] {
        &self.played
    }

    pub fn buried(&self, seat: PlayerPosition) -> &[Card] {
        &self.buried[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn tricks(&self) -> &[TrickResult] {
        &self.tricks
    }

    pub fn tricks_completed(&self) -> usize {
        match self.phase {
            RoundPhase::Playing(n) => n,
            RoundPhase::Complete => TRICKS_PER_ROUND,
            _ => 0,
        }
    }

    pub fn has_trump(&self, seat: PlayerPosition) -> bool {
        let rules = self.rules;
        self.hand(seat).iter().any(|&card| rules.is_trump(card))
    }

    pub fn lowest_trump(&self, seat: PlayerPosition) -> Option<Card> {
        let rules = self.rules;
        self.hand(seat)
            .iter()
            .copied()
            .filter(|&card| rules.is_trump(card))
            .min_by_key(|&card| rules.sort_value(card))
    }

    /// Collects every card, shuffles, and deals a fresh round.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), RoundError> {
        self.collect()?;
        self.ledger.shuffle(Location::Deck, rng)?;
        self.deal_hands()
    }

    /// Deals with the deck in exactly the order of `deck`.
    pub fn deal_from(&mut self, deck: &Deck) -> Result<(), RoundError> {
        self.collect()?;
        self.ledger.arrange(Location::Deck, deck.cards())?;
        self.deal_hands()
    }

    pub fn bid(&mut self, bidder: PlayerPosition, trump: Suit) -> Result<(), RoundError> {
        self.require("bid", RoundPhase::Dealt)?;
        if trump == Suit::Joker {
            return Err(RoundError::InvalidTrump(trump));
        }

        self.rules = TrumpRules::new(trump);
        self.bidder = bidder;
        self.lead = bidder;
        self.phase = RoundPhase::Bid;
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            bidder = %bidder,
            trump = %trump,
            "bid"
        );
        Ok(())
    }

    /// Every seat throws its non-trump away; the bidder's hand is then sorted
    /// and its signature becomes the bid token.
    pub fn discard(&mut self) -> Result<(), RoundError> {
        self.require("discard", RoundPhase::Bid)?;
        for seat in PlayerPosition::LOOP {
            self.discard_non_trump(seat)?;
        }
        self.sort_hand(self.bidder)?;
        self.bid_token = self.rules.hand_signature(self.hand(self.bidder));
        self.phase = RoundPhase::Discarded;
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            bid_token = %self.bid_token,
            "discard"
        );
        Ok(())
    }

    /// Tops every short hand up toward six cards, then hands the rest of the
    /// deck to the bidder. A short deck simply leaves hands short.
    pub fn redeal(&mut self) -> Result<(), RoundError> {
        self.require("redeal", RoundPhase::Discarded)?;
        for seat in PlayerPosition::LOOP {
            let held = self.ledger.len(Location::Hand(seat));
            if held >= HAND_SIZE {
                continue;
            }
            let draw = (HAND_SIZE - held).min(self.ledger.len(Location::Deck));
            self.ledger.move_n(Location::Deck, Location::Hand(seat), draw)?;
            self.discard_non_trump(seat)?;
        }

        let bidder = self.bidder;
        self.ledger.move_all(Location::Deck, Location::Hand(bidder))?;
        self.discard_non_trump(bidder)?;
        self.sort_hand(bidder)?;
        self.phase = RoundPhase::Redealt;
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            hand_sizes = ?self.hand_sizes(),
            "redeal"
        );
        Ok(())
    }

    /// Cuts every hand above six cards down to six.
    pub fn bury(&mut self) -> Result<(), RoundError> {
        self.require("bury", RoundPhase::Redealt)?;
        for seat in PlayerPosition::LOOP {
            while self.ledger.len(Location::Hand(seat)) > HAND_SIZE {
                let Some(card) = self.bury_choice(seat) else {
                    break;
                };
                self.ledger
                    .move_card(card, Location::Hand(seat), Location::Discard)?;
                self.buried[seat.index()].push(card);
            }
        }
        self.phase = RoundPhase::Buried;
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            buried = ?self.buried,
            "bury"
        );
        Ok(())
    }

    /// Plays one trick. `choose` is asked for a card for every seat that
    /// still holds trump, in order from the lead; a seat without trump is
    /// marked out. An illegal choice is replaced with the seat's lowest trump.
    ///
    /// Returns `None` when nobody could play.
    pub fn play_trick<F>(&mut self, mut choose: F) -> Result<Option<TrickResult>, RoundError>
    where
        F: FnMut(&RoundState, PlayerPosition) -> Card,
    {
        let completed = match self.phase {
            RoundPhase::Buried => 0,
            RoundPhase::Playing(n) => n,
            actual => {
                return Err(RoundError::PhaseOrder {
                    operation: "play_trick",
                    actual,
                });
            }
        };

        self.ledger.move_all(Location::Center, Location::Discard)?;
        self.current_trick = Trick::new();

        for seat in self.lead.rotation() {
            self.sort_hand(seat)?;
            if !self.has_trump(seat) {
                if !self.out[seat.index()] {
                    event!(target: "pitch_core::trick", Level::DEBUG, seat = %seat, "out");
                }
                self.out[seat.index()] = true;
                continue;
            }

            let proposed = choose(&*self, seat);
            let card = self.legal_or_fallback(seat, proposed);
            self.ledger
                .move_card(card, Location::Hand(seat), Location::Center)?;
            self.current_trick.record(seat, card);
        }

        self.played
            .extend(self.current_trick.plays().iter().map(|play| play.card));
        let result = self.current_trick.settle(self.rules);
        if let Some(result) = result {
            self.lead = result.winner();
            self.tricks.push(result);
            event!(
                target: "pitch_core::trick",
                Level::DEBUG,
                trick = completed + 1,
                high_card = %result.high_card.card,
                winner = %result.winner(),
                delta = ?result.points,
                "trick settled"
            );
        }

        self.phase = if completed + 1 >= TRICKS_PER_ROUND {
            RoundPhase::Complete
        } else {
            RoundPhase::Playing(completed + 1)
        };
        Ok(result)
    }

    pub fn outcome(&self, scores: [u32; 2]) -> RoundOutcome {
        RoundOutcome {
            bidder: self.bidder,
            trump: self.trump(),
            bid_token: self.bid_token.clone(),
            scores,
            tricks: self.tricks.clone(),
        }
    }

    fn require(&self, operation: &'static str, expected: RoundPhase) -> Result<(), RoundError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RoundError::PhaseOrder {
                operation,
                actual: self.phase,
            })
        }
    }

    fn collect(&mut self) -> Result<(), RoundError> {
        self.ledger.gather(Location::Deck)?;
        self.out = [false; 4];
        self.bid_token.clear();
        self.played.clear();
        self.buried.iter_mut().for_each(Vec::clear);
        self.tricks.clear();
        self.current_trick = Trick::new();
        self.phase = RoundPhase::Idle;
        Ok(())
    }

    fn deal_hands(&mut self) -> Result<(), RoundError> {
        for seat in PlayerPosition::LOOP {
            self.ledger
                .move_n(Location::Deck, Location::Hand(seat), DEAL_SIZE)?;
        }
        self.phase = RoundPhase::Dealt;
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            remaining = self.ledger.len(Location::Deck),
            "dealt"
        );
        Ok(())
    }

    fn discard_non_trump(&mut self, seat: PlayerPosition) -> Result<(), RoundError> {
        let rules = self.rules;
        let discards: Vec<Card> = self
            .hand(seat)
            .iter()
            .copied()
            .filter(|&card| !rules.is_trump(card))
            .collect();
        for card in discards {
            self.ledger
                .move_card(card, Location::Hand(seat), Location::Discard)?;
        }
        Ok(())
    }

    fn sort_hand(&mut self, seat: PlayerPosition) -> Result<(), RoundError> {
        let rules = self.rules;
        self.ledger
            .sort_by_key(Location::Hand(seat), |&card| Reverse(rules.sort_value(card)))?;
        Ok(())
    }

    /// Lowest non-point trump, else lowest point trump other than the Three,
    /// else the Three.
    fn bury_choice(&self, seat: PlayerPosition) -> Option<Card> {
        let rules = self.rules;
        let hand = self.hand(seat);
        let lowest = |keep: &dyn Fn(Card) -> bool| {
            hand.iter()
                .copied()
                .filter(|&card| keep(card))
                .min_by_key(|&card| rules.sort_value(card))
        };

        lowest(&|card: Card| !rules.is_point_card(card))
            .or_else(|| lowest(&|card: Card| card.rank() != Rank::Three))
            .or_else(|| lowest(&|_: Card| true))
    }

    fn legal_or_fallback(&self, seat: PlayerPosition, proposed: Card) -> Card {
        let held = self.ledger.contains(Location::Hand(seat), proposed);
        if held && self.rules.is_trump(proposed) {
            return proposed;
        }

        let fallback = self.lowest_trump(seat).unwrap_or(proposed);
        tracing::warn!(
            target: "pitch_core::trick",
            seat = %seat,
            proposed = %proposed,
            fallback = %fallback,
            "strategy chose an illegal card; playing lowest trump instead"
        );
        fallback
    }

    fn hand_sizes(&self) -> [usize; 4] {
        array::from_fn(|index| self.ledger.len(Location::Hand(PlayerPosition::LOOP[index])))
    }
}
