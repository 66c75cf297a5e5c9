//! The strategy port: how a seat decides which card to play.
//!
//! Strategies never see the engine. Each decision receives a [`SeatView`], an
//! owned snapshot of what the seat may observe, and answers with a card from
//! its own hand.

use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::rank::Rank;
use crate::model::round::RoundState;
use crate::model::trick::PlayedCard;
use crate::model::trump::{TOP_SORT_VALUE, TrumpRules};

/// Chooses the card a seat plays. The returned card must be a trump held in
/// `view.hand()`; the engine replaces anything else with the seat's lowest trump.
pub trait PlayStrategy: Send {
    fn play_card(&mut self, view: &SeatView) -> Card;

    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Which trump cards a hand query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardFilter {
    pub points: bool,
    pub non_points: bool,
    pub three: bool,
}

impl CardFilter {
    pub const ANY: CardFilter = CardFilter::new(true, true, true);
    pub const NON_POINTS: CardFilter = CardFilter::new(false, true, false);
    pub const EXCEPT_THREE: CardFilter = CardFilter::new(true, true, false);
    pub const POINTS: CardFilter = CardFilter::new(true, false, true);

    pub const fn new(points: bool, non_points: bool, three: bool) -> Self {
        Self {
            points,
            non_points,
            three,
        }
    }

    pub fn matches(self, rules: TrumpRules, card: Card) -> bool {
        if !rules.is_trump(card) {
            return false;
        }
        let is_point = rules.is_point_card(card);
        if is_point && !self.points {
            return false;
        }
        if !is_point && !self.non_points {
            return false;
        }
        self.three || card.rank() != Rank::Three
    }
}

/// Everything a seat can observe when it is asked to play.
#[derive(Debug, Clone)]
pub struct SeatView {
    seat: PlayerPosition,
    bidder: PlayerPosition,
    rules: TrumpRules,
    hand: Vec<Card>,
    trick: Vec<PlayedCard>,
    out: [bool; 4],
    played_earlier: Vec<Card>,
    buried: Vec<Card>,
    trick_number: usize,
}

impl SeatView {
    /// Builds a view directly; used by tests and tools that drive strategies
    /// outside of a round.
    pub fn new(
        seat: PlayerPosition,
        bidder: PlayerPosition,
        rules: TrumpRules,
        hand: Vec<Card>,
        trick: Vec<PlayedCard>,
    ) -> Self {
        Self {
            seat,
            bidder,
            rules,
            hand,
            trick,
            out: [false; 4],
            played_earlier: Vec::new(),
            buried: Vec::new(),
            trick_number: 0,
        }
    }

    /// Snapshot of what `seat` can see in the middle of a round.
    pub fn from_round(round: &RoundState, seat: PlayerPosition) -> Self {
        Self {
            seat,
            bidder: round.bidder(),
            rules: round.rules(),
            hand: round.hand(seat).to_vec(),
            trick: round.current_trick().plays().to_vec(),
            out: round.out_flags(),
            played_earlier: round.played().to_vec(),
            buried: round.buried(seat).to_vec(),
            trick_number: round.tricks_completed(),
        }
    }

    pub fn with_played_earlier(mut self, cards: Vec<Card>) -> Self {
        self.played_earlier = cards;
        self
    }

    pub fn seat(&self) -> PlayerPosition {
        self.seat
    }

    pub fn partner(&self) -> PlayerPosition {
        self.seat.partner()
    }

    pub fn bidder(&self) -> PlayerPosition {
        self.bidder
    }

    pub fn rules(&self) -> TrumpRules {
        self.rules
    }

    pub fn is_trump(&self, card: Card) -> bool {
        self.rules.is_trump(card)
    }

    pub fn sort_value(&self, card: Card) -> u8 {
        self.rules.sort_value(card)
    }

    pub fn point_value(&self, card: Card) -> u8 {
        self.rules.point_value(card)
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Cards played so far in the current trick, in play order.
    pub fn trick(&self) -> &[PlayedCard] {
        &self.trick
    }

    /// Zero-based index of the current trick within the round.
    pub fn trick_number(&self) -> usize {
        self.trick_number
    }

    pub fn is_lead(&self) -> bool {
        self.trick.is_empty()
    }

    pub fn is_out(&self, seat: PlayerPosition) -> bool {
        self.out[seat.index()]
    }

    pub fn partner_out(&self) -> bool {
        self.is_out(self.partner())
    }

    /// Cards played in earlier tricks of this round.
    pub fn played_earlier(&self) -> &[Card] {
        &self.played_earlier
    }

    /// Cards this seat buried after the redeal.
    pub fn buried(&self) -> &[Card] {
        &self.buried
    }

    pub fn has_trump(&self) -> bool {
        self.hand.iter().any(|&card| self.rules.is_trump(card))
    }

    pub fn has_rank(&self, rank: Rank) -> bool {
        self.card_of_rank(rank).is_some()
    }

    /// The trump of `rank` in hand, if any.
    pub fn card_of_rank(&self, rank: Rank) -> Option<Card> {
        self.hand
            .iter()
            .copied()
            .find(|&card| card.rank() == rank && self.rules.is_trump(card))
    }

    pub fn highest_card(&self, filter: CardFilter) -> Option<Card> {
        self.hand
            .iter()
            .copied()
            .filter(|&card| filter.matches(self.rules, card))
            .max_by_key(|&card| self.rules.sort_value(card))
    }

    pub fn lowest_card(&self, filter: CardFilter) -> Option<Card> {
        self.hand
            .iter()
            .copied()
            .filter(|&card| filter.matches(self.rules, card))
            .min_by_key(|&card| self.rules.sort_value(card))
    }

    pub fn highest_played(&self) -> Option<PlayedCard> {
        self.trick
            .iter()
            .copied()
            .max_by_key(|play| self.rules.sort_value(play.card))
    }

    /// True when `card` beats everything in the current trick and every higher
    /// trump is already accounted for: in this hand, played this round, or
    /// buried by this seat.
    pub fn is_high_card(&self, card: Card) -> bool {
        let value = self.rules.sort_value(card);
        if value == 0 {
            return false;
        }

        if let Some(high) = self.highest_played() {
            if self.rules.sort_value(high.card) > value {
                return false;
            }
        }

        (value + 1..=TOP_SORT_VALUE)
            .filter_map(|higher| self.rules.card_with_sort_value(higher))
            .all(|other| self.is_accounted_for(other))
    }

    fn is_accounted_for(&self, card: Card) -> bool {
        self.hand.contains(&card)
            || self.played_earlier.contains(&card)
            || self.buried.contains(&card)
            || self.trick.iter().any(|play| play.card == card)
    }
}
