use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;

/// The winning bid of a round: who declares and which suit is trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bid {
    pub bidder: PlayerPosition,
    pub trump: Suit,
}

impl Bid {
    pub const fn new(bidder: PlayerPosition, trump: Suit) -> Self {
        Self { bidder, trump }
    }
}

impl Default for Bid {
    fn default() -> Self {
        Self::new(PlayerPosition::North, Suit::Hearts)
    }
}

/// Decides the bid after the deal. Hands are indexed by `PlayerPosition::index`.
pub trait BidPolicy: Send {
    fn choose_bid(&mut self, hands: &[Vec<Card>; 4]) -> Bid;
}

/// Ignores the cards and always returns the same bid.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBid {
    bid: Bid,
}

impl FixedBid {
    pub const fn new(bid: Bid) -> Self {
        Self { bid }
    }
}

impl BidPolicy for FixedBid {
    fn choose_bid(&mut self, _hands: &[Vec<Card>; 4]) -> Bid {
        self.bid
    }
}
