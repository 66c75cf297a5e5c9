use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// A single playing card. Cards compare by value: two cards with the same
/// rank and suit are the same card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const JOKER_LOW: Card = Card::new(Rank::JokerLow, Suit::Joker);
    pub const JOKER_HIGH: Card = Card::new(Rank::JokerHigh, Suit::Joker);

    /// Panics when the rank and suit cannot appear together in the deck
    /// (a joker rank with a standard suit, or a standard rank with the joker suit).
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        assert!(
            Self::is_valid_pair(rank, suit),
            "joker ranks pair only with the joker suit"
        );
        Self { rank, suit }
    }

    pub const fn try_new(rank: Rank, suit: Suit) -> Option<Self> {
        if Self::is_valid_pair(rank, suit) {
            Some(Self { rank, suit })
        } else {
            None
        }
    }

    const fn is_valid_pair(rank: Rank, suit: Suit) -> bool {
        rank.is_joker() == matches!(suit, Suit::Joker)
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn is_joker(self) -> bool {
        matches!(self.suit, Suit::Joker)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::JokerLow => f.write_str("Low Joker"),
            Rank::JokerHigh => f.write_str("High Joker"),
            rank => write!(f, "{} of {}", rank, self.suit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn equality_is_by_value() {
        let a = Card::new(Rank::Ace, Suit::Hearts);
        let b = Card::new(Rank::Ace, Suit::Hearts);
        assert_eq!(a, b);
        assert_ne!(a, Card::new(Rank::Ace, Suit::Diamonds));
    }

    #[test]
    fn joker_pairs_are_validated() {
        assert!(Card::try_new(Rank::JokerLow, Suit::Joker).is_some());
        assert!(Card::try_new(Rank::JokerHigh, Suit::Hearts).is_none());
        assert!(Card::try_new(Rank::Two, Suit::Joker).is_none());
        assert!(Card::JOKER_HIGH.is_joker());
    }

    #[test]
    #[should_panic]
    fn new_rejects_joker_rank_with_standard_suit() {
        let _ = Card::new(Rank::JokerLow, Suit::Spades);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).to_string(), "10 of Clubs");
        assert_eq!(Card::JOKER_LOW.to_string(), "Low Joker");
    }
}
