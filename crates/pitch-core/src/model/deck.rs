use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

pub const DECK_SIZE: usize = 54;

/// An ordering of the 54-card pitch deck (52 standard cards plus two jokers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Clubs, Diamonds, Hearts, Spades (each Two through Ace), then the low
    /// and high jokers.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::STANDARD.iter().copied() {
            for rank in Rank::STANDARD.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        cards.push(Card::JOKER_LOW);
        cards.push(Card::JOKER_HIGH);
        Self { cards }
    }

    /// Accepts any ordering of the full deck; `None` if a card is missing or repeated.
    pub fn from_order(cards: Vec<Card>) -> Option<Self> {
        let mut sorted = cards.clone();
        sorted.sort();
        let mut reference = Self::standard().cards;
        reference.sort();
        (sorted == reference).then_some(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
