use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

const LEFT_BOWER_VALUE: u8 = 13;
const RIGHT_BOWER_VALUE: u8 = 14;
/// Sort value of the Ace of trump, the highest card of every round.
pub const TOP_SORT_VALUE: u8 = 17;

/// Ranking and scoring for one round, parameterized only by the trump suit.
///
/// Trump cards are the trump suit, both jokers, and the left bower (the Jack
/// of the other suit of the same colour). Sort values give a strict order over
/// all trump cards of a round; non-trump cards all share value 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrumpRules {
    trump: Suit,
}

impl TrumpRules {
    pub const fn new(trump: Suit) -> Self {
        Self { trump }
    }

    pub const fn trump(self) -> Suit {
        self.trump
    }

    pub const fn left_bower_suit(trump: Suit) -> Suit {
        trump.same_color()
    }

    pub fn is_left_jack(self, card: Card) -> bool {
        card.rank() == Rank::Jack
            && !card.is_joker()
            && card.suit() == Self::left_bower_suit(self.trump)
    }

    pub fn is_trump(self, card: Card) -> bool {
        card.suit() == self.trump || card.is_joker() || self.is_left_jack(card)
    }

    /// 0 for non-trump; 2-10 by face; jokers 11 and 12; left bower 13;
    /// Jack, Queen, King, Ace of trump 14 to 17.
    pub fn sort_value(self, card: Card) -> u8 {
        if !self.is_trump(card) {
            return 0;
        }

        let rank = card.rank();
        if rank.value() <= Rank::Ten.value() {
            return rank.value();
        }

        match rank {
            Rank::JokerLow => 11,
            Rank::JokerHigh => 12,
            _ if self.is_left_jack(card) => LEFT_BOWER_VALUE,
            _ => RIGHT_BOWER_VALUE + (rank.value() - Rank::Jack.value()),
        }
    }

    /// The trump card holding `value` on the sort ladder; `None` off the ladder.
    pub fn card_with_sort_value(self, value: u8) -> Option<Card> {
        let of_trump = |rank: Option<Rank>| rank.and_then(|rank| Card::try_new(rank, self.trump));
        match value {
            2..=10 => of_trump(Rank::from_value(value)),
            11 => Some(Card::JOKER_LOW),
            12 => Some(Card::JOKER_HIGH),
            LEFT_BOWER_VALUE => Card::try_new(Rank::Jack, Self::left_bower_suit(self.trump)),
            RIGHT_BOWER_VALUE..=TOP_SORT_VALUE => {
                of_trump(Rank::from_value(value - RIGHT_BOWER_VALUE + Rank::Jack.value()))
            }
            _ => None,
        }
    }

    pub fn point_value(self, card: Card) -> u8 {
        if !self.is_trump(card) {
            return 0;
        }

        match card.rank() {
            Rank::Three => 3,
            Rank::Ace
            | Rank::Jack
            | Rank::JokerHigh
            | Rank::JokerLow
            | Rank::Ten
            | Rank::Two => 1,
            _ => 0,
        }
    }

    pub fn is_point_card(self, card: Card) -> bool {
        self.point_value(card) > 0
    }

    /// One or two characters used in hand signatures.
    pub fn short_name(self, card: Card) -> String {
        match card.rank() {
            Rank::Ace => "A".to_string(),
            Rank::King => "K".to_string(),
            Rank::Queen => "Q".to_string(),
            Rank::Jack if self.is_left_jack(card) => "LJ".to_string(),
            Rank::Jack => "J".to_string(),
            Rank::JokerHigh => "JH".to_string(),
            Rank::JokerLow => "JL".to_string(),
            rank => rank.value().to_string(),
        }
    }

    /// Short names ordered by descending sort value, separated by single spaces.
    pub fn hand_signature(self, cards: &[Card]) -> String {
        let mut ordered = cards.to_vec();
        ordered.sort_by_key(|&card| std::cmp::Reverse(self.sort_value(card)));
        ordered
            .into_iter()
            .map(|card| self.short_name(card))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
