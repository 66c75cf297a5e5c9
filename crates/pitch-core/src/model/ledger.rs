//! Card ledger: every card of the deck lives in exactly one named location.
//!
//! The ledger is the only owner of card positions. All mutation goes through
//! the move operations below, so the union of all locations is always the full
//! 54-card deck with no duplicates and no losses. Reads hand out either a
//! borrowed slice or an owned snapshot, never a mutable alias.

use crate::model::card::Card;
use crate::model::deck::Deck;
use core::fmt;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("a ledger needs at least one location")]
    NoLocations,
    #[error("location {0} registered more than once")]
    DuplicateLocation(String),
    #[error("unknown location {0}")]
    UnknownLocation(String),
    #[error("cannot move {requested} cards from a location holding {available}")]
    OutOfRange { requested: usize, available: usize },
    #[error("requested order is not a permutation of the cards at {0}")]
    NotAPermutation(String),
}

#[derive(Debug, Clone)]
struct Pile<K> {
    key: K,
    cards: Vec<Card>,
}

#[derive(Debug, Clone)]
pub struct CardLedger<K> {
    piles: Vec<Pile<K>>,
}

impl<K> CardLedger<K>
where
    K: Copy + Eq + fmt::Debug,
{
    /// Registers `keys` in order. The first key receives the whole deck in
    /// canonical order; every other location starts empty.
    pub fn new(keys: &[K]) -> Result<Self, LedgerError> {
        let Some(first) = keys.first().copied() else {
            return Err(LedgerError::NoLocations);
        };

        let mut piles: Vec<Pile<K>> = Vec::with_capacity(keys.len());
        for key in keys.iter().copied() {
            if piles.iter().any(|pile| pile.key == key) {
                return Err(LedgerError::DuplicateLocation(format!("{key:?}")));
            }
            let cards = if key == first {
                Deck::standard().into_cards()
            } else {
                Vec::new()
            };
            piles.push(Pile { key, cards });
        }

        Ok(Self { piles })
    }

    pub fn locations(&self) -> impl Iterator<Item = K> + '_ {
        self.piles.iter().map(|pile| pile.key)
    }

    /// Owned snapshot of a location; empty for an unknown key.
    pub fn get(&self, key: K) -> Vec<Card> {
        self.cards(key).to_vec()
    }

    pub fn cards(&self, key: K) -> &[Card] {
        self.pile(key).map(|pile| pile.cards.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self, key: K) -> usize {
        self.cards(key).len()
    }

    pub fn is_empty(&self, key: K) -> bool {
        self.cards(key).is_empty()
    }

    pub fn contains(&self, key: K, card: Card) -> bool {
        self.cards(key).contains(&card)
    }

    /// Number of cards across all locations. Always the deck size.
    pub fn total(&self) -> usize {
        self.piles.iter().map(|pile| pile.cards.len()).sum()
    }

    /// Moves the first occurrence of `card` from `from` to the end of `to`.
    /// A card that is not at `from` is not an error: nothing moves and
    /// `Ok(false)` is returned.
    pub fn move_card(&mut self, card: Card, from: K, to: K) -> Result<bool, LedgerError> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;

        let Some(position) = self.piles[from_index]
            .cards
            .iter()
            .position(|&c| c == card)
        else {
            return Ok(false);
        };

        let moved = self.piles[from_index].cards.remove(position);
        self.piles[to_index].cards.push(moved);
        Ok(true)
    }

    pub fn move_top(&mut self, from: K, to: K) -> Result<(), LedgerError> {
        self.move_n(from, to, 1)
    }

    /// Moves the first `count` cards of `from`, in order, to the end of `to`.
    pub fn move_n(&mut self, from: K, to: K, count: usize) -> Result<(), LedgerError> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;

        let available = self.piles[from_index].cards.len();
        if count > available {
            return Err(LedgerError::OutOfRange {
                requested: count,
                available,
            });
        }

        let moved: Vec<Card> = self.piles[from_index].cards.drain(..count).collect();
        self.piles[to_index].cards.extend(moved);
        Ok(())
    }

    /// Moves everything at `from` to `to`; returns the number of cards moved.
    pub fn move_all(&mut self, from: K, to: K) -> Result<usize, LedgerError> {
        let count = self.len_checked(from)?;
        if count > 0 {
            self.move_n(from, to, count)?;
        }
        Ok(count)
    }

    /// Drains every other location into `to`, visiting locations in
    /// registration order.
    pub fn gather(&mut self, to: K) -> Result<(), LedgerError> {
        self.index_of(to)?;
        let keys: Vec<K> = self.locations().filter(|&key| key != to).collect();
        for key in keys {
            self.move_all(key, to)?;
        }
        Ok(())
    }

    pub fn shuffle<R: rand::Rng + ?Sized>(
        &mut self,
        key: K,
        rng: &mut R,
    ) -> Result<(), LedgerError> {
        let index = self.index_of(key)?;
        self.piles[index].cards.shuffle(rng);
        Ok(())
    }

    /// Stable in-place sort by a key derived from each card.
    pub fn sort_by_key<T, F>(&mut self, key: K, f: F) -> Result<(), LedgerError>
    where
        T: Ord,
        F: FnMut(&Card) -> T,
    {
        let index = self.index_of(key)?;
        self.piles[index].cards.sort_by_key(f);
        Ok(())
    }

    /// Reorders a location to exactly `order`, which must contain the same cards.
    pub fn arrange(&mut self, key: K, order: &[Card]) -> Result<(), LedgerError> {
        let index = self.index_of(key)?;
        let mut current = self.piles[index].cards.clone();
        let mut requested = order.to_vec();
        current.sort();
        requested.sort();
        if current != requested {
            return Err(LedgerError::NotAPermutation(format!("{key:?}")));
        }
        self.piles[index].cards = order.to_vec();
        Ok(())
    }

    fn pile(&self, key: K) -> Option<&Pile<K>> {
        self.piles.iter().find(|pile| pile.key == key)
    }

    fn index_of(&self, key: K) -> Result<usize, LedgerError> {
        self.piles
            .iter()
            .position(|pile| pile.key == key)
            .ok_or_else(|| LedgerError::UnknownLocation(format!("{key:?}")))
    }

    fn len_checked(&self, key: K) -> Result<usize, LedgerError> {
        let index = self.index_of(key)?;
        Ok(self.piles[index].cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{CardLedger, LedgerError};
    use crate::model::card::Card;
    use crate::model::deck::{DECK_SIZE, Deck};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_piles() -> CardLedger<&'static str> {
        CardLedger::new(&["d1", "d2"]).unwrap()
    }

    #[test]
    fn empty_key_list_is_rejected() {
        let keys: [&str; 0] = [];
        assert_eq!(
            CardLedger::new(&keys).unwrap_err(),
            LedgerError::NoLocations
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        assert!(matches!(
            CardLedger::new(&["deck", "hand", "deck"]),
            Err(LedgerError::DuplicateLocation(_))
        ));
    }

    #[test]
    fn first_key_holds_the_full_deck() {
        let ledger = CardLedger::new(&["deck"]).unwrap();
        assert_eq!(ledger.len("deck"), DECK_SIZE);
        assert_eq!(ledger.get("deck"), Deck::standard().into_cards());
    }

    #[test]
    fn move_n_preserves_order_and_counts() {
        let mut ledger = two_piles();
        let top: Vec<Card> = ledger.cards("d1")[..10].to_vec();
        ledger.move_n("d1", "d2", 10).unwrap();
        assert_eq!(ledger.len("d1"), 44);
        assert_eq!(ledger.get("d2"), top);

        ledger.move_n("d1", "d2", 0).unwrap();
        assert_eq!(ledger.len("d1"), 44);
        assert_eq!(ledger.len("d2"), 10);
    }

    #[test]
    fn move_n_past_the_end_fails_without_moving() {
        let mut ledger = two_piles();
        ledger.move_n("d1", "d2", 50).unwrap();
        assert_eq!(
            ledger.move_n("d1", "d2", 5),
            Err(LedgerError::OutOfRange {
                requested: 5,
                available: 4
            })
        );
        assert_eq!(ledger.len("d1"), 4);

        ledger.move_n("d1", "d2", 4).unwrap();
        assert!(ledger.is_empty("d1"));
        assert_eq!(ledger.total(), DECK_SIZE);
    }

    #[test]
    fn move_card_ignores_missing_cards() {
        let mut ledger = two_piles();
        let ace = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(ledger.move_card(ace, "d2", "d1"), Ok(false));
        assert_eq!(ledger.move_card(ace, "d1", "d2"), Ok(true));
        assert_eq!(ledger.get("d2"), vec![ace]);
        assert_eq!(ledger.move_card(ace, "d1", "d2"), Ok(false));
        assert_eq!(ledger.total(), DECK_SIZE);
    }

    #[test]
    fn unknown_locations_are_reported() {
        let mut ledger = two_piles();
        assert!(matches!(
            ledger.move_n("d1", "d9", 1),
            Err(LedgerError::UnknownLocation(_))
        ));
        assert!(ledger.get("d9").is_empty());
        assert_eq!(ledger.len("d1"), DECK_SIZE);
    }

    #[test]
    fn gather_drains_every_other_location() {
        let mut ledger = CardLedger::new(&["a", "b", "c"]).unwrap();
        ledger.move_n("a", "b", 20).unwrap();
        ledger.move_n("a", "c", 20).unwrap();
        ledger.gather("c").unwrap();
        assert!(ledger.is_empty("a"));
        assert!(ledger.is_empty("b"));
        assert_eq!(ledger.len("c"), DECK_SIZE);
    }

    #[test]
    fn shuffle_is_seeded_and_conserves_cards() {
        let mut a = two_piles();
        let mut b = two_piles();
        a.shuffle("d1", &mut StdRng::seed_from_u64(9)).unwrap();
        b.shuffle("d1", &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.get("d1"), b.get("d1"));
        assert_ne!(a.get("d1"), Deck::standard().into_cards());
        assert_eq!(a.len("d1"), DECK_SIZE);
    }

    #[test]
    fn snapshot_is_detached_from_the_ledger() {
        let mut ledger = two_piles();
        let mut snapshot = ledger.get("d1");
        snapshot.clear();
        assert_eq!(ledger.len("d1"), DECK_SIZE);
        ledger.move_top("d1", "d2").unwrap();
        assert_eq!(ledger.len("d1"), DECK_SIZE - 1);
    }

    #[test]
    fn sort_by_key_reorders_in_place() {
        let mut ledger = two_piles();
        ledger.sort_by_key("d1", |card| std::cmp::Reverse(*card)).unwrap();
        assert_eq!(ledger.cards("d1")[0], Card::JOKER_HIGH);
    }

    #[test]
    fn arrange_accepts_only_permutations() {
        let mut ledger = two_piles();
        let mut order = ledger.get("d1");
        order.reverse();
        ledger.arrange("d1", &order).unwrap();
        assert_eq!(ledger.get("d1"), order);

        order.pop();
        assert!(matches!(
            ledger.arrange("d1", &order),
            Err(LedgerError::NotAPermutation(_))
        ));
    }
}
