use pitch_core::game::strategy::{CardFilter, PlayStrategy, SeatView};
use pitch_core::model::card::Card;
use pitch_core::model::deck::{DECK_SIZE, Deck};
use pitch_core::model::player::{PlayerPosition, Team};
use pitch_core::model::rank::Rank;
use pitch_core::model::round::{HAND_SIZE, Location, RoundPhase, RoundState};
use pitch_core::model::suit::Suit;
use pitch_core::model::trump::TrumpRules;
use pitch_core::{Bid, FixedBid, RoundEngine};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Always plays its highest trump.
struct Highest;

impl PlayStrategy for Highest {
    fn play_card(&mut self, view: &SeatView) -> Card {
        view.highest_card(CardFilter::ANY)
            .expect("asked to play without trump")
    }
}

/// Returns a card the seat does not hold.
struct Cheater;

impl PlayStrategy for Cheater {
    fn play_card(&mut self, _view: &SeatView) -> Card {
        Card::new(Rank::Ace, Suit::Clubs)
    }
}

fn highest_table() -> Vec<Box<dyn PlayStrategy>> {
    (0..4)
        .map(|_| Box::new(Highest) as Box<dyn PlayStrategy>)
        .collect()
}

fn hearts(rank: Rank) -> Card {
    Card::new(rank, Suit::Hearts)
}

#[test]
fn unshuffled_deck_with_north_bidding() {
    let mut engine = RoundEngine::with_seed(highest_table(), 0).expect("four seats");
    let outcome = engine
        .play_round_with_deck(&Deck::standard())
        .expect("round completes");

    assert_eq!(outcome.bidder, PlayerPosition::North);
    assert_eq!(outcome.trump, Suit::Hearts);
    assert_eq!(outcome.bid_token, "", "north is dealt no hearts");
    assert_eq!(engine.score(Team::NorthSouth), 7);
    assert_eq!(engine.score(Team::EastWest), 3);
    assert_eq!(outcome.bidder_team_score(), 7);
    assert_eq!(outcome.tricks.len(), 6);

    let round = engine.round();
    assert_eq!(
        round.buried(PlayerPosition::West),
        &[hearts(Rank::Four), hearts(Rank::Five), hearts(Rank::Six)]
    );
    assert!(round.is_out(PlayerPosition::East));
    assert!(round.is_out(PlayerPosition::North), "north runs dry on the last trick");
    assert_eq!(engine.ledger().total(), DECK_SIZE);
}

#[test]
fn unshuffled_deck_with_west_bidding() {
    let mut engine = RoundEngine::with_seed(highest_table(), 0)
        .expect("four seats")
        .with_bid_policy(FixedBid::new(Bid::new(PlayerPosition::West, Suit::Hearts)));
    let outcome = engine
        .play_round_with_deck(&Deck::standard())
        .expect("round completes");

    assert_eq!(outcome.bid_token, "J 10 9 8 7 6 5 4 3");
    assert_eq!(engine.scores(), [6, 4]);

    let deltas: Vec<[u32; 2]> = outcome.tricks.iter().map(|t| t.points).collect();
    assert_eq!(
        deltas,
        vec![[3, 0], [2, 0], [1, 0], [0, 1], [0, 0], [0, 3]]
    );
    assert_eq!(outcome.tricks[0].winner(), PlayerPosition::North);
    assert_eq!(outcome.tricks[5].winner(), PlayerPosition::West);
    assert_eq!(engine.ledger().total(), DECK_SIZE);
}

#[test]
fn every_seeded_round_keeps_the_deck_whole() {
    let mut engine = RoundEngine::with_seed(highest_table(), 2024).expect("four seats");
    for _ in 0..200 {
        engine.reset_game();
        let outcome = engine.play_round().expect("round completes");
        let total: u32 = outcome.scores.iter().sum();
        assert!(total <= 10, "a round never awards more than ten points");
        assert_eq!(engine.ledger().total(), DECK_SIZE);
        assert_eq!(engine.round().phase(), RoundPhase::Complete);
    }
}

#[test]
fn seeds_reproduce_tokens_and_scores() {
    let run = |seed| {
        let mut engine = RoundEngine::with_seed(highest_table(), seed).expect("four seats");
        (0..20)
            .map(|_| {
                engine.reset_game();
                let outcome = engine.play_round().expect("round completes");
                (outcome.bid_token, outcome.scores)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn reset_game_is_idempotent() {
    let mut engine = RoundEngine::with_seed(highest_table(), 5).expect("four seats");
    engine.play_round().expect("round completes");
    engine.reset_game();
    engine.reset_game();
    assert_eq!(engine.scores(), [0, 0]);
}

#[test]
fn hands_hold_only_trump_after_bury() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..100 {
        let mut round = RoundState::new().expect("ledger");
        round.deal(&mut rng).expect("deal");
        round.bid(PlayerPosition::South, Suit::Clubs).expect("bid");
        round.discard().expect("discard");
        round.redeal().expect("redeal");
        round.bury().expect("bury");

        let rules = round.rules();
        for seat in PlayerPosition::LOOP {
            let hand = round.hand(seat);
            assert!(hand.len() <= HAND_SIZE);
            assert!(hand.iter().all(|&card| rules.is_trump(card)));
        }
        assert!(round.ledger().is_empty(Location::Deck));
        assert_eq!(round.ledger().total(), DECK_SIZE);
    }
}

#[test]
fn faulty_strategy_cannot_break_the_ledger() {
    let table: Vec<Box<dyn PlayStrategy>> = (0..4)
        .map(|_| Box::new(Cheater) as Box<dyn PlayStrategy>)
        .collect();
    let mut engine = RoundEngine::with_seed(table, 9).expect("four seats");
    for _ in 0..20 {
        engine.play_round().expect("round completes");
        assert_eq!(engine.ledger().total(), DECK_SIZE);
    }
}

#[test]
fn seeded_round_matches_recorded_result() {
    let mut engine = RoundEngine::with_seed(highest_table(), 7).expect("four seats");
    let outcome = engine.play_round().expect("round completes");

    assert_eq!(outcome.bid_token, "A JH JL 8");
    assert_eq!(outcome.scores, [9, 1]);
    let deltas: Vec<[u32; 2]> = outcome.tricks.iter().map(|trick| trick.points).collect();
    assert_eq!(
        deltas,
        vec![[2, 0], [1, 0], [4, 0], [1, 1], [1, 0], [0, 0]],
        "west keeps the point for its Two on the fourth trick"
    );
    assert!(outcome
        .tricks
        .iter()
        .all(|trick| trick.winner() == PlayerPosition::North));
    for seat in [PlayerPosition::East, PlayerPosition::South, PlayerPosition::West] {
        assert!(engine.round().is_out(seat), "{seat} ran out of trump");
    }
}

#[test]
fn exhausted_deck_leaves_hands_short() {
    // Every seat is dealt nine plain cards; the sixteen trumps sit right after them.
    let rules = TrumpRules::new(Suit::Hearts);
    let (trumps, plain): (Vec<Card>, Vec<Card>) = Deck::standard()
        .cards()
        .iter()
        .partition(|&&card| rules.is_trump(card));
    let order: Vec<Card> = plain[..36]
        .iter()
        .chain(&trumps)
        .chain(&plain[36..])
        .copied()
        .collect();
    let deck = Deck::from_order(order).expect("full deck");

    let mut round = RoundState::new().expect("ledger");
    round.deal_from(&deck).expect("deal");
    round.bid(PlayerPosition::East, Suit::Hearts).expect("bid");
    round.discard().expect("discard");
    assert_eq!(round.bid_token(), "");
    round.redeal().expect("redeal");

    let sizes: Vec<usize> = PlayerPosition::LOOP
        .iter()
        .map(|&seat| round.hand(seat).len())
        .collect();
    assert_eq!(sizes, vec![6, 6, 4, 0]);
    assert!(round.ledger().is_empty(Location::Deck));

    round.bury().expect("bury");
    for _ in 0..6 {
        round
            .play_trick(|state, seat| {
                SeatView::from_round(state, seat)
                    .highest_card(CardFilter::ANY)
                    .expect("seat holds trump")
            })
            .expect("trick");
    }

    assert!(round.is_out(PlayerPosition::West));
    assert_eq!(round.phase(), RoundPhase::Complete);
    assert_eq!(round.tricks().len(), 6);
    let points: u32 = round.tricks().iter().map(|trick| trick.points.iter().sum::<u32>()).sum();
    assert_eq!(points, 10);
    let deltas: Vec<[u32; 2]> = round.tricks().iter().map(|trick| trick.points).collect();
    assert_eq!(deltas, vec![[2, 0], [1, 0], [2, 0], [1, 0], [0, 3], [1, 0]]);
    assert_eq!(round.ledger().total(), DECK_SIZE);
}
