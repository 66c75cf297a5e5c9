use crate::game::bid::{BidPolicy, FixedBid};
use crate::game::strategy::{PlayStrategy, SeatView};
use crate::model::deck::Deck;
use crate::model::ledger::CardLedger;
use crate::model::player::{PlayerPosition, Team};
use crate::model::round::{Location, RoundError, RoundOutcome, RoundPhase, RoundState};
use crate::model::score::ScoreBoard;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("a table needs exactly four strategies, got {0}")]
    StrategyCount(usize),
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Runs complete rounds for four seats and keeps the running team score.
///
/// One engine is meant to be driven by a single thread; parallel simulations
/// give every worker its own engine.
pub struct RoundEngine {
    round: RoundState,
    strategies: Vec<Box<dyn PlayStrategy>>,
    bid_policy: Box<dyn BidPolicy>,
    scores: ScoreBoard,
    rng: StdRng,
    seed: u64,
}

impl RoundEngine {
    /// Seats `strategies` North, East, South, West with a random seed.
    pub fn new(strategies: Vec<Box<dyn PlayStrategy>>) -> Result<Self, EngineError> {
        let seed: u64 = rand::random();
        Self::with_seed(strategies, seed)
    }

    pub fn with_seed(
        strategies: Vec<Box<dyn PlayStrategy>>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        if strategies.len() != PlayerPosition::LOOP.len() {
            return Err(EngineError::StrategyCount(strategies.len()));
        }

        Ok(Self {
            round: RoundState::new()?,
            strategies,
            bid_policy: Box::new(FixedBid::default()),
            scores: ScoreBoard::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn with_bid_policy<P>(mut self, policy: P) -> Self
    where
        P: BidPolicy + 'static,
    {
        self.bid_policy = Box::new(policy);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffles with the engine's generator and plays a full round.
    pub fn play_round(&mut self) -> Result<RoundOutcome, EngineError> {
        self.round.deal(&mut self.rng)?;
        self.finish_round()
    }

    /// Plays a full round dealt from exactly `deck`.
    pub fn play_round_with_deck(&mut self, deck: &Deck) -> Result<RoundOutcome, EngineError> {
        self.round.deal_from(deck)?;
        self.finish_round()
    }

    /// Zeroes the score board. Round state is rebuilt by the next deal.
    pub fn reset_game(&mut self) {
        self.scores.reset();
    }

    pub fn bid_token(&self) -> &str {
        self.round.bid_token()
    }

    pub fn score(&self, team: Team) -> u32 {
        self.scores.score(team)
    }

    pub fn scores(&self) -> [u32; 2] {
        *self.scores.standings()
    }

    pub fn bidder(&self) -> PlayerPosition {
        self.round.bidder()
    }

    pub fn trump(&self) -> Suit {
        self.round.trump()
    }

    pub fn ledger(&self) -> &CardLedger<Location> {
        self.round.ledger()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|strategy| strategy.name().to_string())
            .collect()
    }

    fn finish_round(&mut self) -> Result<RoundOutcome, EngineError> {
        let bid = self.bid_policy.choose_bid(&self.round.hands());
        self.round.bid(bid.bidder, bid.trump)?;
        self.round.discard()?;
        self.round.redeal()?;
        self.round.bury()?;

        while self.round.phase() != RoundPhase::Complete {
            let strategies = &mut self.strategies;
            let result = self.round.play_trick(|round, seat| {
                let view = SeatView::from_round(round, seat);
                strategies[seat.index()].play_card(&view)
            })?;
            if let Some(result) = result {
                self.scores.apply_delta(result.points);
            }
        }

        let outcome = self.round.outcome(self.scores());
        event!(
            target: "pitch_core::round",
            Level::DEBUG,
            bidder = %outcome.bidder,
            trump = %outcome.trump,
            bid_token = %outcome.bid_token,
            scores = ?outcome.scores,
            "round complete"
        );
        Ok(outcome)
    }
}
