#![deny(warnings)]
pub mod game;
pub mod model;

pub use game::bid::{Bid, BidPolicy, FixedBid};
pub use game::engine::{EngineError, RoundEngine};
pub use game::strategy::{CardFilter, PlayStrategy, SeatView};
pub use model::card::Card;
pub use model::player::{PlayerPosition, Team};
pub use model::rank::Rank;
pub use model::round::{RoundError, RoundOutcome};
pub use model::suit::Suit;
pub use model::trump::TrumpRules;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "pitch"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
