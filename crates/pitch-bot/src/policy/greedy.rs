use pitch_core::game::strategy::{CardFilter, PlayStrategy, SeatView};
use pitch_core::model::card::Card;

/// Always plays its highest trump.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl PlayStrategy for GreedyStrategy {
    fn play_card(&mut self, view: &SeatView) -> Card {
        view.highest_card(CardFilter::ANY)
            .or_else(|| view.hand().first().copied())
            .unwrap_or(Card::JOKER_HIGH)
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
