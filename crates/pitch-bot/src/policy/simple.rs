use pitch_core::game::strategy::{CardFilter, PlayStrategy, SeatView};
use pitch_core::model::card::Card;
use pitch_core::model::rank::Rank;
use tracing::{Level, event};

/// Partner-aware heuristic: take tricks with cards that cannot be beaten,
/// feed points to a partner who is sure to win, otherwise shed the cheapest
/// card while keeping the Three back.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleStrategy;

impl SimpleStrategy {
    pub fn new() -> Self {
        Self
    }

    fn choose(view: &SeatView) -> Option<(Card, &'static str)> {
        let high = view.highest_card(CardFilter::ANY)?;

        if view.is_lead() {
            if view.is_high_card(high) {
                return Some((high, "lead_high_card"));
            }
            if let Some(card) = view.lowest_card(CardFilter::NON_POINTS) {
                return Some((card, "lead_non_point"));
            }
            if let Some(card) = view.lowest_card(CardFilter::EXCEPT_THREE) {
                return Some((card, "lead_avoid_three"));
            }
            return view
                .lowest_card(CardFilter::ANY)
                .map(|card| (card, "lead_forced"));
        }

        if view.is_high_card(high) {
            return Some((high, "take_trick"));
        }

        if partner_has_it(view) {
            if let Some(three) = view.card_of_rank(Rank::Three) {
                return Some((three, "feed_three"));
            }
            if let Some(card) = view.lowest_card(CardFilter::POINTS) {
                return Some((card, "feed_points"));
            }
        } else {
            if let Some(card) = view.lowest_card(CardFilter::NON_POINTS) {
                return Some((card, "duck_non_point"));
            }
            if let Some(card) = view.lowest_card(CardFilter::EXCEPT_THREE) {
                return Some((card, "duck_avoid_three"));
            }
        }

        view.lowest_card(CardFilter::ANY)
            .map(|card| (card, "lowest"))
    }
}

/// The current high card belongs to our team and nothing unseen can beat it.
fn partner_has_it(view: &SeatView) -> bool {
    view.highest_played().is_some_and(|play| {
        play.position.team() == view.seat().team() && view.is_high_card(play.card)
    })
}

impl PlayStrategy for SimpleStrategy {
    fn play_card(&mut self, view: &SeatView) -> Card {
        match Self::choose(view) {
            Some((card, reason)) => {
                log_play_decision(view, card, reason);
                card
            }
            // The engine only asks seats that hold trump.
            None => view.hand().first().copied().unwrap_or(Card::JOKER_HIGH),
        }
    }

    fn name(&self) -> &str {
        "simple"
    }
}

fn log_play_decision(view: &SeatView, chosen: Card, reason: &str) {
    if !tracing::enabled!(target: "pitch_bot::play", Level::TRACE) {
        return;
    }

    let hand = view
        .hand()
        .iter()
        .map(|&card| view.rules().short_name(card))
        .collect::<Vec<_>>()
        .join(" ");

    event!(
        target: "pitch_bot::play",
        Level::TRACE,
        seat = %view.seat(),
        trick = view.trick_number() + 1,
        hand = %hand,
        trick_cards = view.trick().len(),
        partner_out = view.partner_out(),
        chosen = %chosen,
        reason,
        "play decision"
    );
}

#[cfg(test)]
mod tests {
    use super::SimpleStrategy;
    use pitch_core::game::strategy::{PlayStrategy, SeatView};
    use pitch_core::model::card::Card;
    use pitch_core::model::player::PlayerPosition;
    use pitch_core::model::rank::Rank;
    use pitch_core::model::suit::Suit;
    use pitch_core::model::trick::PlayedCard;
    use pitch_core::model::trump::TrumpRules;

    fn hearts(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts)
    }

    fn view(seat: PlayerPosition, hand: Vec<Card>, trick: Vec<PlayedCard>) -> SeatView {
        SeatView::new(
            seat,
            PlayerPosition::North,
            TrumpRules::new(Suit::Hearts),
            hand,
            trick,
        )
    }

    fn play(view: &SeatView) -> Card {
        SimpleStrategy::new().play_card(view)
    }

    #[test]
    fn leads_the_boss_card() {
        let v = view(
            PlayerPosition::North,
            vec![hearts(Rank::Ace), hearts(Rank::Four)],
            vec![],
        );
        assert_eq!(play(&v), hearts(Rank::Ace));
    }

    #[test]
    fn leads_low_non_point_without_the_boss() {
        let v = view(
            PlayerPosition::North,
            vec![hearts(Rank::King), hearts(Rank::Three), hearts(Rank::Seven)],
            vec![],
        );
        assert_eq!(play(&v), hearts(Rank::Seven));
    }

    #[test]
    fn leads_a_point_card_before_the_three() {
        let v = view(
            PlayerPosition::North,
            vec![hearts(Rank::Three), hearts(Rank::Ten), hearts(Rank::Two)],
            vec![],
        );
        assert_eq!(play(&v), hearts(Rank::Two));
    }

    #[test]
    fn leads_the_three_when_it_is_all_that_is_left() {
        let v = view(PlayerPosition::North, vec![hearts(Rank::Three)], vec![]);
        assert_eq!(play(&v), hearts(Rank::Three));
    }

    #[test]
    fn feeds_the_three_to_a_partner_holding_the_ace() {
        let trick = vec![PlayedCard::new(PlayerPosition::North, hearts(Rank::Ace))];
        let v = view(
            PlayerPosition::South,
            vec![hearts(Rank::Three), hearts(Rank::Five), hearts(Rank::Ten)],
            trick,
        );
        assert_eq!(play(&v), hearts(Rank::Three));
    }

    #[test]
    fn feeds_lowest_point_when_partner_wins_without_a_three() {
        let trick = vec![PlayedCard::new(PlayerPosition::North, hearts(Rank::Ace))];
        let v = view(
            PlayerPosition::South,
            vec![hearts(Rank::Ten), hearts(Rank::Five), Card::JOKER_LOW],
            trick,
        );
        assert_eq!(play(&v), hearts(Rank::Ten));
    }

    #[test]
    fn ducks_when_an_opponent_holds_the_high_card() {
        let trick = vec![PlayedCard::new(PlayerPosition::East, hearts(Rank::Ace))];
        let v = view(
            PlayerPosition::South,
            vec![hearts(Rank::Three), hearts(Rank::Ten), hearts(Rank::Six)],
            trick,
        );
        assert_eq!(play(&v), hearts(Rank::Six));
    }

    #[test]
    fn takes_the_trick_with_an_unbeatable_card() {
        let trick = vec![PlayedCard::new(PlayerPosition::East, hearts(Rank::King))];
        let v = view(
            PlayerPosition::South,
            vec![hearts(Rank::Ace), hearts(Rank::Six)],
            trick,
        );
        assert_eq!(play(&v), hearts(Rank::Ace));
    }
}
