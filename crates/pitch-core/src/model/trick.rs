use crate::model::card::Card;
use crate::model::player::{PlayerPosition, Team};
use crate::model::rank::Rank;
use crate::model::trump::TrumpRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedCard {
    pub position: PlayerPosition,
    pub card: Card,
}

impl PlayedCard {
    pub const fn new(position: PlayerPosition, card: Card) -> Self {
        Self { position, card }
    }
}

/// Cards played in one trick, in play order. Seats that are out do not
/// appear, so a trick may hold fewer than four plays.
#[derive(Debug, Clone, Default)]
pub struct Trick {
    plays: Vec<PlayedCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickResult {
    pub high_card: PlayedCard,
    pub winning_team: Team,
    /// Points earned this trick, indexed by `Team::index`.
    pub points: [u32; 2],
}

impl TrickResult {
    pub fn winner(&self) -> PlayerPosition {
        self.high_card.position
    }

    pub fn points_for(&self, team: Team) -> u32 {
        self.points[team.index()]
    }
}

impl Trick {
    pub fn new() -> Self {
        Self {
            plays: Vec::with_capacity(4),
        }
    }

    pub fn plays(&self) -> &[PlayedCard] {
        &self.plays
    }

    pub fn record(&mut self, position: PlayerPosition, card: Card) {
        self.plays.push(PlayedCard::new(position, card));
    }

    /// The play with the strictly greatest sort value.
    pub fn high_card(&self, rules: TrumpRules) -> Option<PlayedCard> {
        self.plays
            .iter()
            .copied()
            .max_by_key(|play| rules.sort_value(play.card))
    }

    /// Settles the trick. Every card's points go to the team holding the high
    /// card, except a Two, whose point stays with the team that played it.
    pub fn settle(&self, rules: TrumpRules) -> Option<TrickResult> {
        let high_card = self.high_card(rules)?;
        let winning_team = high_card.position.team();

        let mut points = [0u32; 2];
        for play in &self.plays {
            let team = if play.card.rank() == Rank::Two {
                play.position.team()
            } else {
                winning_team
            };
            points[team.index()] += u32::from(rules.point_value(play.card));
        }

        Some(TrickResult {
            high_card,
            winning_team,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Trick;
    use crate::model::card::Card;
    use crate::model::player::{PlayerPosition, Team};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::TrumpRules;

    const HEARTS: TrumpRules = TrumpRules::new(Suit::Hearts);

    #[test]
    fn empty_trick_has_no_result() {
        let trick = Trick::new();
        assert!(trick.settle(HEARTS).is_none());
    }

    #[test]
    fn high_card_team_takes_the_points() {
        let mut trick = Trick::new();
        trick.record(PlayerPosition::East, Card::new(Rank::Three, Suit::Hearts));
        trick.record(PlayerPosition::South, Card::new(Rank::Ace, Suit::Hearts));
        trick.record(PlayerPosition::West, Card::JOKER_LOW);

        let result = trick.settle(HEARTS).unwrap();
        assert_eq!(result.winner(), PlayerPosition::South);
        assert_eq!(result.winning_team, Team::NorthSouth);
        assert_eq!(result.points_for(Team::NorthSouth), 5);
        assert_eq!(result.points_for(Team::EastWest), 0);
    }

    #[test]
    fn deuce_point_stays_with_the_team_that_played_it() {
        let mut trick = Trick::new();
        trick.record(PlayerPosition::North, Card::new(Rank::King, Suit::Hearts));
        trick.record(PlayerPosition::East, Card::new(Rank::Two, Suit::Hearts));
        trick.record(PlayerPosition::South, Card::new(Rank::Ten, Suit::Hearts));
        trick.record(PlayerPosition::West, Card::new(Rank::Jack, Suit::Diamonds));

        let result = trick.settle(HEARTS).unwrap();
        assert_eq!(result.winner(), PlayerPosition::North);
        assert_eq!(result.points_for(Team::EastWest), 1, "deuce credited to East");
        assert_eq!(
            result.points_for(Team::NorthSouth),
            2,
            "ten and left jack go to the high card"
        );
    }

    #[test]
    fn deuce_played_by_winning_team_still_counts_once() {
        let mut trick = Trick::new();
        trick.record(PlayerPosition::West, Card::new(Rank::Two, Suit::Hearts));
        trick.record(PlayerPosition::North, Card::new(Rank::Four, Suit::Hearts));
        trick.record(PlayerPosition::East, Card::new(Rank::Nine, Suit::Hearts));

        let result = trick.settle(HEARTS).unwrap();
        assert_eq!(result.winner(), PlayerPosition::East);
        assert_eq!(result.points, [0, 1]);
    }
}
