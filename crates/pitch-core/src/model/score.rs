use crate::model::player::Team;

/// Running points for the two partnerships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add_points(&mut self, team: Team, points: u32) {
        self.totals[team.index()] += points;
    }

    pub fn apply_delta(&mut self, delta: [u32; 2]) {
        for team in Team::BOTH {
            self.add_points(team, delta[team.index()]);
        }
    }

    pub fn score(&self, team: Team) -> u32 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    pub fn reset(&mut self) {
        self.totals = [0; 2];
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
