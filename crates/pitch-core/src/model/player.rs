use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the four seats. North/South and East/West are fixed partnerships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlayerPosition {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 4] = [
        PlayerPosition::North,
        PlayerPosition::East,
        PlayerPosition::South,
        PlayerPosition::West,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::East,
            PlayerPosition::East => PlayerPosition::South,
            PlayerPosition::South => PlayerPosition::West,
            PlayerPosition::West => PlayerPosition::North,
        }
    }

    /// The partner seat, `(index + 2) mod 4`.
    pub const fn partner(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::South,
            PlayerPosition::East => PlayerPosition::West,
            PlayerPosition::South => PlayerPosition::North,
            PlayerPosition::West => PlayerPosition::East,
        }
    }

    /// Team membership, `index mod 2`.
    pub const fn team(self) -> Team {
        match self.index() % 2 {
            0 => Team::NorthSouth,
            _ => Team::EastWest,
        }
    }

    /// All four seats in play order starting at `self`.
    pub fn rotation(self) -> [PlayerPosition; 4] {
        let first = self;
        let second = first.next();
        let third = second.next();
        [first, second, third, third.next()]
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPosition::North => "North",
            PlayerPosition::East => "East",
            PlayerPosition::South => "South",
            PlayerPosition::West => "West",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Team {
    NorthSouth = 0,
    EastWest = 1,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::NorthSouth, Team::EastWest];

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::NorthSouth => f.write_str("North/South"),
            Team::EastWest => f.write_str("East/West"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PlayerPosition, Team};

    #[test]
    fn next_wraps_around() {
        assert_eq!(PlayerPosition::West.next(), PlayerPosition::North);
        assert_eq!(PlayerPosition::North.next(), PlayerPosition::East);
    }

    #[test]
    fn partner_is_two_seats_away() {
        for seat in PlayerPosition::LOOP {
            assert_eq!(seat.partner().index(), (seat.index() + 2) % 4);
            assert_eq!(seat.partner().partner(), seat);
            assert_eq!(seat.partner().team(), seat.team());
        }
    }

    #[test]
    fn team_is_index_mod_two() {
        assert_eq!(PlayerPosition::North.team(), Team::NorthSouth);
        assert_eq!(PlayerPosition::South.team(), Team::NorthSouth);
        assert_eq!(PlayerPosition::East.team(), Team::EastWest);
        assert_eq!(PlayerPosition::West.team(), Team::EastWest);
    }

    #[test]
    fn rotation_starts_at_self() {
        assert_eq!(
            PlayerPosition::West.rotation(),
            [
                PlayerPosition::West,
                PlayerPosition::North,
                PlayerPosition::East,
                PlayerPosition::South,
            ]
        );
    }
}
