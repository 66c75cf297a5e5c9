mod greedy;
mod simple;

pub use greedy::GreedyStrategy;
pub use simple::SimpleStrategy;

use pitch_core::game::strategy::PlayStrategy;
use std::fmt;

/// Strategies that can be selected by name, e.g. from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Simple,
    Greedy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Simple, StrategyKind::Greedy];

    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::Simple => "simple",
            StrategyKind::Greedy => "greedy",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
    }

    pub fn build(self) -> Box<dyn PlayStrategy> {
        match self {
            StrategyKind::Simple => Box::new(SimpleStrategy::new()),
            StrategyKind::Greedy => Box::new(GreedyStrategy::new()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
