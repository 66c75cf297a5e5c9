pub mod policy;

pub use policy::{GreedyStrategy, SimpleStrategy, StrategyKind};
