pub mod bid;
pub mod engine;
pub mod strategy;
