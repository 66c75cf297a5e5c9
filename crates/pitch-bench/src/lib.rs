pub mod aggregate;
pub mod config;
pub mod logging;
pub mod report;
pub mod simulation;
