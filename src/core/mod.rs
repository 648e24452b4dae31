pub mod category;
pub mod config;
pub mod describe;
pub mod dispatch;
pub mod executor;
pub mod export;
pub mod generator;
pub mod objective;
pub mod quest;
pub mod strategies;
