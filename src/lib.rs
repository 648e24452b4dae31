//! Quest Generator — procedural quests for games.
//!
//! Expands a motivation into a tree of typed actions whose targets are drawn
//! from a hierarchical category source, then tracks completion of that tree
//! as gameplay events come in.

pub mod core;
pub mod schema;
