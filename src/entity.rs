//! Data entity module
//!
//! SeaORM entity definitions, one per table.

pub mod prelude;

pub mod game;
pub mod game_review;
