//! Shortcut imports for the SeaORM entities.

pub use super::game::Entity as Games;
pub use super::game_review::Entity as GameReviews;
