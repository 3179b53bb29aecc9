//! Game entity
//!
//! The `game` table holds one row per title. Reviews point at it through
//! `game_review.game_id`; nothing cascades from here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive bounds on the title length, in characters.
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 50;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_review::Entity")]
    GameReview,
}

impl Related<super::game_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameReview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Rejected field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be between {min} and {max} characters, got {len}")]
    TitleLength { len: usize, min: usize, max: usize },
}

/// Checks a title against the length bound.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if (TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::TitleLength {
            len,
            min: TITLE_MIN_LEN,
            max: TITLE_MAX_LEN,
        })
    }
}
