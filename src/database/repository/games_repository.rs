//! Game repository
//!
//! Queries over the `game` table. Every function takes any `ConnectionTrait`, so
//! the same query runs on a plain connection or inside an open transaction.

use crate::entity::prelude::*;
use crate::entity::{game, game_review};
use crate::error::{Error, Result};
use crate::model::Game;
use sea_orm::*;

pub struct GamesRepository;

impl GamesRepository {
    // ==================== Lookups ====================

    /// Find a game by id
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<Game>, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Games::find_by_id(id).one(db).await?.map(Game::from))
    }

    /// All games whose title equals `title` exactly, by id
    pub async fn find_by_title<C>(db: &C, title: &str) -> Result<Vec<Game>, DbErr>
    where
        C: ConnectionTrait,
    {
        let games = Games::find()
            .filter(game::Column::Title.eq(title))
            .order_by_asc(game::Column::Id)
            .all(db)
            .await?;
        Ok(games.into_iter().map(Game::from).collect())
    }

    /// The one game titled `title`
    ///
    /// Zero matches is `Error::NoResult`, more than one is
    /// `Error::NonUniqueResult`.
    pub async fn find_single_by_title<C>(db: &C, title: &str) -> Result<Game>
    where
        C: ConnectionTrait,
    {
        let mut games = Self::find_by_title(db, title).await?;
        match games.len() {
            1 => Ok(games.remove(0)),
            0 => Err(Error::NoResult {
                entity: "Game",
                criteria: format!("title = {:?}", title),
            }),
            count => Err(Error::NonUniqueResult {
                entity: "Game",
                criteria: format!("title = {:?}", title),
                count,
            }),
        }
    }

    /// All games by id, reviews not loaded
    pub async fn find_all<C>(db: &C) -> Result<Vec<Game>, DbErr>
    where
        C: ConnectionTrait,
    {
        let games = Games::find().order_by_asc(game::Column::Id).all(db).await?;
        Ok(games.into_iter().map(Game::from).collect())
    }

    /// All games joined with their reviews in one query, by game id
    ///
    /// Join semantics: a game without reviews is not part of the result.
    pub async fn find_all_with_reviews<C>(db: &C) -> Result<Vec<Game>, DbErr>
    where
        C: ConnectionTrait,
    {
        let rows = Games::find()
            .find_with_related(GameReviews)
            .order_by_asc(game::Column::Id)
            .order_by_asc(game_review::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|(_, reviews)| !reviews.is_empty())
            .map(|(game, reviews)| Game::with_reviews(game, reviews))
            .collect())
    }

    /// Total number of games
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find().count(db).await
    }

    // ==================== Bulk removal ====================

    /// Delete every game
    ///
    /// Fails while reviews still reference a game; delete those first.
    pub async fn delete_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::delete_many()
            .exec(db)
            .await
            .map(|result| result.rows_affected)
    }
}
