use crate::entity::prelude::*;
use crate::entity::{game, game_review};
use crate::model::GameReview;
use sea_orm::*;

/// Review repository
pub struct ReviewsRepository;

impl ReviewsRepository {
    /// All reviews by id, owning game not loaded
    pub async fn find_all<C>(db: &C) -> Result<Vec<GameReview>, DbErr>
    where
        C: ConnectionTrait,
    {
        let reviews = GameReviews::find()
            .order_by_asc(game_review::Column::Id)
            .all(db)
            .await?;
        Ok(reviews.into_iter().map(GameReview::from).collect())
    }

    /// All reviews joined with their owning game, by review id
    ///
    /// The game is resolved from `game_id` alone. Reviews without a matching
    /// game are dropped, as an inner join would.
    pub async fn find_all_with_game<C>(db: &C) -> Result<Vec<GameReview>, DbErr>
    where
        C: ConnectionTrait,
    {
        let rows = GameReviews::find()
            .find_also_related(Games)
            .filter(game::Column::Id.is_not_null())
            .order_by_asc(game_review::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(review, game)| game.map(|g| GameReview::with_fetched_game(review, g)))
            .collect())
    }

    /// Reviews of one game, by id
    pub async fn find_by_game<C>(db: &C, game_id: i32) -> Result<Vec<GameReview>, DbErr>
    where
        C: ConnectionTrait,
    {
        let reviews = GameReviews::find()
            .filter(game_review::Column::GameId.eq(game_id))
            .order_by_asc(game_review::Column::Id)
            .all(db)
            .await?;
        Ok(reviews.into_iter().map(GameReview::from).collect())
    }

    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        GameReviews::find().count(db).await
    }

    pub async fn count_by_game<C>(db: &C, game_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        GameReviews::find()
            .filter(game_review::Column::GameId.eq(game_id))
            .count(db)
            .await
    }

    /// Delete every review
    pub async fn delete_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        GameReviews::delete_many()
            .exec(db)
            .await
            .map(|result| result.rows_affected)
    }
}
