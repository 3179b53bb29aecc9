//! Known data state for persistence scenarios
//!
//! [`Fixture::prepare`] wipes both tables, inserts one game per title, gives
//! every game two reviews and leaves a fresh transaction open. Each phase
//! commits before the next starts and clears the managed set, so reads in the
//! following phase go back to storage.
//!
//! Of the two reviews per game, the first only carries `game_id`; the second
//! also has its `game` reference set. Join-fetch queries must resolve the game
//! for both.

use rand::Rng;

use crate::database::PersistenceContext;
use crate::error::{Error, Result};
use crate::model::{Game, GameReview};

pub const GAME_TITLES: [&str; 3] = ["Super Mario Brothers", "Mario Kart", "F-Zero"];

/// Reviews inserted per game.
pub const REVIEWS_PER_GAME: usize = 2;

#[derive(Debug, Clone)]
pub struct Fixture {
    titles: Vec<String>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::with_titles(GAME_TITLES)
    }
}

impl Fixture {
    pub fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Seeds the data with thread-local random scores and begins a transaction.
    pub async fn prepare(&self, ctx: &mut PersistenceContext) -> Result<()> {
        self.prepare_with_rng(ctx, &mut rand::rng()).await
    }

    pub async fn prepare_with_rng<R>(&self, ctx: &mut PersistenceContext, rng: &mut R) -> Result<()>
    where
        R: Rng,
    {
        self.clear_data(ctx).await?;
        self.insert_game_data(ctx).await?;
        self.insert_review_data(ctx, rng).await?;
        ctx.begin().await
    }

    /// Commits the transaction `prepare` left open.
    pub async fn finish(&self, ctx: &mut PersistenceContext) -> Result<()> {
        ctx.commit().await
    }

    pub async fn clear_data(&self, ctx: &mut PersistenceContext) -> Result<()> {
        ctx.begin().await?;
        log::info!("Dumping old records...");
        // reviews first, nothing cascades
        ctx.delete_all::<GameReview>().await?;
        ctx.delete_all::<Game>().await?;
        ctx.commit().await
    }

    pub async fn insert_game_data(&self, ctx: &mut PersistenceContext) -> Result<()> {
        ctx.begin().await?;
        log::info!("Inserting games...");
        for title in &self.titles {
            let mut game = Game::new(title.as_str());
            ctx.save(&mut game).await?;
        }
        ctx.commit().await?;
        ctx.clear();
        Ok(())
    }

    pub async fn insert_review_data<R>(&self, ctx: &mut PersistenceContext, rng: &mut R) -> Result<()>
    where
        R: Rng,
    {
        ctx.begin().await?;
        log::info!("Inserting reviews...");
        for title in &self.titles {
            let game = ctx.find_single_game_by_title(title).await?;
            let game_id = game.id.ok_or_else(|| Error::NoResult {
                entity: "Game",
                criteria: format!("id of {:?}", title),
            })?;

            // key only, reference left unset
            let mut review = GameReview::for_game_id(game_id).with_score(rng.random::<f64>());
            ctx.save(&mut review).await?;

            let mut review = GameReview::for_game_id(game_id)
                .with_game(game)
                .with_score(rng.random::<f64>());
            ctx.save(&mut review).await?;
        }
        ctx.commit().await?;
        ctx.clear();
        Ok(())
    }
}
