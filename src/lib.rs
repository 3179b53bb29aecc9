pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod model;
pub mod utils;

pub use config::Settings;
pub use database::PersistenceContext;
pub use error::{Error, Result};
pub use fixture::{Fixture, GAME_TITLES};
pub use model::{Fetch, Game, GameReview};

use database::connection::{close_connection, open_database};

/// Seeds the fixture and returns every game with its reviews join-fetched.
pub async fn seed_and_fetch(ctx: &mut PersistenceContext, fixture: &Fixture) -> Result<Vec<Game>> {
    fixture.prepare(ctx).await?;
    let games = ctx.find_games_with_reviews().await?;
    for game in &games {
        log::info!("Game: {}", game);
        log::info!("Reviews on game: {}", game.review_count().unwrap_or(0));
        for review in game.reviews.get().into_iter().flatten() {
            log::debug!("Review: {}", review);
        }
    }
    fixture.finish(ctx).await?;
    Ok(games)
}

/// Connects, migrates, seeds the default fixture and prints the result as JSON.
pub async fn run(settings: Settings) -> Result<()> {
    let conn = open_database(&settings).await?;
    log::info!("database connection established");

    let mut ctx = PersistenceContext::new(conn.clone());
    let result = seed_and_fetch(&mut ctx, &Fixture::default()).await;
    drop(ctx);

    let rendered = result.and_then(|games| serde_json::to_string_pretty(&games).map_err(Error::from));

    // closed on both paths
    match close_connection(conn).await {
        Ok(_) => log::info!("database connection closed"),
        Err(e) => log::error!("error while closing the database connection: {}", e),
    }

    println!("{}", rendered?);
    Ok(())
}
