use game_reviews_lib::database::connection::open_database;
use game_reviews_lib::{PersistenceContext, Settings};

/// A session over a fresh, migrated in-memory database.
pub async fn open_context() -> PersistenceContext {
    let conn = open_database(&Settings::in_memory())
        .await
        .expect("in-memory database should open");
    PersistenceContext::new(conn)
}
