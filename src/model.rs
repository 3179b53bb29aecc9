//! Domain records
//!
//! `Game` and `GameReview` are the in-memory shape handed to callers. They wrap
//! the SeaORM models with a surrogate key that stays `None` until the record is
//! saved, and with relationship slots that say whether the other side was
//! fetched.

use std::fmt;
use std::future::Future;

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::database::repository::{GamesRepository, ReviewsRepository};
use crate::entity::game::{self, ValidationError, validate_title};
use crate::entity::game_review;

/// Load state of a relationship.
///
/// Only join-fetch queries produce `Loaded`; plain queries leave the slot as
/// `NotLoaded` and nothing resolves it on access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Fetch<T> {
    NotLoaded,
    Loaded(T),
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::NotLoaded
    }
}

impl<T> Fetch<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Fetch::Loaded(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            Fetch::NotLoaded => None,
        }
    }
}

/// Kind tag used to track managed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Game,
    GameReview,
}

impl RecordKind {
    pub fn name(self) -> &'static str {
        match self {
            RecordKind::Game => "Game",
            RecordKind::GameReview => "GameReview",
        }
    }
}

// ==================== Game ====================

#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: Option<i32>,
    pub title: String,
    pub reviews: Fetch<Vec<GameReview>>,
}

impl Game {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            reviews: Fetch::NotLoaded,
        }
    }

    /// Builds a game with its reviews already fetched.
    pub fn with_reviews(model: game::Model, reviews: Vec<game_review::Model>) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            reviews: Fetch::Loaded(reviews.into_iter().map(GameReview::from).collect()),
        }
    }

    /// Number of fetched reviews, `None` when the collection was not loaded.
    pub fn review_count(&self) -> Option<usize> {
        self.reviews.get().map(Vec::len)
    }
}

impl From<game::Model> for Game {
    fn from(model: game::Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            reviews: Fetch::NotLoaded,
        }
    }
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game [id={}, title={}]", DisplayId(self.id), self.title)
    }
}

// ==================== GameReview ====================

/// A review of a game.
///
/// `game_id` is the stored foreign key. `game` is an in-memory reference that is
/// never written; the two can disagree and nothing here reconciles them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameReview {
    pub id: Option<i32>,
    pub score: Option<f64>,
    pub note: Option<String>,
    pub game_id: Option<i32>,
    pub game: Fetch<Box<Game>>,
}

impl GameReview {
    pub fn new() -> Self {
        Self::default()
    }

    /// A review pointing at `game_id` through the foreign key only.
    pub fn for_game_id(game_id: i32) -> Self {
        Self {
            game_id: Some(game_id),
            ..Self::default()
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_game(mut self, game: Game) -> Self {
        self.set_game(game);
        self
    }

    /// Sets the object reference; `game_id` is left as it is.
    pub fn set_game(&mut self, game: Game) {
        self.game = Fetch::Loaded(Box::new(game));
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.get().map(Box::as_ref)
    }

    /// Builds a review with its owning game already fetched.
    pub fn with_fetched_game(model: game_review::Model, game: game::Model) -> Self {
        let mut review = Self::from(model);
        review.set_game(Game::from(game));
        review
    }
}

impl From<game_review::Model> for GameReview {
    fn from(model: game_review::Model) -> Self {
        Self {
            id: Some(model.id),
            score: model.score,
            note: model.note,
            game_id: model.game_id,
            game: Fetch::NotLoaded,
        }
    }
}

impl PartialEq for GameReview {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl fmt::Display for GameReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameReview [id={}, score={}, note={}, gameId={}]",
            DisplayId(self.id),
            self.score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.note.as_deref().unwrap_or("none"),
            DisplayId(self.game_id)
        )
    }
}

struct DisplayId(Option<i32>);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("none"),
        }
    }
}

// ==================== Persistence ====================

/// A record type the persistence context can save and bulk delete.
pub trait Persist: fmt::Display {
    const KIND: RecordKind;

    fn id(&self) -> Option<i32>;

    fn assign_id(&mut self, id: i32);

    /// Field constraints checked before the row is written.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Inserts the record and returns the generated key.
    fn insert<C>(&self, db: &C) -> impl Future<Output = Result<i32, DbErr>>
    where
        C: ConnectionTrait;

    /// Removes every row of this type.
    fn delete_all<C>(db: &C) -> impl Future<Output = Result<u64, DbErr>>
    where
        C: ConnectionTrait;
}

impl Persist for Game {
    const KIND: RecordKind = RecordKind::Game;

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    async fn insert<C>(&self, db: &C) -> Result<i32, DbErr>
    where
        C: ConnectionTrait,
    {
        let active = game::ActiveModel {
            id: NotSet,
            title: Set(self.title.clone()),
        };
        let model = active.insert(db).await?;
        Ok(model.id)
    }

    async fn delete_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        GamesRepository::delete_all(db).await
    }
}

impl Persist for GameReview {
    const KIND: RecordKind = RecordKind::GameReview;

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    async fn insert<C>(&self, db: &C) -> Result<i32, DbErr>
    where
        C: ConnectionTrait,
    {
        // the `game` reference is not insertable, only the key is stored
        let active = game_review::ActiveModel {
            id: NotSet,
            score: Set(self.score),
            note: Set(self.note.clone()),
            game_id: Set(self.game_id),
        };
        let model = active.insert(db).await?;
        Ok(model.id)
    }

    async fn delete_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        ReviewsRepository::delete_all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_the_surrogate_key() {
        let mut a = Game::new("Mario Kart");
        let mut b = Game::new("F-Zero");
        assert_ne!(a, b);
        assert_eq!(a, a);

        a.assign_id(7);
        b.assign_id(7);
        assert_eq!(a, b);
    }

    #[test]
    fn transient_games_with_same_title_differ() {
        let a = Game::new("Mario Kart");
        let b = a.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn reference_and_key_are_independent() {
        let mut game = Game::new("F-Zero");
        game.assign_id(3);

        let review = GameReview::for_game_id(9).with_game(game);
        assert_eq!(review.game_id, Some(9));
        assert_eq!(review.game().and_then(|g| g.id), Some(3));

        let bare = GameReview::for_game_id(3);
        assert!(!bare.game.is_loaded());
        assert!(bare.game().is_none());
    }

    #[test]
    fn converted_models_leave_relationships_unloaded() {
        let game = Game::from(game::Model {
            id: 1,
            title: "Mario Kart".into(),
        });
        assert_eq!(game.review_count(), None);

        let review = GameReview::from(game_review::Model {
            id: 2,
            score: Some(0.25),
            note: None,
            game_id: Some(1),
        });
        assert!(!review.game.is_loaded());
    }

    #[test]
    fn display_matches_log_format() {
        let mut game = Game::new("F-Zero");
        assert_eq!(game.to_string(), "Game [id=none, title=F-Zero]");
        game.assign_id(4);
        assert_eq!(game.to_string(), "Game [id=4, title=F-Zero]");

        let review = GameReview::for_game_id(4).with_score(0.5).with_note("fast");
        assert_eq!(
            review.to_string(),
            "GameReview [id=none, score=0.5, note=fast, gameId=4]"
        );
    }

    #[test]
    fn fetch_serializes_with_state_tag() {
        let loaded: Fetch<i32> = Fetch::Loaded(3);
        let json = serde_json::to_value(&loaded).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "loaded", "value": 3 }));

        let empty: Fetch<i32> = Fetch::NotLoaded;
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "not_loaded" }));
    }
}
