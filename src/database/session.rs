//! Persistence context
//!
//! A transactional session over one `DatabaseConnection`. Writes and queries
//! run inside the transaction opened by [`PersistenceContext::begin`]; nothing
//! becomes visible to other sessions until [`PersistenceContext::commit`].
//! Dropping the context with a transaction still open rolls it back.
//!
//! A record rejected by validation marks the transaction rollback-only: the
//! failed `save` reports the error and the following `commit` rolls back and
//! reports it again.
//!
//! The context also remembers which records it has saved or loaded (the managed
//! set). [`PersistenceContext::clear`] forgets them so that later reads are
//! understood to come from storage rather than from earlier in-memory state.

use std::collections::HashSet;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::database::repository::{GamesRepository, ReviewsRepository};
use crate::entity::game::ValidationError;
use crate::error::{Error, Result};
use crate::model::{Game, GameReview, Persist, RecordKind};

pub struct PersistenceContext {
    db: DatabaseConnection,
    txn: Option<DatabaseTransaction>,
    managed: HashSet<(RecordKind, i32)>,
    rollback_only: Option<ValidationError>,
}

impl PersistenceContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            txn: None,
            managed: HashSet::new(),
            rollback_only: None,
        }
    }

    /// Underlying connection, for work outside the session's transaction.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // ==================== Transaction boundary ====================

    pub async fn begin(&mut self) -> Result<()> {
        if self.txn.is_some() {
            return Err(Error::TransactionActive);
        }
        self.txn = Some(self.db.begin().await?);
        self.rollback_only = None;
        log::trace!("transaction started");
        Ok(())
    }

    /// Commits the open transaction.
    ///
    /// A rollback-only transaction is rolled back instead and the validation
    /// error that marked it is returned.
    pub async fn commit(&mut self) -> Result<()> {
        let txn = self.txn.take().ok_or(Error::TransactionRequired)?;
        if let Some(err) = self.rollback_only.take() {
            self.managed.clear();
            txn.rollback().await?;
            log::warn!("transaction rolled back on commit: {}", err);
            return Err(Error::Validation(err));
        }
        txn.commit().await?;
        log::trace!("transaction committed");
        Ok(())
    }

    /// Discards the open transaction and detaches every managed record.
    pub async fn rollback(&mut self) -> Result<()> {
        let txn = self.txn.take().ok_or(Error::TransactionRequired)?;
        self.managed.clear();
        self.rollback_only = None;
        txn.rollback().await?;
        log::trace!("transaction rolled back");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.txn.is_some()
    }

    /// Whether the open transaction can only be rolled back.
    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only.is_some()
    }

    /// The open transaction.
    pub fn transaction(&self) -> Result<&DatabaseTransaction> {
        self.txn.as_ref().ok_or(Error::TransactionRequired)
    }

    // ==================== Writes ====================

    /// Saves a record and returns its surrogate key.
    ///
    /// The key is generated on the first save of an instance and written back
    /// into it. Saving an instance that already has a key does not insert again.
    /// A validation failure marks the transaction rollback-only.
    pub async fn save<R>(&mut self, record: &mut R) -> Result<i32>
    where
        R: Persist,
    {
        let txn = self.txn.as_ref().ok_or(Error::TransactionRequired)?;

        if let Some(id) = record.id() {
            self.managed.insert((R::KIND, id));
            return Ok(id);
        }

        if let Err(err) = record.validate() {
            self.rollback_only.get_or_insert_with(|| err.clone());
            return Err(err.into());
        }
        let id = record.insert(txn).await?;
        record.assign_id(id);
        self.managed.insert((R::KIND, id));
        log::debug!("persisted {}", record);
        Ok(id)
    }

    /// Deletes every row of `R` and detaches the managed records of that kind.
    pub async fn delete_all<R>(&mut self) -> Result<u64>
    where
        R: Persist,
    {
        let txn = self.txn.as_ref().ok_or(Error::TransactionRequired)?;
        let removed = R::delete_all(txn).await?;
        self.managed.retain(|(kind, _)| *kind != R::KIND);
        log::debug!("deleted {} {} rows", removed, R::KIND.name());
        Ok(removed)
    }

    // ==================== Queries ====================

    pub async fn find_games_by_title(&mut self, title: &str) -> Result<Vec<Game>> {
        let games = GamesRepository::find_by_title(self.transaction()?, title).await?;
        self.manage_games(&games);
        Ok(games)
    }

    /// Exactly one game titled `title`, otherwise a cardinality error.
    pub async fn find_single_game_by_title(&mut self, title: &str) -> Result<Game> {
        let game = GamesRepository::find_single_by_title(self.transaction()?, title).await?;
        self.manage_games(std::slice::from_ref(&game));
        Ok(game)
    }

    pub async fn find_games(&mut self) -> Result<Vec<Game>> {
        let games = GamesRepository::find_all(self.transaction()?).await?;
        self.manage_games(&games);
        Ok(games)
    }

    /// Games with their reviews join-fetched, ordered by id.
    pub async fn find_games_with_reviews(&mut self) -> Result<Vec<Game>> {
        let games = GamesRepository::find_all_with_reviews(self.transaction()?).await?;
        self.manage_games(&games);
        Ok(games)
    }

    pub async fn find_reviews(&mut self) -> Result<Vec<GameReview>> {
        let reviews = ReviewsRepository::find_all(self.transaction()?).await?;
        self.manage_reviews(&reviews);
        Ok(reviews)
    }

    /// Reviews with their owning game join-fetched, ordered by id.
    pub async fn find_reviews_with_game(&mut self) -> Result<Vec<GameReview>> {
        let reviews = ReviewsRepository::find_all_with_game(self.transaction()?).await?;
        self.manage_reviews(&reviews);
        Ok(reviews)
    }

    pub async fn count_games(&self) -> Result<u64> {
        Ok(GamesRepository::count(self.transaction()?).await?)
    }

    pub async fn count_reviews(&self) -> Result<u64> {
        Ok(ReviewsRepository::count(self.transaction()?).await?)
    }

    // ==================== Managed set ====================

    /// Detaches every managed record.
    pub fn clear(&mut self) {
        log::trace!("detaching {} managed records", self.managed.len());
        self.managed.clear();
    }

    pub fn is_managed<R>(&self, record: &R) -> bool
    where
        R: Persist,
    {
        record
            .id()
            .is_some_and(|id| self.managed.contains(&(R::KIND, id)))
    }

    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }

    fn manage_games(&mut self, games: &[Game]) {
        for game in games {
            if let Some(id) = game.id {
                self.managed.insert((RecordKind::Game, id));
            }
            if let Some(reviews) = game.reviews.get() {
                self.manage_reviews(reviews);
            }
        }
    }

    fn manage_reviews(&mut self, reviews: &[GameReview]) {
        for review in reviews {
            if let Some(id) = review.id {
                self.managed.insert((RecordKind::GameReview, id));
            }
            if let Some(game) = review.game() {
                if let Some(id) = game.id {
                    self.managed.insert((RecordKind::Game, id));
                }
            }
        }
    }
}
