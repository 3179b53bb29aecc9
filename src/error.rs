use sea_orm::DbErr;
use thiserror::Error;

use crate::entity::game::ValidationError;

/// Errors raised by the persistence layer and its harness.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("no {entity} matched {criteria}")]
    NoResult {
        entity: &'static str,
        criteria: String,
    },

    #[error("expected exactly one {entity} for {criteria}, found {count}")]
    NonUniqueResult {
        entity: &'static str,
        criteria: String,
        count: usize,
    },

    #[error("a transaction is already active")]
    TransactionActive,

    #[error("no active transaction")]
    TransactionRequired,

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
