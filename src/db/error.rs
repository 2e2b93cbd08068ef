use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Store failures that callers need to tell apart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds the value being written.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Duplicate(detail),
            _ => Self::Db(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
