pub mod items;
pub mod users;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;

use crate::db::DbPool;

/// Closed set of store-layer failures. Driver error codes stop here; nothing
/// above the store layer sees a `rusqlite` or `r2d2` type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("registro duplicado")]
    DuplicateKey,

    #[error("banco de dados indisponível: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateKey
            }
            other => StoreError::Other(other.to_string()),
        }
    }
}

pub(crate) fn checkout(
    pool: &DbPool,
) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
    pool.get().map_err(|e| StoreError::Unavailable(e.to_string()))
}
