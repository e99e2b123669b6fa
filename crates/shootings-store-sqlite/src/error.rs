//! Error type for `shootings-store-sqlite`.

use shootings_core::Table;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Loading is append-only; a second load would collide on primary keys.
  #[error("store is not empty: table {table} already holds {rows} rows")]
  StoreNotEmpty { table: Table, rows: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
