//! Error type for the shootings pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("reading input: {0}")]
  Csv(#[from] shootings_csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The load committed but the store's own foreign-key scan disagrees.
  #[error("{0} foreign key violations after load")]
  ForeignKeyViolations(usize),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
