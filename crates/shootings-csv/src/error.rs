//! Error types for the shootings-csv reader.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot open {}: {source}", path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{file} file is missing column {column:?}")]
  MissingColumn {
    file:   &'static str,
    column: &'static str,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
