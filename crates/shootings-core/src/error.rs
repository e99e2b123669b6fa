//! Error types for `shootings-core`.
//!
//! None of these abort a pipeline run: the builders turn them into
//! diagnostics and drop the offending row.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid jurisdiction code: {0:?}")]
  InvalidJurisdictionCode(String),

  #[error("invalid murder flag: {0:?}")]
  InvalidMurderFlag(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("invalid time: {0:?}")]
  InvalidTime(String),

  #[error("no precinct number in {0:?}")]
  MissingPrecinctNumber(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
