//! Orchestration of the shootings load: read both source files, normalize
//! them, and write the model into a [`ModelStore`].
//!
//! The `shootings` binary is a thin wrapper around [`run`]; tests drive the
//! same functions with in-memory inputs and an in-memory store.

pub mod error;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{RunSummary, extract, extract_paths, load, run, transform};

use std::path::PathBuf;

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `SHOOTINGS_*`
/// environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct EtlConfig {
  pub incidents_path:      PathBuf,
  pub precincts_path:      PathBuf,
  pub store_path:          PathBuf,
  /// Refuse to load into a store that already holds rows.
  #[serde(default = "default_require_empty_store")]
  pub require_empty_store: bool,
}

fn default_require_empty_store() -> bool { true }
