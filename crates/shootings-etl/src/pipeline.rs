//! The three phases of a load: extract, transform, load.

use std::{io::Read, path::Path};

use serde::Serialize;
use shootings_core::{
  Normalized, NormalizedModel, Report,
  normalize,
  record::{IncidentRecord, PrecinctRecord},
  store::{LoadSummary, ModelStore},
};

use crate::{Error, Result};

/// What one run produced: the diagnostics, and what was written unless the
/// run was dry.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub report: Report,
  pub loaded: Option<LoadSummary>,
}

// ─── Extract ──────────────────────────────────────────────────────────────────

/// Read both source files from arbitrary readers.
pub fn extract<I: Read, P: Read>(
  incidents: I,
  precincts: P,
) -> Result<(Vec<IncidentRecord>, Vec<PrecinctRecord>)> {
  let incidents = shootings_csv::read_incidents(incidents)?;
  let precincts = shootings_csv::read_precincts(precincts)?;
  tracing::info!(
    incidents = incidents.len(),
    precincts = precincts.len(),
    "read source rows"
  );
  Ok((incidents, precincts))
}

pub fn extract_paths(
  incidents: &Path,
  precincts: &Path,
) -> Result<(Vec<IncidentRecord>, Vec<PrecinctRecord>)> {
  tracing::debug!(?incidents, ?precincts, "opening source files");
  let incidents = shootings_csv::read_incidents_path(incidents)?;
  let precincts = shootings_csv::read_precincts_path(precincts)?;
  tracing::info!(
    incidents = incidents.len(),
    precincts = precincts.len(),
    "read source rows"
  );
  Ok((incidents, precincts))
}

// ─── Transform ────────────────────────────────────────────────────────────────

/// Normalize the raw rows and log the resulting report.
pub fn transform(
  incidents: &[IncidentRecord],
  precincts: &[PrecinctRecord],
) -> Normalized {
  let normalized = normalize(incidents, precincts);
  log_report(&normalized.report);
  normalized
}

fn log_report(report: &Report) {
  for stage in &report.stages {
    tracing::info!(
      table = %stage.table,
      candidates = stage.candidates,
      dropped = stage.dropped,
      merged = stage.merged(),
      rows = stage.rows,
      "built table"
    );
  }
  for issue in &report.issues {
    tracing::warn!(
      table = %issue.table,
      column = issue.column,
      kind = ?issue.kind,
      count = issue.count,
      sample = %issue.sample,
      "rows dropped or flagged"
    );
  }
}

// ─── Load ─────────────────────────────────────────────────────────────────────

/// Write `model` into `store` and verify referential closure afterwards.
pub async fn load<S: ModelStore>(
  store: &S,
  model: &NormalizedModel,
  require_empty: bool,
) -> Result<LoadSummary> {
  if require_empty {
    store.ensure_empty().await.map_err(Error::store)?;
  }

  let summary = store.load(model).await.map_err(Error::store)?;
  for (table, rows) in &summary.tables {
    tracing::info!(%table, rows, "loaded table");
  }

  let violations = store.foreign_key_violations().await.map_err(Error::store)?;
  if !violations.is_empty() {
    for v in violations.iter().take(10) {
      tracing::error!(
        table = %v.table,
        rowid = ?v.rowid,
        parent = %v.parent,
        "foreign key violation"
      );
    }
    return Err(Error::ForeignKeyViolations(violations.len()));
  }

  tracing::info!(rows = summary.total(), "load complete");
  Ok(summary)
}

/// Transform `incidents` and `precincts`, then load them into `store` unless
/// none is given.
pub async fn run<S: ModelStore>(
  store: Option<&S>,
  incidents: &[IncidentRecord],
  precincts: &[PrecinctRecord],
  require_empty: bool,
) -> Result<RunSummary> {
  let Normalized { model, report } = transform(incidents, precincts);

  let loaded = match store {
    Some(store) => Some(load(store, &model, require_empty).await?),
    None => {
      tracing::info!(rows = model.total_rows(), "dry run, nothing written");
      None
    }
  };

  Ok(RunSummary { report, loaded })
}
