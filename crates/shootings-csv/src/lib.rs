//! CSV reader for the shooting-incident and precinct source files.
//!
//! Pure synchronous; converts CSV text into [`shootings_core::record`] rows.
//! Header names are lower-cased before lookup, surrounding whitespace is
//! trimmed from every field, and an empty field reads as a missing value.
//!
//! # Quick start
//!
//! ```no_run
//! let incidents = shootings_csv::read_incidents_path("nypd_shooting.csv").unwrap();
//! println!("{} incident rows", incidents.len());
//! ```

pub mod error;

use std::{fs::File, io::Read, path::Path};

use serde::de::DeserializeOwned;
use shootings_core::record::{
  INCIDENT_COLUMNS, IncidentRecord, PRECINCT_COLUMNS, PrecinctRecord,
};

pub use error::{Error, Result};

// ─── Public API ──────────────────────────────────────────────────────────────

/// Read every row of an incident file.
pub fn read_incidents<R: Read>(input: R) -> Result<Vec<IncidentRecord>> {
  read_records(input, "incident", INCIDENT_COLUMNS)
}

/// Read every row of a precinct reference file.
pub fn read_precincts<R: Read>(input: R) -> Result<Vec<PrecinctRecord>> {
  read_records(input, "precinct", PRECINCT_COLUMNS)
}

pub fn read_incidents_path(path: impl AsRef<Path>) -> Result<Vec<IncidentRecord>> {
  read_incidents(open(path.as_ref())?)
}

pub fn read_precincts_path(path: impl AsRef<Path>) -> Result<Vec<PrecinctRecord>> {
  read_precincts(open(path.as_ref())?)
}

// ─── Internals ───────────────────────────────────────────────────────────────

fn open(path: &Path) -> Result<File> {
  File::open(path).map_err(|source| Error::Open {
    path: path.to_path_buf(),
    source,
  })
}

fn read_records<R, T>(
  input: R,
  file: &'static str,
  required: &'static [&'static str],
) -> Result<Vec<T>>
where
  R: Read,
  T: DeserializeOwned,
{
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .flexible(false)
    .from_reader(input);

  let headers: csv::StringRecord = reader
    .headers()?
    .iter()
    .map(str::to_lowercase)
    .collect();

  if let Some(column) = required
    .iter()
    .find(|column| !headers.iter().any(|h| h == **column))
  {
    return Err(Error::MissingColumn { file, column });
  }

  reader.set_headers(headers);
  reader
    .deserialize()
    .collect::<std::result::Result<Vec<T>, csv::Error>>()
    .map_err(Error::from)
}
