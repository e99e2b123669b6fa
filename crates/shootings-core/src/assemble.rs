//! Fact and bridge assembly: raw rows re-expressed through surrogate keys.
//!
//! Each candidate row is resolved column by column against the tables built
//! earlier. The first column that fails to resolve drops the row and records
//! an [`Issue`]; nothing is retried.

use crate::{
  diagnostics::{Issue, IssueKind, Report, describe},
  dimension::Dimensions,
  entity::{AttributeIds, EntityTable, unresolved_attribute},
  key::{KeyAssigner, distinct},
  model::{BridgeRow, IncidentRow, IncidentTimeRow},
  parse,
  record::{Coordinate, IncidentRecord, Label},
  table::Table,
};

fn missing(table: Table, column: &'static str, value: &Label) -> Issue {
  Issue::new(table, column, IssueKind::MissingField, describe(value))
}

fn unresolved(table: Table, column: &'static str, value: &Label) -> Issue {
  Issue::new(table, column, IssueKind::UnresolvedReference, describe(value))
}

fn unparseable(table: Table, column: &'static str, value: &str) -> Issue {
  Issue::new(table, column, IssueKind::UnparseableField, value)
}

/// Keep resolved rows (deduplicated, in first-seen order) and record the
/// rest.
fn collect_resolved<T, I>(
  table: Table,
  candidates: I,
  report: &mut Report,
) -> Vec<T>
where
  T: Eq + std::hash::Hash + Clone,
  I: IntoIterator<Item = Result<T, Issue>>,
{
  let mut seen = 0;
  let mut dropped = 0;
  let mut rows = KeyAssigner::new();
  for candidate in candidates {
    seen += 1;
    match candidate {
      Ok(row) => {
        rows.assign(row);
      }
      Err(issue) => {
        dropped += 1;
        report.record(issue);
      }
    }
  }
  let rows = rows.into_tuples();
  report.stage(table, seen, dropped, rows.len());
  rows
}

// ─── Incident ────────────────────────────────────────────────────────────────

/// The natural (pre-surrogate) columns of an incident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RawIncident<'a> {
  incident_key:      &'a Label,
  precinct:          &'a Label,
  boro:              &'a Label,
  jurisdiction_code: &'a Label,
  murder_flag:       &'a Label,
  coordinate:        Coordinate,
  location_desc:     &'a Label,
}

impl<'a> RawIncident<'a> {
  fn from_record(record: &'a IncidentRecord) -> Self {
    Self {
      incident_key:      &record.incident_key,
      precinct:          &record.precinct,
      boro:              &record.boro,
      jurisdiction_code: &record.jurisdiction_code,
      murder_flag:       &record.statistical_murder_flag,
      coordinate:        record.coordinate(),
      location_desc:     &record.location_desc,
    }
  }

  fn resolve(&self, dims: &Dimensions) -> Result<IncidentRow, Issue> {
    const T: Table = Table::Incident;

    let incident_key = self
      .incident_key
      .clone()
      .ok_or_else(|| missing(T, "incident_key", self.incident_key))?;
    let precinct = self
      .precinct
      .clone()
      .ok_or_else(|| missing(T, "precinct", self.precinct))?;

    let borough_id = dims
      .borough
      .resolve(self.boro)
      .ok_or_else(|| unresolved(T, "boro", self.boro))?;

    let raw_code = self
      .jurisdiction_code
      .as_deref()
      .ok_or_else(|| missing(T, "jurisdiction_code", self.jurisdiction_code))?;
    let jurisdiction_code = parse::jurisdiction_code(raw_code)
      .map_err(|_| unparseable(T, "jurisdiction_code", raw_code))?;
    if !dims.jurisdiction.contains(jurisdiction_code) {
      return Err(unresolved(T, "jurisdiction_code", self.jurisdiction_code));
    }

    let raw_flag = self
      .murder_flag
      .as_deref()
      .ok_or_else(|| missing(T, "statistical_murder_flag", self.murder_flag))?;
    let flag = parse::murder_flag(raw_flag)
      .map_err(|_| unparseable(T, "statistical_murder_flag", raw_flag))?;
    let murder_flag_id = dims
      .murder_flag
      .lookup(&flag)
      .ok_or_else(|| unresolved(T, "statistical_murder_flag", self.murder_flag))?;

    let coordinate_id = dims.coordinate.lookup(&self.coordinate).ok_or_else(|| {
      Issue::new(
        T,
        "coordinate",
        IssueKind::UnresolvedReference,
        format!("{:?}", self.coordinate),
      )
    })?;

    let location_id = dims
      .location
      .resolve(self.location_desc)
      .ok_or_else(|| unresolved(T, "location_desc", self.location_desc))?;

    Ok(IncidentRow {
      incident_key,
      precinct,
      borough_id,
      jurisdiction_code,
      murder_flag_id,
      coordinate_id,
      location_id,
    })
  }
}

/// Build the incident fact table from the distinct raw incident tuples.
///
/// Two raw tuples that resolve to the same keys yield one row, so the
/// composite primary key is never repeated.
pub fn assemble_incidents(
  records: &[IncidentRecord],
  dims: &Dimensions,
  report: &mut Report,
) -> Vec<IncidentRow> {
  let raw = distinct(records.iter().map(RawIncident::from_record));
  collect_resolved(
    Table::Incident,
    raw.iter().map(|r| r.resolve(dims)),
    report,
  )
}

// ─── Bridges ─────────────────────────────────────────────────────────────────

/// Link every raw row to the entity implied by its party attributes.
///
/// Resolution goes labels → attribute ids → entity key, because entity keys
/// are derived from ids rather than labels.
pub fn assemble_bridge(
  entities: &EntityTable,
  records: &[IncidentRecord],
  dims: &Dimensions,
  report: &mut Report,
) -> Vec<BridgeRow> {
  let party = entities.party();
  let table = party.bridge_table();

  let candidates = records.iter().map(|record| -> Result<BridgeRow, Issue> {
    let incident_key = record
      .incident_key
      .clone()
      .ok_or_else(|| missing(table, "incident_key", &record.incident_key))?;

    let labels = party.labels(record);
    let ids = AttributeIds::resolve(dims, &labels);
    if let Some(issue) = unresolved_attribute(table, party, &labels, &ids) {
      return Err(issue);
    }

    let entity_id = entities.lookup(&ids).ok_or_else(|| {
      Issue::new(
        table,
        entities.table().name(),
        IssueKind::UnresolvedReference,
        format!("{ids:?}"),
      )
    })?;

    Ok(BridgeRow { incident_key, entity_id })
  });

  collect_resolved(table, candidates, report)
}

// ─── Incident time ───────────────────────────────────────────────────────────

pub fn assemble_times(
  records: &[IncidentRecord],
  report: &mut Report,
) -> Vec<IncidentTimeRow> {
  const T: Table = Table::IncidentTime;

  let raw = distinct(
    records
      .iter()
      .map(|r| (&r.incident_key, &r.occur_date, &r.occur_time)),
  );

  let candidates = raw.into_iter().map(
    |(key, date, time)| -> Result<IncidentTimeRow, Issue> {
      let incident_key =
        key.clone().ok_or_else(|| missing(T, "incident_key", key))?;
      let raw_date =
        date.as_deref().ok_or_else(|| missing(T, "occur_date", date))?;
      let raw_time =
        time.as_deref().ok_or_else(|| missing(T, "occur_time", time))?;
      let date = parse::occur_date(raw_date)
        .map_err(|_| unparseable(T, "occur_date", raw_date))?;
      let time = parse::occur_time(raw_time)
        .map_err(|_| unparseable(T, "occur_time", raw_time))?;
      Ok(IncidentTimeRow { incident_key, date, time })
    },
  );

  collect_resolved(T, candidates, report)
}
