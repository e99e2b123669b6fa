//! Dimension tables: the distinct values of each categorical column, each
//! paired with a surrogate key.
//!
//! Four discovery modes feed the same [`KeyAssigner`]:
//!
//! - union: perpetrator column then victim column (sex, age group, race);
//! - single column (murder flag, borough, location);
//! - lookup against a fixed code table (jurisdiction);
//! - multi-column, keyed on the whole tuple (coordinate).

use std::hash::Hash;

use crate::{
  diagnostics::{Issue, IssueKind, Report, describe},
  key::{KeyAssigner, SurrogateKey, distinct},
  model::JurisdictionRow,
  parse,
  record::{Coordinate, IncidentRecord, Label, Party, PartyLabels},
  table::Table,
};

/// The fixed jurisdiction code space. Codes outside it produce no row.
pub const JURISDICTIONS: &[(i64, &str)] =
  &[(0, "Patrol"), (1, "Transit"), (2, "Housing")];

pub fn jurisdiction_label(code: i64) -> Option<&'static str> {
  JURISDICTIONS
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, label)| *label)
}

// ─── Dimension ───────────────────────────────────────────────────────────────

/// Distinct values of one category, keyed in order of first appearance.
#[derive(Debug, Clone)]
pub struct Dimension<V> {
  table: Table,
  keys:  KeyAssigner<V>,
}

impl<V: Eq + Hash + Clone> Dimension<V> {
  pub fn from_values(table: Table, values: impl IntoIterator<Item = V>) -> Self {
    Self {
      table,
      keys: values.into_iter().collect(),
    }
  }

  pub fn table(&self) -> Table { self.table }

  pub fn lookup(&self, value: &V) -> Option<SurrogateKey> { self.keys.get(value) }

  /// `(key, value)` rows in key order.
  pub fn rows(&self) -> impl Iterator<Item = (SurrogateKey, &V)> + '_ {
    self.keys.iter()
  }

  pub fn len(&self) -> usize { self.keys.len() }

  pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}

impl Dimension<Label> {
  /// Build a label dimension. Labels are kept exactly as read, so two
  /// spellings of one category are two values.
  pub fn from_labels<'a>(
    table: Table,
    labels: impl IntoIterator<Item = &'a Label>,
  ) -> Self {
    Self::from_values(table, labels.into_iter().cloned())
  }

  /// Resolve a raw source label to its key.
  pub fn resolve(&self, raw: &Label) -> Option<SurrogateKey> { self.lookup(raw) }
}

/// One attribute over both parties: every perpetrator value, then every
/// victim value.
fn union<'a>(
  records: &'a [IncidentRecord],
  pick: impl Fn(PartyLabels<'a>) -> &'a Label + Copy,
) -> impl Iterator<Item = &'a Label> {
  [Party::Perpetrator, Party::Victim]
    .into_iter()
    .flat_map(move |party| records.iter().map(move |r| pick(party.labels(r))))
}

// ─── Jurisdiction ────────────────────────────────────────────────────────────

/// The jurisdiction codes present in the source, limited to the fixed code
/// space.
#[derive(Debug, Clone, Default)]
pub struct Jurisdictions {
  rows: Vec<JurisdictionRow>,
}

impl Jurisdictions {
  pub fn build(records: &[IncidentRecord], report: &mut Report) -> Self {
    const COLUMN: &str = "jurisdiction_code";

    let raw_codes = distinct(records.iter().map(|r| &r.jurisdiction_code));
    let mut rows: Vec<JurisdictionRow> = Vec::new();
    let mut accepted = 0;

    for raw in &raw_codes {
      let Some(text) = raw.as_deref() else {
        report.record(Issue::new(
          Table::Jurisdiction,
          COLUMN,
          IssueKind::MissingField,
          describe(raw),
        ));
        continue;
      };
      let Ok(code) = parse::jurisdiction_code(text) else {
        report.record(Issue::new(
          Table::Jurisdiction,
          COLUMN,
          IssueKind::UnparseableField,
          text,
        ));
        continue;
      };
      let Some(label) = jurisdiction_label(code) else {
        report.record(Issue::new(
          Table::Jurisdiction,
          COLUMN,
          IssueKind::OutOfDomain,
          text,
        ));
        continue;
      };
      accepted += 1;
      // "1" and "1.0" name the same code.
      if !rows.iter().any(|row| row.code == code) {
        rows.push(JurisdictionRow { code, label });
      }
    }

    let dropped = raw_codes.len() - accepted;
    report.stage(Table::Jurisdiction, raw_codes.len(), dropped, rows.len());
    Self { rows }
  }

  pub fn contains(&self, code: i64) -> bool {
    self.rows.iter().any(|row| row.code == code)
  }

  pub fn rows(&self) -> &[JurisdictionRow] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── Murder flag ─────────────────────────────────────────────────────────────

fn murder_flags(records: &[IncidentRecord], report: &mut Report) -> Dimension<bool> {
  const COLUMN: &str = "statistical_murder_flag";

  let raw_flags = distinct(records.iter().map(|r| &r.statistical_murder_flag));
  let mut flags = Vec::with_capacity(raw_flags.len());

  for raw in &raw_flags {
    match raw.as_deref().map(parse::murder_flag) {
      Some(Ok(flag)) => flags.push(flag),
      Some(Err(_)) => report.record(Issue::new(
        Table::StatisticalMurderFlag,
        COLUMN,
        IssueKind::UnparseableField,
        describe(raw),
      )),
      None => report.record(Issue::new(
        Table::StatisticalMurderFlag,
        COLUMN,
        IssueKind::MissingField,
        describe(raw),
      )),
    }
  }

  let flags_len = flags.len();
  let dimension = Dimension::from_values(Table::StatisticalMurderFlag, flags);
  report.stage(
    Table::StatisticalMurderFlag,
    raw_flags.len(),
    raw_flags.len() - flags_len,
    dimension.len(),
  );
  dimension
}

// ─── All dimensions ──────────────────────────────────────────────────────────

/// Every dimension table of the model.
#[derive(Debug, Clone)]
pub struct Dimensions {
  pub sex:          Dimension<Label>,
  pub murder_flag:  Dimension<bool>,
  pub age_group:    Dimension<Label>,
  pub race:         Dimension<Label>,
  pub jurisdiction: Jurisdictions,
  pub borough:      Dimension<Label>,
  pub location:     Dimension<Label>,
  pub coordinate:   Dimension<Coordinate>,
}

impl Dimensions {
  pub fn build(records: &[IncidentRecord], report: &mut Report) -> Self {
    let sex = Dimension::from_labels(Table::Sex, union(records, |l| l.sex));
    let age_group =
      Dimension::from_labels(Table::AgeGroup, union(records, |l| l.age_group));
    let race = Dimension::from_labels(Table::Race, union(records, |l| l.race));
    let borough =
      Dimension::from_labels(Table::Borough, records.iter().map(|r| &r.boro));
    let location = Dimension::from_labels(
      Table::Location,
      records.iter().map(|r| &r.location_desc),
    );
    let coordinate = Dimension::from_values(
      Table::Coordinate,
      records.iter().map(IncidentRecord::coordinate),
    );

    for dim in [&sex, &age_group, &race, &borough, &location] {
      report.stage(dim.table(), dim.len(), 0, dim.len());
    }
    report.stage(Table::Coordinate, coordinate.len(), 0, coordinate.len());

    let murder_flag = murder_flags(records, report);
    let jurisdiction = Jurisdictions::build(records, report);

    Self {
      sex,
      murder_flag,
      age_group,
      race,
      jurisdiction,
      borough,
      location,
      coordinate,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{incident, label};

  fn values(dim: &Dimension<Label>) -> Vec<Option<&str>> {
    dim.rows().map(|(_, v)| v.as_deref()).collect()
  }

  #[test]
  fn union_covers_both_parties() {
    let records = vec![
      IncidentRecord { perp_sex: label("M"), vic_sex: label("F"), ..incident("1") },
      IncidentRecord { perp_sex: label("U"), vic_sex: label("M"), ..incident("2") },
      IncidentRecord { perp_sex: label("F"), vic_sex: label("F"), ..incident("3") },
    ];
    let dims = Dimensions::build(&records, &mut Report::default());
    assert_eq!(dims.sex.len(), 3);
    // Perpetrator column first, then victim column.
    assert_eq!(values(&dims.sex), vec![Some("M"), Some("U"), Some("F")]);
  }

  #[test]
  fn victim_only_labels_are_included() {
    let records = vec![IncidentRecord {
      perp_race: label("WHITE"),
      vic_race: label("ASIAN / PACIFIC ISLANDER"),
      ..incident("1")
    }];
    let dims = Dimensions::build(&records, &mut Report::default());
    assert!(dims.race.resolve(&label("ASIAN / PACIFIC ISLANDER")).is_some());
    assert!(dims.race.resolve(&label("WHITE")).is_some());
  }

  #[test]
  fn missing_label_is_its_own_value() {
    let records = vec![
      IncidentRecord { location_desc: None, ..incident("1") },
      IncidentRecord { location_desc: label("BAR/NIGHT CLUB"), ..incident("2") },
    ];
    let dims = Dimensions::build(&records, &mut Report::default());
    assert_eq!(values(&dims.location), vec![None, Some("BAR/NIGHT CLUB")]);
    assert_eq!(dims.location.resolve(&None), Some(SurrogateKey::new(0)));
  }

  #[test]
  fn spellings_are_distinct_values() {
    let records = vec![
      IncidentRecord { perp_sex: label("M"), vic_sex: label("m"), ..incident("1") },
      IncidentRecord { perp_sex: label("F"), vic_sex: label("f"), ..incident("2") },
      IncidentRecord {
        perp_sex: label("U"),
        vic_sex: label("m"),
        location_desc: label("Bar/Night Club"),
        ..incident("3")
      },
    ];
    let dims = Dimensions::build(&records, &mut Report::default());

    assert_eq!(
      values(&dims.sex),
      vec![Some("M"), Some("F"), Some("U"), Some("m"), Some("f")]
    );
    assert_eq!(
      values(&dims.location),
      vec![Some("MULTI DWELL - PUBLIC HOUS"), Some("Bar/Night Club")]
    );
    assert_eq!(dims.sex.resolve(&label("m")), Some(SurrogateKey::new(3)));
    assert_eq!(dims.location.resolve(&label("BAR/NIGHT CLUB")), None);
  }

  #[test]
  fn jurisdiction_outside_code_space_is_dropped() {
    let records = vec![
      IncidentRecord { jurisdiction_code: label("0"), ..incident("1") },
      IncidentRecord { jurisdiction_code: label("9"), ..incident("2") },
      IncidentRecord { jurisdiction_code: label("2"), ..incident("3") },
      IncidentRecord { jurisdiction_code: label("2.0"), ..incident("4") },
    ];
    let mut report = Report::default();
    let dims = Dimensions::build(&records, &mut report);

    let rows = dims.jurisdiction.rows();
    assert_eq!(
      rows,
      &[
        JurisdictionRow { code: 0, label: "Patrol" },
        JurisdictionRow { code: 2, label: "Housing" },
      ]
    );
    assert!(!dims.jurisdiction.contains(9));
    assert_eq!(report.issue_count(Table::Jurisdiction, IssueKind::OutOfDomain), 1);
  }

  #[test]
  fn missing_and_garbled_jurisdictions_are_reported() {
    let records = vec![
      IncidentRecord { jurisdiction_code: None, ..incident("1") },
      IncidentRecord { jurisdiction_code: label("patrol"), ..incident("2") },
    ];
    let mut report = Report::default();
    let dims = Dimensions::build(&records, &mut report);
    assert!(dims.jurisdiction.is_empty());
    assert_eq!(report.issue_count(Table::Jurisdiction, IssueKind::MissingField), 1);
    assert_eq!(report.issue_count(Table::Jurisdiction, IssueKind::UnparseableField), 1);
    assert_eq!(report.dropped(Table::Jurisdiction), 2);
  }

  #[test]
  fn murder_flag_spellings_share_a_key() {
    let records = vec![
      IncidentRecord { statistical_murder_flag: label("true"), ..incident("1") },
      IncidentRecord { statistical_murder_flag: label("False"), ..incident("2") },
      IncidentRecord { statistical_murder_flag: label("TRUE"), ..incident("3") },
    ];
    let dims = Dimensions::build(&records, &mut Report::default());
    assert_eq!(dims.murder_flag.len(), 2);
    assert_eq!(dims.murder_flag.lookup(&true), Some(SurrogateKey::new(0)));
    assert_eq!(dims.murder_flag.lookup(&false), Some(SurrogateKey::new(1)));
  }

  #[test]
  fn coordinate_is_keyed_on_all_four_fields() {
    let records = vec![
      incident("1"),
      IncidentRecord { latitude: label("40.0"), ..incident("2") },
      incident("3"),
    ];
    let dims = Dimensions::build(&records, &mut Report::default());
    assert_eq!(dims.coordinate.len(), 2);
    assert_eq!(
      dims.coordinate.lookup(&records[2].coordinate()),
      dims.coordinate.lookup(&records[0].coordinate()),
    );
  }

  #[test]
  fn jurisdiction_labels() {
    assert_eq!(jurisdiction_label(0), Some("Patrol"));
    assert_eq!(jurisdiction_label(1), Some("Transit"));
    assert_eq!(jurisdiction_label(2), Some("Housing"));
    assert_eq!(jurisdiction_label(3), None);
  }
}
