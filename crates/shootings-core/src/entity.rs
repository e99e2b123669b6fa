//! Composite entities: perpetrators and victims keyed on their resolved
//! attribute ids, and the precinct reference table.

use std::collections::HashSet;

use crate::{
  diagnostics::{Issue, IssueKind, Report, describe},
  dimension::{Dimension, Dimensions},
  key::{KeyAssigner, SurrogateKey, distinct},
  model::{EntityRow, PrecinctRow},
  parse::{self, upper_label},
  record::{IncidentRecord, Label, Party, PartyLabels, PrecinctRecord},
  table::Table,
};

// ─── Attribute ids ───────────────────────────────────────────────────────────

/// The (sex, race, age group) dimension keys of one party. A `None` marks a
/// label with no row in its dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeIds {
  pub sex_id:  Option<SurrogateKey>,
  pub race_id: Option<SurrogateKey>,
  pub age_id:  Option<SurrogateKey>,
}

impl AttributeIds {
  /// Left-join each label to its dimension.
  pub fn resolve(dims: &Dimensions, labels: &PartyLabels<'_>) -> Self {
    Self {
      sex_id:  dims.sex.resolve(labels.sex),
      race_id: dims.race.resolve(labels.race),
      age_id:  dims.age_group.resolve(labels.age_group),
    }
  }

  pub fn is_complete(&self) -> bool {
    self.sex_id.is_some() && self.race_id.is_some() && self.age_id.is_some()
  }
}

/// Describe the first attribute of `labels` that did not resolve.
pub(crate) fn unresolved_attribute(
  table: Table,
  party: Party,
  labels: &PartyLabels<'_>,
  ids: &AttributeIds,
) -> Option<Issue> {
  let columns = party.columns();
  let (column, label) = if ids.sex_id.is_none() {
    (columns.sex, labels.sex)
  } else if ids.race_id.is_none() {
    (columns.race, labels.race)
  } else if ids.age_id.is_none() {
    (columns.age_group, labels.age_group)
  } else {
    return None;
  };
  Some(Issue::new(
    table,
    column,
    IssueKind::UnresolvedReference,
    describe(label),
  ))
}

// ─── Entity table ────────────────────────────────────────────────────────────

/// Perpetrators or victims: one row per distinct resolved attribute triple.
///
/// The key is derived from the ids, not the raw labels, so two spellings that
/// resolve to the same ids are one entity.
#[derive(Debug, Clone)]
pub struct EntityTable {
  party: Party,
  keys:  KeyAssigner<AttributeIds>,
}

impl EntityTable {
  pub fn build(
    party: Party,
    records: &[IncidentRecord],
    dims: &Dimensions,
    report: &mut Report,
  ) -> Self {
    let table = party.entity_table();
    let combinations = distinct(records.iter().map(|r| party.labels(r)));

    let mut keys = KeyAssigner::new();
    for labels in &combinations {
      let ids = AttributeIds::resolve(dims, labels);
      if let Some(issue) = unresolved_attribute(table, party, labels, &ids) {
        report.record(issue);
      }
      keys.assign(ids);
    }

    report.stage(table, combinations.len(), 0, keys.len());
    Self { party, keys }
  }

  pub fn party(&self) -> Party { self.party }

  pub fn table(&self) -> Table { self.party.entity_table() }

  pub fn lookup(&self, ids: &AttributeIds) -> Option<SurrogateKey> {
    self.keys.get(ids)
  }

  pub fn rows(&self) -> impl Iterator<Item = EntityRow> + '_ {
    self.keys.iter().map(|(id, ids)| EntityRow {
      id,
      sex_id: ids.sex_id,
      race_id: ids.race_id,
      age_id: ids.age_id,
    })
  }

  pub fn len(&self) -> usize { self.keys.len() }

  pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}

// ─── Precinct ────────────────────────────────────────────────────────────────

/// Clean the precinct reference rows and attach their borough key.
///
/// Rows without a precinct number are dropped, as is any later row claiming
/// an already-used number. A borough that does not resolve leaves
/// `borough_id` empty; the row is kept.
pub fn build_precincts(
  records: &[PrecinctRecord],
  borough: &Dimension<Label>,
  report: &mut Report,
) -> Vec<PrecinctRow> {
  let candidates = distinct(records.iter());
  let mut seen = HashSet::new();
  let mut rows = Vec::with_capacity(candidates.len());

  for record in &candidates {
    let Some(raw) = record.precinct.as_deref() else {
      report.record(Issue::new(
        Table::Precinct,
        "precinct",
        IssueKind::MissingField,
        describe(&record.precinct),
      ));
      continue;
    };
    let Ok(precinct) = parse::precinct_number(raw) else {
      report.record(Issue::new(
        Table::Precinct,
        "precinct",
        IssueKind::UnparseableField,
        raw,
      ));
      continue;
    };
    if !seen.insert(precinct) {
      report.record(Issue::new(
        Table::Precinct,
        "precinct",
        IssueKind::DuplicateKey,
        raw,
      ));
      continue;
    }

    let borough_id = match upper_label(&record.borough) {
      None => {
        report.record(Issue::new(
          Table::Precinct,
          "borough",
          IssueKind::MissingField,
          describe(&record.borough),
        ));
        None
      }
      label @ Some(_) => {
        let id = borough.lookup(&label);
        if id.is_none() {
          report.record(Issue::new(
            Table::Precinct,
            "borough",
            IssueKind::UnresolvedReference,
            describe(&label),
          ));
        }
        id
      }
    };

    rows.push(PrecinctRow {
      precinct,
      phone: record.phone.clone(),
      address: record.address.clone(),
      borough_id,
    });
  }

  let dropped = candidates.len() - rows.len();
  report.stage(Table::Precinct, candidates.len(), dropped, rows.len());
  rows
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{incident, label, precinct};

  fn build(records: &[IncidentRecord]) -> (Dimensions, EntityTable, Report) {
    let mut report = Report::default();
    let dims = Dimensions::build(records, &mut report);
    let perps = EntityTable::build(Party::Perpetrator, records, &dims, &mut report);
    (dims, perps, report)
  }

  #[test]
  fn one_entity_per_observed_combination() {
    let records = vec![
      incident("1"),
      incident("2"),
      IncidentRecord { perp_age_group: label("18-24"), ..incident("3") },
    ];
    let (_, perps, _) = build(&records);
    assert_eq!(perps.len(), 2);
    let ids: Vec<usize> = perps.rows().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![0, 1]);
  }

  #[test]
  fn equal_labels_collapse_and_other_spellings_do_not() {
    let records = vec![
      incident("1"),
      incident("2"),
      IncidentRecord { perp_sex: label("m"), ..incident("3") },
    ];
    let (dims, perps, report) = build(&records);
    assert_eq!(perps.len(), 2);
    assert_eq!(report.stage_for(Table::Perpetrator).unwrap().candidates, 2);

    let ids = |i: usize| {
      AttributeIds::resolve(&dims, &Party::Perpetrator.labels(&records[i]))
    };
    assert_eq!(perps.lookup(&ids(0)), perps.lookup(&ids(1)));
    assert_ne!(perps.lookup(&ids(0)), perps.lookup(&ids(2)));
  }

  #[test]
  fn entity_rows_carry_dimension_keys() {
    let records = vec![incident("1")];
    let (dims, _, _) = build(&records);
    let mut report = Report::default();
    let victims = EntityTable::build(Party::Victim, &records, &dims, &mut report);

    let row = victims.rows().next().unwrap();
    assert_eq!(row.sex_id, dims.sex.resolve(&label("F")));
    assert_eq!(row.race_id, dims.race.resolve(&label("BLACK")));
    assert_eq!(row.age_id, dims.age_group.resolve(&label("18-24")));
    assert_eq!(victims.table(), Table::Victim);
  }

  #[test]
  fn unmatched_labels_become_empty_ids() {
    let mut report = Report::default();
    let dims = Dimensions::build(&[incident("1")], &mut report);
    let strangers = vec![IncidentRecord { perp_race: label("MARTIAN"), ..incident("2") }];

    let perps = EntityTable::build(Party::Perpetrator, &strangers, &dims, &mut report);
    let row = perps.rows().next().unwrap();
    assert!(row.sex_id.is_some());
    assert_eq!(row.race_id, None);
    assert_eq!(report.issue_count(Table::Perpetrator, IssueKind::UnresolvedReference), 1);
  }

  #[test]
  fn precinct_numbers_and_boroughs_resolve() {
    let mut report = Report::default();
    let dims = Dimensions::build(&[incident("1")], &mut report);
    let rows = build_precincts(
      &[precinct("75th Precinct", "Brooklyn"), precinct("1st Precinct", "Manhattan")],
      &dims.borough,
      &mut report,
    );

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].precinct, 75);
    assert_eq!(rows[0].borough_id, dims.borough.resolve(&label("BROOKLYN")));
    assert_eq!(rows[1].precinct, 1);
    assert_eq!(rows[1].borough_id, None);
    assert_eq!(report.issue_count(Table::Precinct, IssueKind::UnresolvedReference), 1);
  }

  #[test]
  fn precincts_without_a_number_or_with_a_taken_one_are_dropped() {
    let mut report = Report::default();
    let dims = Dimensions::build(&[incident("1")], &mut report);
    let rows = build_precincts(
      &[
        precinct("75th Precinct", "Brooklyn"),
        precinct("75th Precinct", "Brooklyn"),
        precinct("Central Park", "Manhattan"),
        precinct("Precinct 75", "Brooklyn"),
        precinct("", "Queens"),
      ],
      &dims.borough,
      &mut report,
    );

    assert_eq!(rows.len(), 1);
    // Exact duplicates collapse before numbering.
    assert_eq!(report.stage_for(Table::Precinct).unwrap().candidates, 4);
    assert_eq!(report.issue_count(Table::Precinct, IssueKind::UnparseableField), 1);
    assert_eq!(report.issue_count(Table::Precinct, IssueKind::DuplicateKey), 1);
    assert_eq!(report.issue_count(Table::Precinct, IssueKind::MissingField), 1);
    assert_eq!(report.dropped(Table::Precinct), 3);
    assert_eq!(report.merged(Table::Precinct), 0);
  }

  #[test]
  fn precincts_with_empty_columns_are_kept() {
    let mut report = Report::default();
    let dims = Dimensions::build(&[incident("1")], &mut report);
    let rows = build_precincts(
      &[PrecinctRecord {
        precinct: label("75th Precinct"),
        borough:  None,
        phone:    None,
        address:  None,
      }],
      &dims.borough,
      &mut report,
    );

    assert_eq!(rows, vec![PrecinctRow {
      precinct:   75,
      phone:      None,
      address:    None,
      borough_id: None,
    }]);
    assert_eq!(report.issue_count(Table::Precinct, IssueKind::MissingField), 1);
    assert_eq!(report.dropped(Table::Precinct), 0);
  }
}
