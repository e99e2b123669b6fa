//! The full normalization pass: raw rows in, model and report out.

use std::collections::HashSet;

use crate::{
  assemble::{assemble_bridge, assemble_incidents, assemble_times},
  diagnostics::{Issue, IssueKind, Report},
  dimension::Dimensions,
  entity::{EntityTable, build_precincts},
  model::NormalizedModel,
  record::{IncidentRecord, Party, PrecinctRecord},
  table::Table,
};

/// The outcome of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
  pub model:  NormalizedModel,
  pub report: Report,
}

/// Build every table of the model from the two raw inputs.
///
/// Data flows one way: dimensions, then entities, then facts and bridges.
/// Nothing here fails; rows that cannot be resolved are dropped and show up
/// in the returned [`Report`].
pub fn normalize(
  incidents: &[IncidentRecord],
  precincts: &[PrecinctRecord],
) -> Normalized {
  let mut report = Report::default();

  let dimensions = Dimensions::build(incidents, &mut report);
  let perpetrator =
    EntityTable::build(Party::Perpetrator, incidents, &dimensions, &mut report);
  let victim = EntityTable::build(Party::Victim, incidents, &dimensions, &mut report);
  let precinct = build_precincts(precincts, &dimensions.borough, &mut report);

  let incident = assemble_incidents(incidents, &dimensions, &mut report);
  let incident_perp =
    assemble_bridge(&perpetrator, incidents, &dimensions, &mut report);
  let incident_vic = assemble_bridge(&victim, incidents, &dimensions, &mut report);
  let incident_time = assemble_times(incidents, &mut report);

  let known: HashSet<&str> =
    incident.iter().map(|r| r.incident_key.as_str()).collect();
  flag_orphans(
    &known,
    Table::IncidentPerp,
    incident_perp.iter().map(|r| r.incident_key.as_str()),
    &mut report,
  );
  flag_orphans(
    &known,
    Table::IncidentVic,
    incident_vic.iter().map(|r| r.incident_key.as_str()),
    &mut report,
  );
  flag_orphans(
    &known,
    Table::IncidentTime,
    incident_time.iter().map(|r| r.incident_key.as_str()),
    &mut report,
  );

  report.stages.sort_by_key(|s| s.table);

  Normalized {
    model: NormalizedModel {
      dimensions,
      perpetrator,
      victim,
      precinct,
      incident,
      incident_perp,
      incident_vic,
      incident_time,
    },
    report,
  }
}

/// Bridge and time rows are keyed by incident only by convention, so a row
/// whose incident was dropped still loads; it is flagged here.
fn flag_orphans<'a>(
  known: &HashSet<&str>,
  table: Table,
  keys: impl Iterator<Item = &'a str>,
  report: &mut Report,
) {
  for key in keys.filter(|k| !known.contains(k)) {
    report.record(Issue::new(
      table,
      "incident_key",
      IssueKind::OrphanedReference,
      key,
    ));
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::{
    key::SurrogateKey,
    testing::{incident, label, precinct},
  };

  #[test]
  fn single_incident_end_to_end() {
    let records = vec![incident("1")];
    let out = normalize(&records, &[precinct("75th Precinct", "Brooklyn")]);
    let model = &out.model;

    assert_eq!(model.incident.len(), 1);
    assert_eq!(model.incident_perp.len(), 1);
    assert_eq!(model.incident_vic.len(), 1);
    assert_eq!(model.incident_time.len(), 1);
    assert_eq!(model.precinct.len(), 1);

    let jurisdictions = model.dimensions.jurisdiction.rows();
    assert_eq!(jurisdictions.len(), 1);
    assert_eq!(jurisdictions[0].code, 0);
    assert_eq!(jurisdictions[0].label, "Patrol");

    assert_eq!(model.row_count(Table::Sex), 2);
    assert_eq!(model.row_count(Table::Race), 2);
    assert_eq!(model.row_count(Table::AgeGroup), 2);
    assert!(out.report.is_clean(), "{:?}", out.report.issues);
  }

  #[test]
  fn union_completeness() {
    let records = vec![
      IncidentRecord { perp_sex: label("M"), vic_sex: label("M"), ..incident("1") },
      IncidentRecord { perp_sex: label("F"), vic_sex: label("F"), ..incident("2") },
      IncidentRecord { perp_sex: label("U"), vic_sex: label("M"), ..incident("3") },
    ];
    let out = normalize(&records, &[]);
    assert_eq!(out.model.dimensions.sex.len(), 3);
  }

  #[test]
  fn jurisdiction_nine_never_appears() {
    let records = vec![
      incident("1"),
      IncidentRecord { jurisdiction_code: label("9"), ..incident("2") },
    ];
    let out = normalize(&records, &[]);
    let model = &out.model;

    assert!(!model.dimensions.jurisdiction.contains(9));
    assert!(model.incident.iter().all(|r| r.jurisdiction_code != 9));
    assert_eq!(model.incident.len(), 1);
    assert_eq!(out.report.dropped(Table::Incident), 1);

    // Its bridge rows survive and are flagged.
    assert_eq!(model.incident_perp.len(), 2);
    assert_eq!(
      out.report.issue_count(Table::IncidentPerp, IssueKind::OrphanedReference),
      1
    );
  }

  #[test]
  fn entity_collapse_needs_identical_labels() {
    let records = vec![
      incident("1"),
      incident("2"),
      IncidentRecord { perp_race: label("white"), ..incident("3") },
    ];
    let out = normalize(&records, &[]);
    let model = &out.model;

    assert_eq!(model.dimensions.race.len(), 3);
    assert_eq!(model.perpetrator.len(), 2);
    let ids: HashSet<SurrogateKey> =
      model.incident_perp.iter().map(|r| r.entity_id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(model.incident_perp[0].entity_id, model.incident_perp[1].entity_id);
  }

  #[test]
  fn keys_are_unique_per_table() {
    let records = vec![
      incident("1"),
      IncidentRecord { perp_age_group: label("<18"), vic_race: label("WHITE"), ..incident("2") },
      IncidentRecord { perp_sex: label("F"), boro: label("QUEENS"), ..incident("3") },
    ];
    let model = normalize(&records, &[]).model;

    let perp_ids: HashSet<_> = model.perpetrator.rows().map(|r| r.id).collect();
    let perp_triples: HashSet<_> = model
      .perpetrator
      .rows()
      .map(|r| (r.sex_id, r.race_id, r.age_id))
      .collect();
    assert_eq!(perp_ids.len(), model.perpetrator.len());
    assert_eq!(perp_triples.len(), model.perpetrator.len());

    let race_ids: HashSet<_> = model.dimensions.race.rows().map(|(k, _)| k).collect();
    let race_values: HashSet<_> = model.dimensions.race.rows().map(|(_, v)| v).collect();
    assert_eq!(race_ids.len(), model.dimensions.race.len());
    assert_eq!(race_values.len(), model.dimensions.race.len());
  }

  #[test]
  fn every_reference_resolves_inside_the_model() {
    let records = vec![
      incident("1"),
      IncidentRecord { location_desc: None, vic_sex: label("U"), ..incident("2") },
      IncidentRecord { boro: label("BRONX"), statistical_murder_flag: label("false"), ..incident("3") },
    ];
    let model = normalize(&records, &[precinct("40th Precinct", "bronx")]).model;
    let dims = &model.dimensions;

    for row in &model.incident {
      assert!(dims.borough.rows().any(|(k, _)| k == row.borough_id));
      assert!(dims.murder_flag.rows().any(|(k, _)| k == row.murder_flag_id));
      assert!(dims.coordinate.rows().any(|(k, _)| k == row.coordinate_id));
      assert!(dims.location.rows().any(|(k, _)| k == row.location_id));
      assert!(dims.jurisdiction.contains(row.jurisdiction_code));
    }
    for row in &model.incident_perp {
      assert!(model.perpetrator.rows().any(|e| e.id == row.entity_id));
    }
    for row in &model.incident_vic {
      assert!(model.victim.rows().any(|e| e.id == row.entity_id));
    }
    for row in &model.precinct {
      let id = row.borough_id.unwrap();
      assert!(dims.borough.rows().any(|(k, _)| k == id));
    }
  }

  #[test]
  fn normalization_is_deterministic() {
    let records = vec![
      incident("1"),
      IncidentRecord { perp_race: label("BLACK HISPANIC"), ..incident("2") },
      IncidentRecord { vic_age_group: label("65+"), ..incident("3") },
    ];
    let a = normalize(&records, &[]).model;
    let b = normalize(&records, &[]).model;

    assert_eq!(a.incident, b.incident);
    assert_eq!(a.incident_perp, b.incident_perp);
    assert_eq!(a.incident_vic, b.incident_vic);
    assert_eq!(
      a.perpetrator.rows().collect::<Vec<_>>(),
      b.perpetrator.rows().collect::<Vec<_>>()
    );
    assert_eq!(
      a.dimensions.age_group.rows().collect::<Vec<_>>(),
      b.dimensions.age_group.rows().collect::<Vec<_>>()
    );
  }

  #[test]
  fn stages_are_reported_in_load_order() {
    let out = normalize(&[incident("1")], &[]);
    let tables: Vec<Table> = out.report.stages.iter().map(|s| s.table).collect();
    let expected: Vec<Table> = Table::load_order().collect();
    assert_eq!(tables, expected);
  }
}
