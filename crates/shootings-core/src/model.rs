//! Row types of the normalized model and the model itself.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::{
  dimension::Dimensions,
  entity::EntityTable,
  key::SurrogateKey,
  record::Label,
  table::Table,
};

/// A jurisdiction keyed by its source code rather than a surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JurisdictionRow {
  pub code:  i64,
  pub label: &'static str,
}

/// A perpetrator or victim. Attribute ids are `None` where a label failed to
/// resolve against its dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRow {
  pub id:      SurrogateKey,
  pub sex_id:  Option<SurrogateKey>,
  pub race_id: Option<SurrogateKey>,
  pub age_id:  Option<SurrogateKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PrecinctRow {
  pub precinct:   u32,
  pub phone:      Label,
  pub address:    Label,
  pub borough_id: Option<SurrogateKey>,
}

/// One incident fact; every categorical column replaced by its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IncidentRow {
  pub incident_key:      String,
  pub precinct:          String,
  pub borough_id:        SurrogateKey,
  pub jurisdiction_code: i64,
  pub murder_flag_id:    SurrogateKey,
  pub coordinate_id:     SurrogateKey,
  pub location_id:       SurrogateKey,
}

/// Links an incident to a perpetrator or victim entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BridgeRow {
  pub incident_key: String,
  pub entity_id:    SurrogateKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IncidentTimeRow {
  pub incident_key: String,
  pub date:         NaiveDate,
  pub time:         NaiveTime,
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// Every table of the normalized model, ready to load.
#[derive(Debug, Clone)]
pub struct NormalizedModel {
  pub dimensions:    Dimensions,
  pub perpetrator:   EntityTable,
  pub victim:        EntityTable,
  pub precinct:      Vec<PrecinctRow>,
  pub incident:      Vec<IncidentRow>,
  pub incident_perp: Vec<BridgeRow>,
  pub incident_vic:  Vec<BridgeRow>,
  pub incident_time: Vec<IncidentTimeRow>,
}

impl NormalizedModel {
  pub fn row_count(&self, table: Table) -> usize {
    let dims = &self.dimensions;
    match table {
      Table::Sex => dims.sex.len(),
      Table::StatisticalMurderFlag => dims.murder_flag.len(),
      Table::AgeGroup => dims.age_group.len(),
      Table::Race => dims.race.len(),
      Table::Jurisdiction => dims.jurisdiction.len(),
      Table::Borough => dims.borough.len(),
      Table::Location => dims.location.len(),
      Table::Coordinate => dims.coordinate.len(),
      Table::Perpetrator => self.perpetrator.len(),
      Table::Victim => self.victim.len(),
      Table::Precinct => self.precinct.len(),
      Table::Incident => self.incident.len(),
      Table::IncidentPerp => self.incident_perp.len(),
      Table::IncidentVic => self.incident_vic.len(),
      Table::IncidentTime => self.incident_time.len(),
    }
  }

  pub fn total_rows(&self) -> usize {
    Table::load_order().map(|t| self.row_count(t)).sum()
  }
}
