//! Raw input rows, exactly as they arrive from the two source files.
//!
//! Every field is optional text; an empty source field is `None`. Typed
//! interpretation (codes, flags, dates) happens in the builders, where a
//! failure becomes a diagnostic instead of aborting the read.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A categorical label; `None` when the source field is empty.
pub type Label = Option<String>;

/// Columns the incident file must provide (after lower-casing its header).
pub const INCIDENT_COLUMNS: &[&str] = &[
  "incident_key",
  "precinct",
  "boro",
  "jurisdiction_code",
  "statistical_murder_flag",
  "x_coord_cd",
  "y_coord_cd",
  "latitude",
  "longitude",
  "location_desc",
  "occur_date",
  "occur_time",
  "perp_sex",
  "perp_race",
  "perp_age_group",
  "vic_sex",
  "vic_race",
  "vic_age_group",
];

/// Columns the precinct file must provide (after lower-casing its header).
pub const PRECINCT_COLUMNS: &[&str] = &["precinct", "borough", "phone", "address"];

// ─── Incident file ───────────────────────────────────────────────────────────

/// One flat row of the incident file. Unused source columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct IncidentRecord {
  pub incident_key:            Label,
  pub precinct:                Label,
  pub boro:                    Label,
  pub jurisdiction_code:       Label,
  pub statistical_murder_flag: Label,
  pub x_coord_cd:              Label,
  pub y_coord_cd:              Label,
  pub latitude:                Label,
  pub longitude:               Label,
  pub location_desc:           Label,
  pub occur_date:              Label,
  pub occur_time:              Label,
  pub perp_sex:                Label,
  pub perp_race:               Label,
  pub perp_age_group:          Label,
  pub vic_sex:                 Label,
  pub vic_race:                Label,
  pub vic_age_group:           Label,
}

impl IncidentRecord {
  pub fn coordinate(&self) -> Coordinate {
    Coordinate {
      x_coord_cd: self.x_coord_cd.clone(),
      y_coord_cd: self.y_coord_cd.clone(),
      longitude:  self.longitude.clone(),
      latitude:   self.latitude.clone(),
    }
  }
}

/// A map position; deduplicated on all four fields jointly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
  pub x_coord_cd: Label,
  pub y_coord_cd: Label,
  pub longitude:  Label,
  pub latitude:   Label,
}

// ─── Parties ─────────────────────────────────────────────────────────────────

/// Which side of an incident a set of attribute columns describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
  Perpetrator,
  Victim,
}

/// The raw (sex, race, age group) labels describing one party.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartyLabels<'a> {
  pub sex:       &'a Label,
  pub race:      &'a Label,
  pub age_group: &'a Label,
}

/// Source column names for one party, in (sex, race, age group) order.
#[derive(Debug, Clone, Copy)]
pub struct PartyColumns {
  pub sex:       &'static str,
  pub race:      &'static str,
  pub age_group: &'static str,
}

impl Party {
  pub fn labels(self, record: &IncidentRecord) -> PartyLabels<'_> {
    match self {
      Self::Perpetrator => PartyLabels {
        sex:       &record.perp_sex,
        race:      &record.perp_race,
        age_group: &record.perp_age_group,
      },
      Self::Victim => PartyLabels {
        sex:       &record.vic_sex,
        race:      &record.vic_race,
        age_group: &record.vic_age_group,
      },
    }
  }

  /// The entity table holding this party's distinct attribute combinations.
  pub fn entity_table(self) -> Table {
    match self {
      Self::Perpetrator => Table::Perpetrator,
      Self::Victim => Table::Victim,
    }
  }

  /// The bridge table linking incidents to this party's entities.
  pub fn bridge_table(self) -> Table {
    match self {
      Self::Perpetrator => Table::IncidentPerp,
      Self::Victim => Table::IncidentVic,
    }
  }

  pub fn columns(self) -> PartyColumns {
    match self {
      Self::Perpetrator => PartyColumns {
        sex:       "perp_sex",
        race:      "perp_race",
        age_group: "perp_age_group",
      },
      Self::Victim => PartyColumns {
        sex:       "vic_sex",
        race:      "vic_race",
        age_group: "vic_age_group",
      },
    }
  }
}

// ─── Precinct file ───────────────────────────────────────────────────────────

/// One row of the precinct reference file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct PrecinctRecord {
  /// Free text containing the precinct number, e.g. "1st Precinct".
  pub precinct: Label,
  pub borough:  Label,
  pub phone:    Label,
  pub address:  Label,
}
