//! Record builders shared by the unit tests.

use crate::record::{IncidentRecord, Label, PrecinctRecord};

pub(crate) fn label(s: &str) -> Label {
  if s.is_empty() { None } else { Some(s.to_owned()) }
}

/// A fully populated incident: a Brooklyn patrol-jurisdiction murder with a
/// M/WHITE/25-44 perpetrator and a F/BLACK/18-24 victim.
pub(crate) fn incident(key: &str) -> IncidentRecord {
  IncidentRecord {
    incident_key:            label(key),
    precinct:                label("75"),
    boro:                    label("BROOKLYN"),
    jurisdiction_code:       label("0"),
    statistical_murder_flag: label("true"),
    x_coord_cd:              label("1020000"),
    y_coord_cd:              label("184000"),
    latitude:                label("40.6782"),
    longitude:               label("-73.8813"),
    location_desc:           label("MULTI DWELL - PUBLIC HOUS"),
    occur_date:              label("08/27/2006"),
    occur_time:              label("05:35:00"),
    perp_sex:                label("M"),
    perp_race:               label("WHITE"),
    perp_age_group:          label("25-44"),
    vic_sex:                 label("F"),
    vic_race:                label("BLACK"),
    vic_age_group:           label("18-24"),
  }
}

pub(crate) fn precinct(name: &str, borough: &str) -> PrecinctRecord {
  PrecinctRecord {
    precinct: label(name),
    borough:  label(borough),
    phone:    label("718-555-0100"),
    address:  label("1 Police Plaza"),
  }
}
