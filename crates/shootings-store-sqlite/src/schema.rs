//! SQL schema for the normalized shootings store.
//!
//! Executed once at connection startup. The schema is fixed: tables are
//! created if missing and never altered.

use shootings_core::Table;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Surrogate keys are opaque integers stored as text.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Dimensions ──────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS sex (
    sex_id  TEXT NOT NULL PRIMARY KEY,
    sex     TEXT
);

CREATE TABLE IF NOT EXISTS statistical_murder_flag (
    murder_flag_id  TEXT NOT NULL PRIMARY KEY,
    murder_flag     BOOLEAN
);

CREATE TABLE IF NOT EXISTS age_group (
    age_id     TEXT NOT NULL PRIMARY KEY,
    age_range  TEXT
);

CREATE TABLE IF NOT EXISTS race (
    race_id  TEXT NOT NULL PRIMARY KEY,
    race     TEXT
);

-- Keyed by the source code itself: '0' | '1' | '2'.
CREATE TABLE IF NOT EXISTS jurisdiction (
    jurisdiction_code  TEXT NOT NULL PRIMARY KEY,
    jurisdiction       TEXT
);

CREATE TABLE IF NOT EXISTS borough (
    borough_id  TEXT NOT NULL PRIMARY KEY,
    borough     TEXT
);

CREATE TABLE IF NOT EXISTS location (
    location_id    TEXT NOT NULL PRIMARY KEY,
    location_desc  TEXT
);

CREATE TABLE IF NOT EXISTS coordinate (
    coordinate_id  TEXT NOT NULL PRIMARY KEY,
    x_coord_cd     TEXT,
    y_coord_cd     TEXT,
    longitude      TEXT,
    latitude       TEXT
);

-- ── Entities ────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS perpetrator (
    perp_id  TEXT NOT NULL PRIMARY KEY,
    sex_id   TEXT REFERENCES sex(sex_id),
    race_id  TEXT REFERENCES race(race_id),
    age_id   TEXT REFERENCES age_group(age_id)
);

CREATE TABLE IF NOT EXISTS victim (
    vic_id   TEXT NOT NULL PRIMARY KEY,
    sex_id   TEXT REFERENCES sex(sex_id),
    race_id  TEXT REFERENCES race(race_id),
    age_id   TEXT REFERENCES age_group(age_id)
);

CREATE TABLE IF NOT EXISTS precinct (
    precinct    TEXT NOT NULL PRIMARY KEY,
    phone       TEXT,
    address     TEXT,
    borough_id  TEXT REFERENCES borough(borough_id)
);

-- ── Facts and bridges ───────────────────────────────────────────────────────

-- An incident_key may repeat when its other attributes differ.
CREATE TABLE IF NOT EXISTS incident (
    incident_key       TEXT NOT NULL,
    precinct           TEXT NOT NULL,
    borough_id         TEXT NOT NULL REFERENCES borough(borough_id),
    jurisdiction_code  TEXT NOT NULL REFERENCES jurisdiction(jurisdiction_code),
    murder_flag_id     TEXT NOT NULL REFERENCES statistical_murder_flag(murder_flag_id),
    coordinate_id      TEXT NOT NULL REFERENCES coordinate(coordinate_id),
    location_id        TEXT NOT NULL REFERENCES location(location_id),
    PRIMARY KEY (incident_key, precinct, borough_id, jurisdiction_code,
                 murder_flag_id, coordinate_id, location_id)
);

CREATE TABLE IF NOT EXISTS incident_perp (
    incident_key  TEXT NOT NULL,
    perp_id       TEXT NOT NULL REFERENCES perpetrator(perp_id),
    PRIMARY KEY (incident_key, perp_id)
);

CREATE TABLE IF NOT EXISTS incident_vic (
    incident_key  TEXT NOT NULL,
    vic_id        TEXT NOT NULL REFERENCES victim(vic_id),
    PRIMARY KEY (incident_key, vic_id)
);

CREATE TABLE IF NOT EXISTS incident_time (
    incident_key   TEXT NOT NULL,
    incident_date  DATE NOT NULL,   -- YYYY-MM-DD
    incident_time  TIME NOT NULL,   -- HH:MM:SS
    PRIMARY KEY (incident_key, incident_date, incident_time)
);

CREATE INDEX IF NOT EXISTS incident_key_idx      ON incident(incident_key);
CREATE INDEX IF NOT EXISTS incident_time_key_idx ON incident_time(incident_key);

PRAGMA user_version = 1;
";

/// Column names of `table`, in the order [`crate::encode`] produces values.
pub fn columns(table: Table) -> &'static [&'static str] {
  match table {
    Table::Sex => &["sex_id", "sex"],
    Table::StatisticalMurderFlag => &["murder_flag_id", "murder_flag"],
    Table::AgeGroup => &["age_id", "age_range"],
    Table::Race => &["race_id", "race"],
    Table::Jurisdiction => &["jurisdiction_code", "jurisdiction"],
    Table::Borough => &["borough_id", "borough"],
    Table::Location => &["location_id", "location_desc"],
    Table::Coordinate => &[
      "coordinate_id",
      "x_coord_cd",
      "y_coord_cd",
      "longitude",
      "latitude",
    ],
    Table::Perpetrator => &["perp_id", "sex_id", "race_id", "age_id"],
    Table::Victim => &["vic_id", "sex_id", "race_id", "age_id"],
    Table::Precinct => &["precinct", "phone", "address", "borough_id"],
    Table::Incident => &[
      "incident_key",
      "precinct",
      "borough_id",
      "jurisdiction_code",
      "murder_flag_id",
      "coordinate_id",
      "location_id",
    ],
    Table::IncidentPerp => &["incident_key", "perp_id"],
    Table::IncidentVic => &["incident_key", "vic_id"],
    Table::IncidentTime => &["incident_key", "incident_date", "incident_time"],
  }
}

/// `INSERT INTO <table> (<columns>) VALUES (?1, …, ?n)`.
pub fn insert_sql(table: Table) -> String {
  let cols = columns(table);
  let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    table.name(),
    cols.join(", "),
    placeholders.join(", ")
  )
}

/// `SELECT <columns> FROM <table> ORDER BY rowid`.
pub fn select_sql(table: Table) -> String {
  format!(
    "SELECT {} FROM {} ORDER BY rowid",
    columns(table).join(", "),
    table.name()
  )
}
