//! Encoding between model rows and the SQL values stored in each column.
//!
//! Surrogate keys and jurisdiction codes are stored as text, dates as
//! `YYYY-MM-DD`, times as `HH:MM:SS`, and the murder flag as 0/1.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::{Value, ValueRef};
use shootings_core::{
  NormalizedModel, SurrogateKey, Table,
  dimension::Dimension,
  model::{BridgeRow, EntityRow},
  record::Label,
};

pub type Row = Vec<Value>;

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_key(key: SurrogateKey) -> Value { Value::Text(key.to_string()) }

pub fn encode_opt_key(key: Option<SurrogateKey>) -> Value {
  key.map(encode_key).unwrap_or(Value::Null)
}

pub fn encode_label(label: &Label) -> Value {
  label.clone().map(Value::Text).unwrap_or(Value::Null)
}

pub fn encode_code(code: i64) -> Value { Value::Text(code.to_string()) }

pub fn encode_flag(flag: bool) -> Value { Value::Integer(i64::from(flag)) }

pub fn encode_date(date: NaiveDate) -> Value {
  Value::Text(date.format("%Y-%m-%d").to_string())
}

pub fn encode_time(time: NaiveTime) -> Value {
  Value::Text(time.format("%H:%M:%S").to_string())
}

/// Render any stored value as text; `None` for SQL NULL.
pub fn decode_text(value: ValueRef<'_>) -> Option<String> {
  match value {
    ValueRef::Null => None,
    ValueRef::Integer(i) => Some(i.to_string()),
    ValueRef::Real(f) => Some(f.to_string()),
    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
      Some(String::from_utf8_lossy(bytes).into_owned())
    }
  }
}

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The rows of one table, ready for insertion.
pub struct Batch {
  pub table: Table,
  pub rows:  Vec<Row>,
}

/// Encode every table of `model`, in load order.
pub fn batches(model: &NormalizedModel) -> Vec<Batch> {
  Table::load_order()
    .map(|table| Batch { table, rows: rows(model, table) })
    .collect()
}

fn label_rows(dim: &Dimension<Label>) -> Vec<Row> {
  dim
    .rows()
    .map(|(key, label)| vec![encode_key(key), encode_label(label)])
    .collect()
}

fn entity_row(row: EntityRow) -> Row {
  vec![
    encode_key(row.id),
    encode_opt_key(row.sex_id),
    encode_opt_key(row.race_id),
    encode_opt_key(row.age_id),
  ]
}

fn bridge_row(row: &BridgeRow) -> Row {
  vec![Value::Text(row.incident_key.clone()), encode_key(row.entity_id)]
}

fn rows(model: &NormalizedModel, table: Table) -> Vec<Row> {
  let dims = &model.dimensions;
  match table {
    Table::Sex => label_rows(&dims.sex),
    Table::AgeGroup => label_rows(&dims.age_group),
    Table::Race => label_rows(&dims.race),
    Table::Borough => label_rows(&dims.borough),
    Table::Location => label_rows(&dims.location),
    Table::StatisticalMurderFlag => dims
      .murder_flag
      .rows()
      .map(|(key, flag)| vec![encode_key(key), encode_flag(*flag)])
      .collect(),
    Table::Jurisdiction => dims
      .jurisdiction
      .rows()
      .iter()
      .map(|row| vec![encode_code(row.code), Value::Text(row.label.to_owned())])
      .collect(),
    Table::Coordinate => dims
      .coordinate
      .rows()
      .map(|(key, c)| {
        vec![
          encode_key(key),
          encode_label(&c.x_coord_cd),
          encode_label(&c.y_coord_cd),
          encode_label(&c.longitude),
          encode_label(&c.latitude),
        ]
      })
      .collect(),
    Table::Perpetrator => model.perpetrator.rows().map(entity_row).collect(),
    Table::Victim => model.victim.rows().map(entity_row).collect(),
    Table::Precinct => model
      .precinct
      .iter()
      .map(|row| {
        vec![
          Value::Text(row.precinct.to_string()),
          encode_label(&row.phone),
          encode_label(&row.address),
          encode_opt_key(row.borough_id),
        ]
      })
      .collect(),
    Table::Incident => model
      .incident
      .iter()
      .map(|row| {
        vec![
          Value::Text(row.incident_key.clone()),
          Value::Text(row.precinct.clone()),
          encode_key(row.borough_id),
          encode_code(row.jurisdiction_code),
          encode_key(row.murder_flag_id),
          encode_key(row.coordinate_id),
          encode_key(row.location_id),
        ]
      })
      .collect(),
    Table::IncidentPerp => model.incident_perp.iter().map(bridge_row).collect(),
    Table::IncidentVic => model.incident_vic.iter().map(bridge_row).collect(),
    Table::IncidentTime => model
      .incident_time
      .iter()
      .map(|row| {
        vec![
          Value::Text(row.incident_key.clone()),
          encode_date(row.date),
          encode_time(row.time),
        ]
      })
      .collect(),
  }
}
