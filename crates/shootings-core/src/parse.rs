//! Typed interpretation of raw text fields.

use chrono::{NaiveDate, NaiveTime};

use crate::{Error, Result, record::Label};

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Upper-cased, trimmed label; blank reads as missing. The precinct file
/// spells boroughs in title case while the incident file uses capitals.
pub fn upper_label(raw: &Label) -> Label {
  let trimmed = raw.as_deref()?.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_uppercase())
  }
}

/// Parse a jurisdiction code. Integral floats ("1.0") are accepted because
/// spreadsheet exports write them that way.
pub fn jurisdiction_code(raw: &str) -> Result<i64> {
  let trimmed = raw.trim();
  if let Ok(code) = trimmed.parse::<i64>() {
    return Ok(code);
  }
  match trimmed.parse::<f64>() {
    Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
    _ => Err(Error::InvalidJurisdictionCode(raw.to_owned())),
  }
}

pub fn murder_flag(raw: &str) -> Result<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "t" | "y" | "yes" | "1" => Ok(true),
    "false" | "f" | "n" | "no" | "0" => Ok(false),
    _ => Err(Error::InvalidMurderFlag(raw.to_owned())),
  }
}

pub fn occur_date(raw: &str) -> Result<NaiveDate> {
  let trimmed = raw.trim();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    .ok_or_else(|| Error::InvalidDate(raw.to_owned()))
}

pub fn occur_time(raw: &str) -> Result<NaiveTime> {
  let trimmed = raw.trim();
  TIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
    .ok_or_else(|| Error::InvalidTime(raw.to_owned()))
}

/// Extract the first run of ASCII digits, e.g. `"14th Precinct"` → 14.
pub fn precinct_number(raw: &str) -> Result<u32> {
  let digits: String = raw
    .chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(char::is_ascii_digit)
    .collect();
  digits
    .parse()
    .map_err(|_| Error::MissingPrecinctNumber(raw.to_owned()))
}
