//! The fixed set of target tables and their foreign-key dependencies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

/// A table of the normalized model.
///
/// Variants are declared in load order: every table comes after each table it
/// references, so iterating [`Table::load_order`] never writes a row before
/// the rows it points at.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
  // ── Dimensions ──────────────────────────────────────────────────────────
  Sex,
  StatisticalMurderFlag,
  AgeGroup,
  Race,
  Jurisdiction,
  Borough,
  Location,
  Coordinate,

  // ── Entities ────────────────────────────────────────────────────────────
  Perpetrator,
  Victim,
  Precinct,

  // ── Facts and bridges ───────────────────────────────────────────────────
  Incident,
  IncidentPerp,
  IncidentVic,
  IncidentTime,
}

impl Table {
  /// The relation name in the store.
  pub fn name(self) -> &'static str { self.into() }

  /// Tables this one references through a declared foreign key.
  pub fn references(self) -> &'static [Table] {
    match self {
      Self::Sex
      | Self::StatisticalMurderFlag
      | Self::AgeGroup
      | Self::Race
      | Self::Jurisdiction
      | Self::Borough
      | Self::Location
      | Self::Coordinate => &[],
      Self::Perpetrator | Self::Victim => &[Self::Sex, Self::Race, Self::AgeGroup],
      Self::Precinct => &[Self::Borough],
      Self::Incident => &[
        Self::Borough,
        Self::Jurisdiction,
        Self::StatisticalMurderFlag,
        Self::Coordinate,
        Self::Location,
      ],
      Self::IncidentPerp => &[Self::Perpetrator],
      Self::IncidentVic => &[Self::Victim],
      // Keyed by incident only by convention; no declared constraint.
      Self::IncidentTime => &[],
    }
  }

  pub fn load_order() -> impl Iterator<Item = Table> { Self::iter() }
}
