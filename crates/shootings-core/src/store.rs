//! The `ModelStore` trait and the summaries it returns.
//!
//! The trait is implemented by storage backends (e.g.
//! `shootings-store-sqlite`). The pipeline depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use serde::Serialize;

use crate::{model::NormalizedModel, table::Table};

/// Rows written per table by one [`ModelStore::load`], in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
  pub tables: Vec<(Table, usize)>,
}

impl LoadSummary {
  pub fn inserted(&self, table: Table) -> usize {
    self
      .tables
      .iter()
      .find(|(t, _)| *t == table)
      .map(|(_, n)| *n)
      .unwrap_or(0)
  }

  pub fn total(&self) -> usize { self.tables.iter().map(|(_, n)| n).sum() }
}

/// One row reported by a foreign-key scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyViolation {
  /// The referencing table.
  pub table:  String,
  pub rowid:  Option<i64>,
  /// The referenced table.
  pub parent: String,
}

/// Abstraction over a relational store that receives the normalized model.
///
/// The store is append-only and expects to be empty: loading twice would
/// collide on primary keys, so [`ModelStore::ensure_empty`] is checked first.
pub trait ModelStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fail if any target table already holds rows.
  fn ensure_empty(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Write every table of `model` in [`Table::load_order`], atomically: on
  /// failure nothing is written.
  fn load<'a>(
    &'a self,
    model: &'a NormalizedModel,
  ) -> impl Future<Output = Result<LoadSummary, Self::Error>> + Send + 'a;

  fn count_rows(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Scan every declared foreign key; an empty result means referential
  /// closure holds.
  fn foreign_key_violations(
    &self,
  ) -> impl Future<Output = Result<Vec<ForeignKeyViolation>, Self::Error>> + Send + '_;
}
