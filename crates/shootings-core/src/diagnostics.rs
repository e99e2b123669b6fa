//! Per-stage row counts and the issues behind every dropped row.
//!
//! The builders never fail on bad data; they skip the row and record why
//! here, so shrinking row counts are explained rather than silent.

use serde::Serialize;

use crate::{record::Label, table::Table};

/// Why a row was dropped or flagged.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
  /// A value had no counterpart in the table it must reference.
  UnresolvedReference,
  /// A field could not be read as its expected type.
  UnparseableField,
  /// A code parsed but lies outside the fixed code space.
  OutOfDomain,
  /// A required field was empty.
  MissingField,
  /// A second row claimed an already-taken primary key.
  DuplicateKey,
  /// The row was kept but names an incident that has no incident row.
  OrphanedReference,
}

/// A single occurrence of a problem with one source value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
  pub table:  Table,
  pub column: &'static str,
  pub kind:   IssueKind,
  pub value:  String,
}

impl Issue {
  pub fn new(
    table: Table,
    column: &'static str,
    kind: IssueKind,
    value: impl Into<String>,
  ) -> Self {
    Self { table, column, kind, value: value.into() }
  }
}

/// How a label is shown in diagnostics.
pub fn describe(label: &Label) -> String {
  label.clone().unwrap_or_else(|| "<null>".to_owned())
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Aggregated issues for one (table, column, kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
  pub table:  Table,
  pub column: &'static str,
  pub kind:   IssueKind,
  pub count:  usize,
  /// The first offending value seen.
  pub sample: String,
}

/// Row counts for one produced table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCount {
  pub table:      Table,
  /// Candidate rows considered before resolution and deduplication.
  pub candidates: usize,
  /// Candidates rejected with an issue.
  pub dropped:    usize,
  /// Rows that made it into the table.
  pub rows:       usize,
}

impl StageCount {
  /// Candidates that resolved to a row already present.
  pub fn merged(&self) -> usize {
    self.candidates.saturating_sub(self.dropped + self.rows)
  }
}

/// Diagnostics for one normalization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
  pub stages: Vec<StageCount>,
  pub issues: Vec<IssueSummary>,
}

impl Report {
  pub fn record(&mut self, issue: Issue) {
    let existing = self.issues.iter_mut().find(|s| {
      s.table == issue.table && s.column == issue.column && s.kind == issue.kind
    });
    match existing {
      Some(summary) => summary.count += 1,
      None => self.issues.push(IssueSummary {
        table:  issue.table,
        column: issue.column,
        kind:   issue.kind,
        count:  1,
        sample: issue.value,
      }),
    }
  }

  pub fn stage(
    &mut self,
    table: Table,
    candidates: usize,
    dropped: usize,
    rows: usize,
  ) {
    self.stages.push(StageCount { table, candidates, dropped, rows });
  }

  pub fn stage_for(&self, table: Table) -> Option<&StageCount> {
    self.stages.iter().find(|s| s.table == table)
  }

  /// Candidates lost to an issue. Candidates folded into an equal row are
  /// counted by [`Report::merged`] instead.
  pub fn dropped(&self, table: Table) -> usize {
    self.stage_for(table).map(|s| s.dropped).unwrap_or(0)
  }

  pub fn merged(&self, table: Table) -> usize {
    self.stage_for(table).map(StageCount::merged).unwrap_or(0)
  }

  /// Total occurrences of `kind` recorded against `table`.
  pub fn issue_count(&self, table: Table, kind: IssueKind) -> usize {
    self
      .issues
      .iter()
      .filter(|s| s.table == table && s.kind == kind)
      .map(|s| s.count)
      .sum()
  }

  pub fn is_clean(&self) -> bool { self.issues.is_empty() }
}
