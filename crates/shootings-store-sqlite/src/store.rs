//! [`SqliteStore`]: the SQLite implementation of [`ModelStore`].

use std::path::Path;

use shootings_core::{
  NormalizedModel, Table,
  store::{ForeignKeyViolation, LoadSummary, ModelStore},
};

use crate::{
  Error, Result,
  encode::{batches, decode_text},
  schema::{SCHEMA, columns, insert_sql, select_sql},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A normalized shootings store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and create the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read a table back in insertion order, every value rendered as text.
  pub async fn dump(&self, table: Table) -> Result<Vec<Vec<Option<String>>>> {
    let sql = select_sql(table);
    let width = columns(table).len();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get_ref(i).map(decode_text))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}

// ─── ModelStore impl ─────────────────────────────────────────────────────────

impl ModelStore for SqliteStore {
  type Error = Error;

  async fn ensure_empty(&self) -> Result<()> {
    let counts: Vec<(Table, usize)> = self
      .conn
      .call(|conn| {
        let mut counts = Vec::new();
        for table in Table::load_order() {
          let rows: usize = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |r| r.get(0),
          )?;
          counts.push((table, rows));
        }
        Ok(counts)
      })
      .await?;

    match counts.into_iter().find(|(_, rows)| *rows > 0) {
      Some((table, rows)) => Err(Error::StoreNotEmpty { table, rows }),
      None => Ok(()),
    }
  }

  async fn load(&self, model: &NormalizedModel) -> Result<LoadSummary> {
    let batches = batches(model);

    // One transaction for the whole load: a failure in any table rolls back
    // every table written before it.
    let summary = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut tables = Vec::with_capacity(batches.len());
        for batch in &batches {
          let mut stmt = tx.prepare(&insert_sql(batch.table))?;
          for row in &batch.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }
          tables.push((batch.table, batch.rows.len()));
        }
        tx.commit()?;
        Ok(LoadSummary { tables })
      })
      .await?;

    for (table, rows) in &summary.tables {
      tracing::debug!(%table, rows, "inserted");
    }
    Ok(summary)
  }

  async fn count_rows(&self, table: Table) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let rows: usize = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
      .await?;
    Ok(rows)
  }

  async fn foreign_key_violations(&self) -> Result<Vec<ForeignKeyViolation>> {
    let violations = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ForeignKeyViolation {
              table:  row.get(0)?,
              rowid:  row.get(1)?,
              parent: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(violations)
  }
}
