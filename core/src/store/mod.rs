//! SQLite export.
//!
//! RULE: Only the store talks to the database.
//! Generators never touch it; the binary hands a finished Dataset over.

mod children;
mod users;

use crate::{
    dataset::{Dataset, TableKind},
    error::GenResult,
};
use rusqlite::Connection;

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the export database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    /// Replace the contents of every table inside one transaction.
    /// Rows from an earlier export of the same file are dropped.
    pub fn insert_dataset(&self, dataset: &Dataset) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for kind in TableKind::ALL {
            // Table names come from TableKind, never from input.
            self.conn
                .execute(&format!("DELETE FROM {}", kind.name()), [])?;
        }
        self.insert_users(&dataset.users)?;
        self.insert_subscriptions(&dataset.subscriptions)?;
        self.insert_events(&dataset.events)?;
        self.insert_surveys(&dataset.surveys)?;
        self.insert_experiments(&dataset.experiments)?;
        tx.commit()?;
        log::info!("store: exported {} tables", TableKind::ALL.len());
        Ok(())
    }

    pub fn row_count(&self, kind: TableKind) -> GenResult<i64> {
        // Table names come from TableKind, never from input.
        let sql = format!("SELECT COUNT(*) FROM {}", kind.name());
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }
}
