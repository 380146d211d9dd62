// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-writer SQLite connection every store operation runs through.
//!
//! One otype maps to one table, created lazily on first use so adding a new
//! stored kind never needs a migration step. WAL journaling plus a single
//! open connection gives the "writes are serialized, reads see a consistent
//! snapshot" guarantee §5 asks for without hand-rolling a storage engine.

use std::collections::HashSet;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::Connection;
use tsc_core::Otype;

use crate::error::StoreError;

pub struct Db {
    conn: Mutex<Connection>,
    known_tables: Mutex<HashSet<Otype>>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Ok(Self { conn: Mutex::new(conn), known_tables: Mutex::new(HashSet::new()) })
    }

    /// In-memory database, for tests that don't need a file on disk.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn: Mutex::new(conn), known_tables: Mutex::new(HashSet::new()) })
    }

    fn configure(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA busy_timeout=5000;
            PRAGMA synchronous=NORMAL;
            "#,
        )?;
        Ok(())
    }

    /// Run `f` with the single writer connection locked, creating `otype`'s
    /// table first if this is the first time it's been touched.
    pub fn with_table<T>(&self, otype: Otype, f: impl FnOnce(&Connection) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let conn = self.conn.lock();
        self.ensure_table(&conn, otype)?;
        f(&conn)
    }

    /// Run `f` with the connection locked, ensuring every table in `otypes`
    /// exists first (used by batched/cross-table operations).
    pub fn with_tables<T>(
        &self,
        otypes: impl IntoIterator<Item = Otype>,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock();
        for otype in otypes {
            self.ensure_table(&conn, otype)?;
        }
        f(&conn)
    }

    /// Run `f` with every known otype's table ensured to exist (used for
    /// cross-otype scans like `ResolveEasyOID`).
    pub fn with_all_tables<T>(&self, f: impl FnOnce(&Connection) -> Result<T, StoreError>) -> Result<T, StoreError> {
        self.with_tables(Otype::ALL, f)
    }

    fn ensure_table(&self, conn: &Connection, otype: Otype) -> Result<(), StoreError> {
        if self.known_tables.lock().contains(&otype) {
            return Ok(());
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (oid TEXT PRIMARY KEY, version INTEGER NOT NULL, data BLOB NOT NULL)",
            otype.table_name()
        ))?;
        self.known_tables.lock().insert(otype);
        Ok(())
    }

    pub fn table_count(&self, otype: Otype) -> Result<i64, StoreError> {
        self.with_table(otype, |conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", otype.table_name()), [], |row| row.get(0))?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_created_lazily_and_counted() {
        let db = Db::open_in_memory().unwrap();
        assert_eq!(db.table_count(Otype::Tab).unwrap(), 0);
    }
}
