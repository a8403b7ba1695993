use anyhow::Result;
use log::debug;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

mod blobs;
mod schema;

pub use blobs::STORAGE_KEY;
pub use schema::SCHEMA_VERSION;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at `path`, creating it and parent directories if needed
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Apply every migration past the stored version, each in its own transaction.
    fn migrate(&mut self) -> Result<()> {
        let current = self.schema_version()?;

        for (step, sql) in schema::MIGRATIONS.iter().enumerate().skip(current as usize) {
            let target = step as i32 + 1;
            let tx = self.conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.execute(
                "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
                [target],
            )?;
            tx.commit()?;
            debug!("database schema now at version {}", target);
        }

        Ok(())
    }

    /// Stored schema version; 0 for a fresh file without the version table.
    fn schema_version(&self) -> Result<i32> {
        let has_table: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(0);
        }

        let version = self
            .conn
            .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(version.unwrap_or(0))
    }
}
