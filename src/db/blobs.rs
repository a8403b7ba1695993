use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

use super::Database;
use crate::store::BlobStore;

/// Key of the persisted working set. Bumped whenever the serialized shape changes.
pub const STORAGE_KEY: &str = "field_ops_data_v2";

impl Database {
    pub fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let result = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?", [key], |row| {
                row.get::<_, Vec<u8>>(0)
            });

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn put_blob(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO blobs (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl BlobStore for Database {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        self.get_blob(STORAGE_KEY)
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        self.put_blob(STORAGE_KEY, blob)
    }
}
