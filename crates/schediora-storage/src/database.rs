// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: parent directory creation, PRAGMAs, and schema.
//!
//! All writes go through tokio-rusqlite's single background thread.

use std::path::Path;

use schediora_config::model::StorageConfig;
use schediora_core::SchedioraError;
use tracing::debug;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);";

pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SchedioraError {
    SchedioraError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the client's SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, SchedioraError> {
        let path = Path::new(&config.database_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(SchedioraError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(SchedioraError::storage)?;
        let db = Self { conn };
        db.initialize(config.wal_mode).await?;
        debug!(path = %config.database_path, wal = config.wal_mode, "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database. Contents vanish on drop.
    pub async fn open_in_memory() -> Result<Self, SchedioraError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(SchedioraError::storage)?;
        let db = Self { conn };
        db.initialize(false).await?;
        Ok(db)
    }

    async fn initialize(&self, wal_mode: bool) -> Result<(), SchedioraError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL so the database file is self-contained.
    pub async fn close(&self) -> Result<(), SchedioraError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
