// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`TokenStore`].

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use schediora_core::traits::{ACCESS_TOKEN_KEY, ONBOARDING_DONE_KEY, REFRESH_TOKEN_KEY};
use schediora_core::{SchedioraError, StoredTokens, TokenPair, TokenStore};
use tracing::debug;

use crate::database::{map_tr_err, Database};

/// Persists credentials in the `kv` table.
///
/// The two tokens are written and removed inside one transaction, so a
/// reader never observes half of a pair from a single write.
#[derive(Clone)]
pub struct SqliteTokenStore {
    db: Database,
}

impl SqliteTokenStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn read_value(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<(), SchedioraError> {
        let tokens = tokens.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                    params![ACCESS_TOKEN_KEY, tokens.access_token],
                )?;
                tx.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                    params![REFRESH_TOKEN_KEY, tokens.refresh_token],
                )?;
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;
        debug!("tokens saved");
        Ok(())
    }

    async fn get_tokens(&self) -> Result<StoredTokens, SchedioraError> {
        self.db
            .connection()
            .call(|conn| -> Result<StoredTokens, rusqlite::Error> {
                Ok(StoredTokens {
                    access_token: read_value(conn, ACCESS_TOKEN_KEY)?,
                    refresh_token: read_value(conn, REFRESH_TOKEN_KEY)?,
                })
            })
            .await
            .map_err(map_tr_err)
    }

    async fn clear_tokens(&self) -> Result<(), SchedioraError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM kv WHERE key IN (?1, ?2)",
                    params![ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY],
                )?;
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;
        debug!("tokens cleared");
        Ok(())
    }

    async fn save_onboarding_done(&self, done: bool) -> Result<(), SchedioraError> {
        let value = if done { "1" } else { "0" };
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                    params![ONBOARDING_DONE_KEY, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn get_onboarding_done(&self) -> Result<bool, SchedioraError> {
        let value = self
            .db
            .connection()
            .call(|conn| read_value(conn, ONBOARDING_DONE_KEY))
            .await
            .map_err(map_tr_err)?;
        Ok(value.as_deref() == Some("1"))
    }
}
