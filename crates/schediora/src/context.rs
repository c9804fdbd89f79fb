// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for one CLI invocation.

use std::sync::Arc;

use schediora_api::ApiClient;
use schediora_app::{QueryClient, SessionController};
use schediora_config::SchedioraConfig;
use schediora_core::{SchedioraError, StudyTask};
use schediora_storage::{Database, SqliteTokenStore};
use tracing::warn;

/// Config, client, and bootstrapped session.
pub struct AppContext {
    pub config: SchedioraConfig,
    pub api: ApiClient,
    pub session: SessionController,
    pub queries: QueryClient,
    db: Database,
}

impl AppContext {
    /// Opens the token database and resolves the stored session.
    pub async fn open(config: SchedioraConfig) -> Result<Self, SchedioraError> {
        let api = ApiClient::new(&config.api)?;
        let db = Database::open(&config.storage).await?;
        let store = Arc::new(SqliteTokenStore::new(db.clone()));

        let session = SessionController::new(api.clone(), store);
        session.bootstrap().await;

        let queries = QueryClient::new(&config.polling);
        Ok(Self {
            config,
            api,
            session,
            queries,
            db,
        })
    }

    /// The current access token, or an error telling the user to sign in.
    pub fn require_token(&self) -> Result<String, SchedioraError> {
        self.session
            .access_token()
            .ok_or(SchedioraError::NotAuthenticated)
    }

    /// This week's tasks, fetched once.
    pub async fn current_tasks(&self, token: &str) -> Result<Vec<StudyTask>, SchedioraError> {
        self.api.study_tasks(token).await
    }

    pub async fn close(&self) {
        if let Err(e) = self.db.close().await {
            warn!(error = %e, "failed to checkpoint database");
        }
    }
}
