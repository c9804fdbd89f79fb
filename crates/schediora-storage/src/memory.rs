// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`TokenStore`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use schediora_core::traits::{ACCESS_TOKEN_KEY, ONBOARDING_DONE_KEY, REFRESH_TOKEN_KEY};
use schediora_core::{SchedioraError, StoredTokens, TokenPair, TokenStore};
use tokio::sync::Mutex;

/// Token store kept in a `HashMap`, keyed like the SQLite store.
///
/// Writes can be made to fail with [`MemoryTokenStore::fail_writes`] to
/// exercise storage-error paths. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `tokens` and the given onboarding flag.
    pub fn with_state(tokens: Option<TokenPair>, onboarding_done: bool) -> Self {
        let mut entries = HashMap::new();
        if let Some(tokens) = tokens {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token);
            entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token);
        }
        entries.insert(
            ONBOARDING_DONE_KEY.to_string(),
            if onboarding_done { "1" } else { "0" }.to_string(),
        );
        Self {
            entries: Arc::new(Mutex::new(entries)),
            fail_writes: Arc::default(),
            fail_reads: Arc::default(),
        }
    }

    /// Makes every subsequent write return a storage error (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read return a storage error (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Stores `value` under `key` directly, bypassing the paired token writes.
    pub async fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Raw value under `key`, for assertions.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    fn check_writable(&self) -> Result<(), SchedioraError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SchedioraError::Storage {
                source: "memory store is read-only".into(),
            });
        }
        Ok(())
    }

    fn check_readable(&self) -> Result<(), SchedioraError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SchedioraError::Storage {
                source: "memory store is unreadable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<(), SchedioraError> {
        self.check_writable()?;
        let mut entries = self.entries.lock().await;
        entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
        Ok(())
    }

    async fn get_tokens(&self) -> Result<StoredTokens, SchedioraError> {
        self.check_readable()?;
        let entries = self.entries.lock().await;
        Ok(StoredTokens {
            access_token: entries.get(ACCESS_TOKEN_KEY).cloned(),
            refresh_token: entries.get(REFRESH_TOKEN_KEY).cloned(),
        })
    }

    async fn clear_tokens(&self) -> Result<(), SchedioraError> {
        self.check_writable()?;
        let mut entries = self.entries.lock().await;
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        Ok(())
    }

    async fn save_onboarding_done(&self, done: bool) -> Result<(), SchedioraError> {
        self.check_writable()?;
        self.entries.lock().await.insert(
            ONBOARDING_DONE_KEY.to_string(),
            if done { "1" } else { "0" }.to_string(),
        );
        Ok(())
    }

    async fn get_onboarding_done(&self) -> Result<bool, SchedioraError> {
        self.check_readable()?;
        Ok(self.raw(ONBOARDING_DONE_KEY).await.as_deref() == Some("1"))
    }
}
