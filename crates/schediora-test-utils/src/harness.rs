// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend + client + memory store, assembled for tests.

use std::sync::Arc;

use schediora_api::ApiClient;
use schediora_config::model::{ApiConfig, PollingConfig, SchedioraConfig};
use schediora_core::{SchedioraError, TokenPair, TokenStore};
use schediora_storage::MemoryTokenStore;
use wiremock::MockServer;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    tokens: Option<TokenPair>,
    onboarded: bool,
    poll_interval_ms: u64,
    max_poll_attempts: u32,
    refetch_interval_ms: u64,
    request_timeout_ms: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            tokens: None,
            onboarded: false,
            poll_interval_ms: 5,
            max_poll_attempts: 45,
            refetch_interval_ms: 60_000,
            request_timeout_ms: 2_000,
        }
    }

    /// Seed the token store with a pair.
    pub fn with_tokens(mut self, tokens: TokenPair) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Seed the onboarding flag as completed.
    pub fn onboarded(mut self) -> Self {
        self.onboarded = true;
        self
    }

    pub fn with_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    pub fn with_refetch_interval_ms(mut self, ms: u64) -> Self {
        self.refetch_interval_ms = ms;
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    /// Start the mock server and build the client against it.
    pub async fn build(self) -> Result<TestHarness, SchedioraError> {
        let server = MockServer::start().await;

        let mut config = SchedioraConfig::default();
        config.api = ApiConfig {
            base_url: server.uri(),
            request_timeout_ms: self.request_timeout_ms,
        };
        config.polling = PollingConfig {
            ai_poll_interval_ms: self.poll_interval_ms,
            ai_max_poll_attempts: self.max_poll_attempts,
            refetch_interval_ms: self.refetch_interval_ms,
            query_retries: 1,
        };

        let api = ApiClient::new(&config.api)?;
        let store = MemoryTokenStore::with_state(self.tokens, self.onboarded);

        Ok(TestHarness {
            server,
            api,
            store,
            config,
        })
    }
}

/// A complete client environment pointed at a `wiremock` server.
pub struct TestHarness {
    pub server: MockServer,
    pub api: ApiClient,
    pub store: MemoryTokenStore,
    pub config: SchedioraConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The memory store as a trait object, sharing state with `self.store`.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::new(self.store.clone())
    }

    /// Number of requests the mock server received for `path`.
    pub async fn request_count(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }

    /// Total number of requests the mock server received.
    pub async fn total_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_points_client_at_mock_server() {
        let harness = TestHarness::builder()
            .with_tokens(TokenPair::new("a1", "r1"))
            .onboarded()
            .build()
            .await
            .unwrap();

        assert_eq!(harness.api.base_url(), harness.server.uri());
        assert!(harness.store.get_onboarding_done().await.unwrap());
        assert!(harness.store.get_tokens().await.unwrap().into_pair().is_some());
        assert_eq!(harness.total_requests().await, 0);
    }

    #[tokio::test]
    async fn builder_overrides_reach_config() {
        let harness = TestHarness::builder()
            .with_poll_attempts(7)
            .with_refetch_interval_ms(25)
            .with_request_timeout_ms(150)
            .build()
            .await
            .unwrap();

        assert_eq!(harness.config.polling.ai_max_poll_attempts, 7);
        assert_eq!(harness.config.polling.refetch_interval_ms, 25);
        assert_eq!(harness.api.timeout().as_millis(), 150);
    }
}
