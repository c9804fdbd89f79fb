// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable storage for session credentials and the onboarding flag.

use async_trait::async_trait;

use crate::error::SchedioraError;
use crate::types::{StoredTokens, TokenPair};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "schediora.accessToken";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "schediora.refreshToken";
/// Storage key for the onboarding-completed flag (`"1"` or `"0"`).
pub const ONBOARDING_DONE_KEY: &str = "schediora.onboardingDone";

/// Persists tokens and the onboarding flag across process restarts.
///
/// Every operation is idempotent. A cold or empty store is not an error:
/// reads return empty tokens and `false`.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Writes both tokens in one atomic step.
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<(), SchedioraError>;

    /// Reads whatever tokens are stored.
    async fn get_tokens(&self) -> Result<StoredTokens, SchedioraError>;

    /// Removes both tokens in one atomic step.
    async fn clear_tokens(&self) -> Result<(), SchedioraError>;

    async fn save_onboarding_done(&self, done: bool) -> Result<(), SchedioraError>;

    async fn get_onboarding_done(&self) -> Result<bool, SchedioraError>;
}
