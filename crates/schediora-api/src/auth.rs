// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and profile endpoints.

use schediora_core::{SchedioraError, TokenPair, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};

use crate::client::{ApiClient, RequestOptions};

/// Email/password body for `/auth/login` and `/auth/register`.
#[derive(Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose_password")]
    pub password: &'a SecretString,
}

fn expose_password<S: Serializer>(password: &&SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(password.expose_secret())
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Token triple returned by login, register, and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn into_pair(self) -> TokenPair {
        TokenPair::new(self.access_token, self.refresh_token)
    }
}

impl ApiClient {
    /// `POST /auth/register`
    pub async fn register(&self, credentials: &Credentials<'_>) -> Result<TokenPair, SchedioraError> {
        let response: TokenResponse = self
            .request("/auth/register", RequestOptions::post().json(credentials))
            .await?;
        Ok(response.into_pair())
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials<'_>) -> Result<TokenPair, SchedioraError> {
        let response: TokenResponse = self
            .request("/auth/login", RequestOptions::post().json(credentials))
            .await?;
        Ok(response.into_pair())
    }

    /// `POST /auth/refresh`: trades a refresh token for a new pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SchedioraError> {
        let response: TokenResponse = self
            .request(
                "/auth/refresh",
                RequestOptions::post().json(&RefreshRequest { refresh_token }),
            )
            .await?;
        Ok(response.into_pair())
    }

    /// `POST /auth/logout`: revokes the refresh token server-side.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), SchedioraError> {
        let _: IgnoredAny = self
            .request(
                "/auth/logout",
                RequestOptions::post().json(&RefreshRequest { refresh_token }),
            )
            .await?;
        Ok(())
    }

    /// `GET /users/me`
    pub async fn me(&self, access_token: &str) -> Result<UserProfile, SchedioraError> {
        self.request("/users/me", RequestOptions::get().bearer(access_token))
            .await
    }
}
