// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the application layer and its backends.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod token_store;

pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, ONBOARDING_DONE_KEY, REFRESH_TOKEN_KEY};
