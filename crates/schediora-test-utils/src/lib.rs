// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Schediora integration tests.
//!
//! Provides a [`TestHarness`] wiring a `wiremock` backend to a real
//! [`ApiClient`](schediora_api::ApiClient) and an in-memory token store, plus
//! helpers in [`mock_backend`] that mount the backend routes the client uses.

pub mod harness;
pub mod mock_backend;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::SequenceResponder;
