// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Schediora study-planning backend.
//!
//! [`ApiClient`] owns the transport (timeout, bearer auth, error
//! normalization); each endpoint group adds typed methods to it from its
//! own module.

pub mod ai;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod plans;

pub use auth::{Credentials, TokenResponse};
pub use client::{ApiClient, RequestOptions, DEFAULT_ERROR_MESSAGE};
pub use dashboard::CHART_PALETTE;
pub use plans::{CreatedPlan, CreatedTask};
