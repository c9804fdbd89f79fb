// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable storage for the Schediora client.
//!
//! [`SqliteTokenStore`] keeps the token pair and the onboarding flag in a
//! small key/value table, with every write serialized through
//! `tokio-rusqlite`'s background thread. [`MemoryTokenStore`] implements the
//! same trait in memory for tests and ephemeral sessions.

pub mod database;
pub mod memory;
pub mod sqlite;

pub use database::Database;
pub use memory::MemoryTokenStore;
pub use sqlite::SqliteTokenStore;
