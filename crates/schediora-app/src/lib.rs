// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application layer of the Schediora client.
//!
//! - [`session`]: bootstrap, login/register, sign-out, onboarding
//! - [`query`]: polled queries with invalidation
//! - [`ai_plan`]: AI weekly-plan generation and job polling
//! - [`planner`] and [`dashboard`]: task mutations and derived view values

pub mod ai_plan;
pub mod dashboard;
pub mod planner;
pub mod query;
pub mod session;
pub mod shutdown;

pub use ai_plan::{AiPlanFlow, AiPlanState, GenerationOutcome};
pub use planner::{Planner, PlannerStats, TimelineRow};
pub use query::{PolledQuery, QueryClient, QueryKey, QueryState};
pub use session::{AuthStatus, RootRoute, Session, SessionController};
