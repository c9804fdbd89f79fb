// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `schediora status` command implementation.

use colored::Colorize;
use schediora_app::{AuthStatus, Session};
use schediora_core::SchedioraError;

use crate::context::AppContext;

pub async fn run_status(ctx: &AppContext, json: bool) -> Result<(), SchedioraError> {
    let session = ctx.session.snapshot();

    if json {
        let out = status_json(&session, ctx.api.base_url());
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| SchedioraError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("{}", "Schediora".bold());
    println!("  Backend:     {}", ctx.api.base_url());
    let state = match session.status() {
        AuthStatus::Authenticated => format!("signed in as {}", session.user_name).green(),
        other => other.to_string().yellow(),
    };
    println!("  Session:     {state}");
    println!(
        "  Onboarding:  {}",
        if session.has_completed_onboarding {
            "completed".green()
        } else {
            "not completed".yellow()
        }
    );
    println!("  Next screen: {}", session.route());
    Ok(())
}

fn status_json(session: &Session, base_url: &str) -> serde_json::Value {
    serde_json::json!({
        "backend": base_url,
        "status": session.status().to_string(),
        "route": session.route().to_string(),
        "authenticated": session.is_authenticated,
        "user_name": session.user_name,
        "onboarding_completed": session.has_completed_onboarding,
    })
}
