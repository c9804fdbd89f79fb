// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `schediora watch`: keep the three background queries running until
//! interrupted, printing each refresh.

use colored::Colorize;
use schediora_app::dashboard::progress_percent;
use schediora_app::shutdown::install_signal_handler;
use schediora_app::{PlannerStats, QueryState};
use schediora_core::{ChartRange, SchedioraError};
use tracing::info;

use crate::context::AppContext;

fn describe<T>(name: &str, state: &QueryState<T>, render: impl Fn(&T) -> String) -> Option<String> {
    if state.is_fetching || state.is_loading() {
        return None;
    }
    let time = state
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    match (&state.data, &state.error) {
        (_, Some(error)) => Some(format!("[{time}] {name}: {}", error.red())),
        (Some(data), None) => Some(format!("[{time}] {name}: {}", render(data))),
        (None, None) => None,
    }
}

pub async fn run_watch(ctx: &AppContext, range: ChartRange) -> Result<(), SchedioraError> {
    let token = ctx.require_token()?;
    let cancel = install_signal_handler();

    let tasks = ctx.queries.study_sessions(&ctx.api, Some(&token));
    let summary = ctx.queries.dashboard_summary(&ctx.api, Some(&token), range);
    let weekly = ctx.queries.weekly_ai_status(&ctx.api, Some(&token));
    let (mut tasks_rx, mut summary_rx, mut weekly_rx) = (tasks.watch(), summary.watch(), weekly.watch());

    info!(interval = ?ctx.config.polling.refetch_interval(), "watching queries");
    println!("{} (Ctrl+C to stop)", "Watching".bold());

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            changed = tasks_rx.changed() => {
                if changed.is_err() { break; }
                describe("tasks", &*tasks_rx.borrow_and_update(), |tasks| {
                    let stats = PlannerStats::from_tasks(tasks);
                    format!("{} tasks, {}% complete", stats.total, stats.completion_rate)
                })
            }
            changed = summary_rx.changed() => {
                if changed.is_err() { break; }
                describe("dashboard", &*summary_rx.borrow_and_update(), |s| {
                    format!("{}% of today done, {} day streak", progress_percent(s), s.streak_days)
                })
            }
            changed = weekly_rx.changed() => {
                if changed.is_err() { break; }
                describe("ai", &*weekly_rx.borrow_and_update(), |w| {
                    if w.has_generated_this_week {
                        "plan generated this week".to_string()
                    } else {
                        "no AI plan this week".to_string()
                    }
                })
            }
        };
        if let Some(line) = line {
            println!("{line}");
        }
    }

    tasks.stop();
    summary.stop();
    weekly.stop();
    println!("stopped");
    Ok(())
}
