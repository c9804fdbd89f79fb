// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard, task, and AI plan commands.

use clap::Args;
use colored::{ColoredString, Colorize};
use schediora_app::dashboard::{
    has_weekly_planner, next_session, progress_percent, total_focus_minutes,
};
use schediora_app::planner::build_timeline;
use schediora_app::shutdown::install_signal_handler;
use schediora_app::{AiPlanFlow, GenerationOutcome, Planner, PlannerStats};
use schediora_core::{ChartRange, FocusTopics, SchedioraError, StudyTask, TaskStatus};
use tracing::warn;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Goal sent to the planner; defaults to the onboarding goal.
    #[arg(long)]
    pub goal: Option<String>,

    /// Topic sent to the planner; defaults to the first focus topic.
    #[arg(long)]
    pub topic: Option<String>,
}

/// Colors a `#RRGGBB` string as a swatch, or leaves the text plain.
pub fn swatch(text: &str, hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn status_badge(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Pending => "pending".yellow(),
        TaskStatus::InProgress => "in progress".cyan(),
        TaskStatus::Done => "done".green(),
    }
}

fn print_task(task: &StudyTask) {
    println!(
        "  {:<10} {:<28} {:<12} {:>4} min  [{}]",
        task.id,
        task.title,
        task.topic,
        task.duration_minutes,
        status_badge(task.status)
    );
}

pub async fn run_dashboard(ctx: &AppContext, range: ChartRange) -> Result<(), SchedioraError> {
    let token = ctx.require_token()?;
    let (summary, tasks) = tokio::try_join!(
        ctx.api.dashboard_summary(&token, range),
        ctx.current_tasks(&token)
    )?;
    let session = ctx.session.snapshot();

    println!("{} {}", "Hi,".bold(), session.user_name.bold());
    println!(
        "  Today:   {}/{} sessions ({}%)",
        summary.today_completed,
        summary.today_total,
        progress_percent(&summary)
    );
    println!("  Streak:  {} days", summary.streak_days);

    if has_weekly_planner(&tasks) {
        if let Some(next) = next_session(&tasks) {
            println!(
                "  Next:    {} ({}, {} min)",
                next.title.bold(),
                next.topic,
                next.duration_minutes
            );
        }
    } else {
        println!(
            "  {}",
            "No weekly planner yet. Run `schediora generate-plan` or `schediora add-task`.".yellow()
        );
    }

    println!("\n{} ({range})", "Focus minutes".bold());
    for point in &summary.focus_minutes_trend {
        println!("  {:<6} {:>4} min", point.label, point.minutes);
    }

    println!(
        "\n{} ({} min total)",
        "Subjects".bold(),
        total_focus_minutes(&summary)
    );
    for slice in &summary.subject_distribution {
        println!(
            "  {} {:<12} {:>4} min",
            swatch("■", slice.color),
            slice.subject,
            slice.minutes
        );
    }
    Ok(())
}

pub async fn run_tasks(ctx: &AppContext) -> Result<(), SchedioraError> {
    let token = ctx.require_token()?;
    let tasks = ctx.current_tasks(&token).await?;
    let stats = PlannerStats::from_tasks(&tasks);

    println!(
        "{}  {} total, {} done, {} in progress, {} pending ({}% complete)",
        "This week".bold(),
        stats.total,
        stats.done,
        stats.in_progress,
        stats.pending,
        stats.completion_rate
    );
    if tasks.is_empty() {
        println!("  {}", "No tasks yet.".yellow());
        return Ok(());
    }

    for task in &tasks {
        print_task(task);
    }

    println!("\n{}", "Timeline".bold());
    for row in build_timeline(&tasks) {
        println!("  {}  {}", row.start_label.cyan(), row.task.title);
    }
    Ok(())
}

pub async fn run_add_task(
    ctx: &AppContext,
    title: &str,
    topic: &str,
    duration: &str,
) -> Result<(), SchedioraError> {
    let token = ctx.session.access_token();
    let tasks = match token.as_deref() {
        Some(token) => ctx.current_tasks(token).await?,
        None => Vec::new(),
    };

    let planner = Planner::new(ctx.api.clone(), ctx.queries.clone());
    let task = planner
        .add_manual_task(token.as_deref(), &tasks, title, topic, duration)
        .await?;
    println!(
        "{} added {} ({}, {} min)",
        "✓".green(),
        task.title.bold(),
        task.topic,
        task.duration_minutes
    );
    Ok(())
}

pub async fn run_set_status(
    ctx: &AppContext,
    task_id: &str,
    status: TaskStatus,
) -> Result<(), SchedioraError> {
    let planner = Planner::new(ctx.api.clone(), ctx.queries.clone());
    planner
        .update_task_status(ctx.session.access_token().as_deref(), task_id, status)
        .await?;
    println!("{} {task_id} is now {}", "✓".green(), status_badge(status));
    Ok(())
}

pub async fn run_generate_plan(ctx: &AppContext, args: &GenerateArgs) -> Result<(), SchedioraError> {
    let token = ctx.session.access_token();
    let tasks = match token.as_deref() {
        Some(token) => ctx.current_tasks(token).await?,
        None => Vec::new(),
    };

    let mut draft = ctx.session.snapshot().onboarding_draft;
    if let Some(goal) = &args.goal {
        draft.goal = goal.clone();
    }
    if let Some(topic) = &args.topic {
        draft.focus_topics = FocusTopics::from_topics([topic.clone()]);
    }

    let flow = AiPlanFlow::new(ctx.api.clone(), ctx.queries.clone(), &ctx.config.polling);
    let mut progress = flow.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = None;
        while progress.changed().await.is_ok() {
            let status = progress.borrow_and_update().status.clone();
            if status.is_some() && status != last {
                if let Some(status) = &status {
                    println!("  job {}", status.to_string().cyan());
                }
                last = status;
            }
        }
    });

    let cancel = install_signal_handler();
    println!("Generating plan for {} / {}...", draft.goal, draft.primary_topic());
    let outcome = flow
        .generate(token.as_deref(), &draft, &tasks, Some(&cancel))
        .await;
    drop(flow);
    if let Err(e) = printer.await {
        warn!(error = %e, "progress printer task failed");
    }

    match outcome? {
        GenerationOutcome::Completed(job) => {
            println!("{} plan generated", "✓".green());
            if let Some(plan) = job.result_structured {
                println!("\n{}", plan.title.bold());
                println!("{}", plan.summary);
                for (i, step) in plan.steps.iter().enumerate() {
                    match &step.detail {
                        Some(detail) => println!("  {}. {} - {detail}", i + 1, step.title),
                        None => println!("  {}. {}", i + 1, step.title),
                    }
                }
            } else if let Some(text) = job.result {
                println!("{text}");
            }
        }
        GenerationOutcome::AlreadyRunning => {
            println!("{}", "A plan is already being generated.".yellow());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_colours() {
        assert_eq!(parse_hex("#38BDF8"), Some((0x38, 0xBD, 0xF8)));
        assert_eq!(parse_hex("#FB7185"), Some((0xFB, 0x71, 0x85)));
        assert_eq!(parse_hex("38BDF8"), None);
        assert_eq!(parse_hex("#12"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }
}
