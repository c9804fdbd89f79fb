// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manual task creation, status updates, and the planner's derived views.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use schediora_api::ApiClient;
use schediora_core::{NewTask, SchedioraError, StudyTask, TaskStatus};
use tracing::{debug, info};

use crate::query::{QueryClient, QueryKey};

/// Shortest manual task accepted, in minutes.
pub const MIN_TASK_MINUTES: f64 = 15.0;

const TIMELINE_START_MINUTES: u32 = 8 * 60;
const TIMELINE_MIN_SLOT_MINUTES: u32 = 30;
const TIMELINE_GAP_MINUTES: u32 = 15;

const MISSING_TOKEN: &str = "Missing session token";

/// Validates raw form input for a manual task.
///
/// Title and topic are trimmed and must be non-empty. The duration must
/// parse as a finite number of at least 15 and is rounded to whole minutes.
pub fn validate_manual_task(
    title: &str,
    topic: &str,
    duration: &str,
) -> Result<NewTask, SchedioraError> {
    let title = title.trim();
    let topic = topic.trim();
    if title.is_empty() || topic.is_empty() {
        return Err(SchedioraError::Validation(
            "Please fill title and topic.".to_string(),
        ));
    }

    let minutes = duration
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= MIN_TASK_MINUTES)
        .ok_or_else(|| {
            SchedioraError::Validation("Duration must be at least 15 minutes.".to_string())
        })?
        .round();
    if minutes > f64::from(u32::MAX) {
        return Err(SchedioraError::Validation(
            "Duration is too long.".to_string(),
        ));
    }

    Ok(NewTask {
        title: title.to_string(),
        topic: topic.to_string(),
        duration_minutes: minutes as u32,
    })
}

/// Returns true if the week already has a plan to append to.
pub fn has_current_plan(tasks: &[StudyTask]) -> bool {
    tasks.iter().any(|t| t.plan_id.is_some())
}

/// Planner mutations. Successful writes invalidate the task list and the
/// dashboard summary.
#[derive(Clone)]
pub struct Planner {
    api: ApiClient,
    queries: QueryClient,
}

impl Planner {
    pub fn new(api: ApiClient, queries: QueryClient) -> Self {
        Self { api, queries }
    }

    /// Validates and adds a manual task.
    ///
    /// Appends to the current plan when any task already belongs to one,
    /// otherwise creates a new plan around it.
    pub async fn add_manual_task(
        &self,
        access_token: Option<&str>,
        current_tasks: &[StudyTask],
        title: &str,
        topic: &str,
        duration: &str,
    ) -> Result<NewTask, SchedioraError> {
        let token = access_token.ok_or_else(|| SchedioraError::Validation(MISSING_TOKEN.to_string()))?;
        let task = validate_manual_task(title, topic, duration)?;

        if has_current_plan(current_tasks) {
            let created = self.api.add_task_to_current_plan(token, &task).await?;
            debug!(task_id = %created.id, "task appended to current plan");
        } else {
            let plan = self.api.create_plan(token, &task).await?;
            debug!(plan_id = %plan.id, "plan created");
        }
        info!(title = %task.title, minutes = task.duration_minutes, "manual task added");

        self.invalidate();
        Ok(task)
    }

    pub async fn update_task_status(
        &self,
        access_token: Option<&str>,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), SchedioraError> {
        let token = access_token.ok_or_else(|| SchedioraError::Validation(MISSING_TOKEN.to_string()))?;
        self.api.update_task_status(token, task_id, status).await?;
        debug!(%task_id, %status, "task status updated");
        self.invalidate();
        Ok(())
    }

    fn invalidate(&self) {
        self.queries.invalidate(QueryKey::StudySessions);
        self.queries.invalidate(QueryKey::DashboardSummary(None));
    }
}

/// Per-status counts for the current week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerStats {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Percentage of done tasks, rounded.
    pub completion_rate: u32,
}

impl PlannerStats {
    pub fn from_tasks(tasks: &[StudyTask]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let total = tasks.len();
        let done = count(TaskStatus::Done);
        let completion_rate = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            total,
            done,
            in_progress: count(TaskStatus::InProgress),
            pending: count(TaskStatus::Pending),
            completion_rate,
        }
    }
}

/// Tasks with the given status, in list order.
pub fn tasks_with_status(tasks: &[StudyTask], status: TaskStatus) -> Vec<&StudyTask> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// One row of the day timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow<'a> {
    /// `"{id}-{index}"`, unique even when ids repeat.
    pub key: String,
    pub start_label: String,
    pub task: &'a StudyTask,
}

/// Lays tasks out on a timeline in local time.
pub fn build_timeline(tasks: &[StudyTask]) -> Vec<TimelineRow<'_>> {
    build_timeline_in(tasks, &chrono::Local)
}

/// Lays tasks out on a timeline, rendering scheduled times in `tz`.
///
/// Tasks with `scheduled_at` show that time (`--:--` if it cannot be
/// parsed). Others get a slot from a cursor starting at 08:00; every task
/// advances the cursor by its duration (at least 30 minutes) plus a
/// 15 minute gap.
pub fn build_timeline_in<'a, Tz: TimeZone>(tasks: &'a [StudyTask], tz: &Tz) -> Vec<TimelineRow<'a>>
where
    Tz::Offset: std::fmt::Display,
{
    let mut cursor = u64::from(TIMELINE_START_MINUTES);
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let start_label = match task.scheduled_at.as_deref() {
                Some(iso) => format_from_iso(iso, tz),
                None => format_clock(cursor),
            };
            let slot = task.duration_minutes.max(TIMELINE_MIN_SLOT_MINUTES);
            cursor = cursor.saturating_add(u64::from(slot) + u64::from(TIMELINE_GAP_MINUTES));
            TimelineRow {
                key: format!("{}-{}", task.id, index),
                start_label,
                task,
            }
        })
        .collect()
}

fn format_clock(total_minutes: u64) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// `HH:MM` of an ISO-8601 timestamp. Timestamps without an offset are taken as already local.
fn format_from_iso<Tz: TimeZone>(iso: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if let Ok(at) = DateTime::parse_from_rfc3339(iso) {
        return at.with_timezone(tz).format("%H:%M").to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(iso, fmt).ok())
        .map(|at| at.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
