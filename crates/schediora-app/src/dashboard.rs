// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values the dashboard derives from the summary and the task list.

use schediora_core::{DashboardSummary, StudyTask, TaskStatus};

/// Today's completion as a rounded percentage; 0 when nothing is scheduled.
pub fn progress_percent(summary: &DashboardSummary) -> u32 {
    if summary.today_total == 0 {
        return 0;
    }
    (f64::from(summary.today_completed) / f64::from(summary.today_total) * 100.0).round() as u32
}

/// The task to work on next: the first in progress, else the first
/// pending, else the first task.
pub fn next_session(tasks: &[StudyTask]) -> Option<&StudyTask> {
    tasks
        .iter()
        .find(|t| t.status == TaskStatus::InProgress)
        .or_else(|| tasks.iter().find(|t| t.status == TaskStatus::Pending))
        .or_else(|| tasks.first())
}

pub fn has_weekly_planner(tasks: &[StudyTask]) -> bool {
    !tasks.is_empty()
}

/// Total minutes across the subject distribution.
pub fn total_focus_minutes(summary: &DashboardSummary) -> u32 {
    summary.subject_distribution.iter().map(|s| s.minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schediora_core::types::SubjectSlice;
    use schediora_test_utils::mock_backend::task_json;

    fn task(id: &str, status: &str) -> StudyTask {
        serde_json::from_value(task_json(id, None, status, 30)).unwrap()
    }

    fn summary(completed: u32, total: u32) -> DashboardSummary {
        DashboardSummary {
            today_completed: completed,
            today_total: total,
            streak_days: 0,
            weekly_progress: vec![],
            focus_minutes_trend: vec![],
            subject_distribution: vec![],
        }
    }

    #[test]
    fn progress_handles_zero_and_rounds() {
        assert_eq!(progress_percent(&summary(0, 0)), 0);
        assert_eq!(progress_percent(&summary(1, 3)), 33);
        assert_eq!(progress_percent(&summary(2, 3)), 67);
        assert_eq!(progress_percent(&summary(3, 3)), 100);
    }

    #[test]
    fn next_session_prefers_in_progress_then_pending() {
        let tasks = vec![task("a", "done"), task("b", "pending"), task("c", "in_progress")];
        assert_eq!(next_session(&tasks).map(|t| t.id.as_str()), Some("c"));

        let tasks = vec![task("a", "done"), task("b", "pending")];
        assert_eq!(next_session(&tasks).map(|t| t.id.as_str()), Some("b"));

        let tasks = vec![task("a", "done"), task("b", "done")];
        assert_eq!(next_session(&tasks).map(|t| t.id.as_str()), Some("a"));

        assert!(next_session(&[]).is_none());
        assert!(!has_weekly_planner(&[]));
    }

    #[test]
    fn focus_minutes_sum_subject_slices() {
        let mut s = summary(0, 0);
        assert_eq!(total_focus_minutes(&s), 0);
        s.subject_distribution = vec![
            SubjectSlice {
                subject: "Math".into(),
                minutes: 90,
                color: "#38BDF8",
            },
            SubjectSlice {
                subject: "Biology".into(),
                minutes: 45,
                color: "#2DD4BF",
            },
        ];
        assert_eq!(total_focus_minutes(&s), 135);
    }
}
