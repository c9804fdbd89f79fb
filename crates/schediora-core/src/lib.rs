// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Schediora client.
//!
//! This crate provides the error type, the domain types exchanged with the
//! study-planning backend, and the storage trait implemented by
//! `schediora-storage`.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SchedioraError;
pub use traits::TokenStore;
pub use types::{
    AiJob, ChartRange, DashboardSummary, FocusTopics, JobStatus, NewTask, OnboardingDraft,
    StoredTokens, StudyTask, TaskStatus, TokenPair, UserProfile, WeeklyAiStatus,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{display_name_from_email, mask_secret, DEFAULT_USER_NAME};

    #[test]
    fn unknown_task_status_coerces_to_pending() {
        assert_eq!(TaskStatus::coerce("in_progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::coerce("done"), TaskStatus::Done);
        assert_eq!(TaskStatus::coerce("archived"), TaskStatus::Pending);
        assert_eq!(TaskStatus::coerce(""), TaskStatus::Pending);
    }

    #[test]
    fn study_task_deserializes_with_unknown_status() {
        let json = serde_json::json!({
            "id": "s1",
            "plan_id": null,
            "title": "Limits",
            "topic": "Math",
            "duration_minutes": 45,
            "status": "skipped"
        });
        let task: StudyTask = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.plan_id.is_none());
        assert!(task.scheduled_at.is_none());
    }

    #[test]
    fn task_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn job_status_keeps_unknown_values() {
        let job: AiJob = serde_json::from_value(serde_json::json!({
            "job_id": "j1",
            "status": "retrying"
        }))
        .unwrap();
        assert_eq!(job.status, JobStatus::Other("retrying".into()));
        assert!(!job.status.is_terminal());
        assert_eq!(job.status.to_string(), "retrying");

        let json = serde_json::to_value(&job.status).unwrap();
        assert_eq!(json, serde_json::json!("retrying"));
    }

    #[test]
    fn job_status_terminal_states() {
        assert!(JobStatus::from("completed".to_string()).is_terminal());
        assert!(JobStatus::from("failed".to_string()).is_terminal());
        assert!(!JobStatus::from("queued".to_string()).is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn chart_range_round_trips_through_strings() {
        use std::str::FromStr;

        assert_eq!(ChartRange::Week.to_string(), "7d");
        assert_eq!(ChartRange::Month.to_string(), "30d");
        assert_eq!(ChartRange::from_str("30d").unwrap(), ChartRange::Month);
        assert!(ChartRange::from_str("90d").is_err());
    }

    #[test]
    fn display_name_capitalizes_local_part() {
        assert_eq!(display_name_from_email("budi@example.com"), "Budi");
        assert_eq!(display_name_from_email("sari.dewi@kampus.ac.id"), "Sari.dewi");
        assert_eq!(display_name_from_email("@example.com"), DEFAULT_USER_NAME);
        assert_eq!(display_name_from_email("ömer@example.com"), "Ömer");
    }

    #[test]
    fn stored_tokens_require_both_halves() {
        let partial = StoredTokens {
            access_token: Some("access".into()),
            refresh_token: None,
        };
        assert!(partial.into_pair().is_none());

        let full = StoredTokens {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
        };
        assert_eq!(full.into_pair(), Some(TokenPair::new("access", "refresh")));
    }

    #[test]
    fn token_pair_debug_is_masked() {
        let pair = TokenPair::new("eyJhbGciOiJIUzI1NiJ9.payload", "short");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("payload"), "got: {debug}");
        assert!(debug.contains("eyJh..."));
        assert!(debug.contains("****"));
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn focus_topics_toggle_respects_limit() {
        let mut topics = FocusTopics::from_topics(["Math", "Biology"]);
        topics.toggle("Physics");
        assert_eq!(topics.as_slice(), ["Math", "Biology", "Physics"]);

        // A fourth topic falls off the end.
        topics.toggle("English");
        assert_eq!(topics.len(), 3);
        assert!(!topics.contains("English"));

        topics.toggle("Math");
        assert_eq!(topics.as_slice(), ["Biology", "Physics"]);
    }

    #[test]
    fn onboarding_draft_defaults_and_clamping() {
        let draft = OnboardingDraft::default();
        assert_eq!(draft.goal, "Semester Exam");
        assert_eq!(draft.daily_hours, 2);
        assert_eq!(draft.primary_topic(), "Math");

        let clamped = OnboardingDraft::new("UTBK", 12, FocusTopics::from_topics(Vec::<String>::new()));
        assert_eq!(clamped.daily_hours, 8);
        assert_eq!(clamped.primary_topic(), "Biology");

        let low = OnboardingDraft::new("UTBK", 0, FocusTopics::from_topics(["Math"]));
        assert_eq!(low.daily_hours, 1);
    }

    #[test]
    fn error_messages_are_user_facing() {
        let api = SchedioraError::Api {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(api.to_string(), "Invalid credentials");
        assert_eq!(api.status(), Some(401));
        assert_eq!(
            SchedioraError::NotAuthenticated.to_string(),
            "Session is invalid. Please sign in again."
        );
        assert!(SchedioraError::Validation("x".into()).status().is_none());
    }

    proptest::proptest! {
        #[test]
        fn coerce_never_panics(raw in ".*") {
            let status = TaskStatus::coerce(&raw);
            if !matches!(raw.as_str(), "in_progress" | "done") {
                proptest::prop_assert_eq!(status, TaskStatus::Pending);
            }
        }
    }
}
