// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the API, storage, and application crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Display name used before a user profile is known and after sign-out.
pub const DEFAULT_USER_NAME: &str = "Learner";

/// Study goals offered during onboarding.
pub const KNOWN_GOALS: [&str; 3] = ["Semester Exam", "UTBK", "Certification"];

/// Focus topics offered during onboarding.
pub const KNOWN_TOPICS: [&str; 5] = ["Math", "Biology", "Chemistry", "English", "Physics"];

/// Maximum number of focus topics in an onboarding draft.
pub const MAX_FOCUS_TOPICS: usize = 3;

/// Topic sent to the AI planner when the draft has no focus topics.
pub const FALLBACK_TOPIC: &str = "Biology";

// --- Credentials ---

/// An access/refresh token pair.
///
/// The two tokens only ever travel together, so a session can never hold
/// one without the other. Debug output masks both values.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &mask_secret(&self.access_token))
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .finish()
    }
}

/// Tokens as read back from storage. Either may be missing on a cold store.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    /// Returns the pair only when both tokens are present.
    pub fn into_pair(self) -> Option<TokenPair> {
        match (self.access_token, self.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(TokenPair::new(access, refresh))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredTokens")
            .field("access_token", &self.access_token.as_deref().map(mask_secret))
            .field("refresh_token", &self.refresh_token.as_deref().map(mask_secret))
            .finish()
    }
}

/// Mask a secret value for display: "eyJh...x9Qk" format.
///
/// Short values (< 10 chars) are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{prefix}...{suffix}")
}

/// The authenticated user's profile as returned by `/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
}

impl UserProfile {
    /// Display name derived from the email local part, first letter upper-cased.
    pub fn display_name(&self) -> String {
        display_name_from_email(&self.email)
    }
}

/// Derive a display name from an email address.
///
/// `"budi@example.com"` becomes `"Budi"`. An empty local part falls back to
/// [`DEFAULT_USER_NAME`].
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_USER_NAME.to_string(),
    }
}

// --- Onboarding ---

/// Ordered set of focus topics holding at most [`MAX_FOCUS_TOPICS`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusTopics(Vec<String>);

impl FocusTopics {
    /// Builds a topic set, dropping duplicates and anything past the limit.
    pub fn from_topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self(Vec::new());
        for topic in topics {
            let topic = topic.into();
            if !set.contains(&topic) {
                set.0.push(topic);
            }
        }
        set.0.truncate(MAX_FOCUS_TOPICS);
        set
    }

    /// Removes the topic if present, otherwise appends it.
    ///
    /// Appending to a full set is a no-op: the new topic falls off the end.
    pub fn toggle(&mut self, topic: &str) {
        if let Some(pos) = self.0.iter().position(|t| t == topic) {
            self.0.remove(pos);
        } else {
            self.0.push(topic.to_string());
            self.0.truncate(MAX_FOCUS_TOPICS);
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.0.iter().any(|t| t == topic)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Preferences collected during onboarding. Kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingDraft {
    pub goal: String,
    pub daily_hours: u8,
    pub focus_topics: FocusTopics,
}

impl OnboardingDraft {
    pub const MIN_DAILY_HOURS: u8 = 1;
    pub const MAX_DAILY_HOURS: u8 = 8;

    pub fn new(goal: impl Into<String>, daily_hours: u8, focus_topics: FocusTopics) -> Self {
        Self {
            goal: goal.into(),
            daily_hours: daily_hours.clamp(Self::MIN_DAILY_HOURS, Self::MAX_DAILY_HOURS),
            focus_topics,
        }
    }

    /// Topic used for AI plan generation.
    pub fn primary_topic(&self) -> &str {
        self.focus_topics.first().unwrap_or(FALLBACK_TOPIC)
    }
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self {
            goal: KNOWN_GOALS[0].to_string(),
            daily_hours: 2,
            focus_topics: FocusTopics::from_topics(["Math", "Biology"]),
        }
    }
}

// --- Study tasks ---

/// Status of a study task.
///
/// Deserialization never fails: any value the backend sends outside the
/// three known statuses is read as [`TaskStatus::Pending`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Coerce a raw status string, falling back to `Pending`.
    pub fn coerce(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        TaskStatus::coerce(&raw)
    }
}

/// A study task (backend "session") in the current week's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyTask {
    pub id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    pub title: String,
    pub topic: String,
    pub duration_minutes: u32,
    pub status: TaskStatus,
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

/// A validated manual task ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub topic: String,
    pub duration_minutes: u32,
}

// --- Dashboard ---

/// Time window for dashboard charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum ChartRange {
    #[default]
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    Week,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    Month,
}

/// One point of the focus-minutes trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub minutes: u32,
}

/// One slice of the subject distribution chart, with its assigned colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectSlice {
    pub subject: String,
    pub minutes: u32,
    pub color: &'static str,
}

/// Aggregated dashboard data for a chart range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub today_completed: u32,
    pub today_total: u32,
    pub streak_days: u32,
    pub weekly_progress: Vec<u32>,
    pub focus_minutes_trend: Vec<TrendPoint>,
    pub subject_distribution: Vec<SubjectSlice>,
}

// --- AI jobs ---

/// Status of a server-side AI generation job.
///
/// Unknown values are preserved verbatim in [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Returns true for `completed` and `failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a generated study plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Structured AI plan attached to a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// An AI generation job as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiJob {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub result_structured: Option<GeneratedPlan>,
}

/// Whether an AI plan was already generated this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAiStatus {
    pub has_generated_this_week: bool,
}
