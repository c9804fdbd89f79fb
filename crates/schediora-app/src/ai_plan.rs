// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI weekly-plan generation: queue a job, then poll it to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use schediora_api::ApiClient;
use schediora_config::model::PollingConfig;
use schediora_core::{AiJob, JobStatus, OnboardingDraft, SchedioraError, StudyTask};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::query::{QueryClient, QueryKey};

/// Observable progress of the generation flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiPlanState {
    pub loading: bool,
    pub status: Option<JobStatus>,
    pub error: Option<String>,
}

/// Result of [`AiPlanFlow::generate`].
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The job completed; dependent queries were invalidated.
    Completed(AiJob),
    /// Another generation was already in progress; nothing was sent.
    AlreadyRunning,
}

/// Drives AI plan generation and publishes its progress.
pub struct AiPlanFlow {
    api: ApiClient,
    queries: QueryClient,
    poll_interval: Duration,
    max_attempts: u32,
    running: AtomicBool,
    state: watch::Sender<AiPlanState>,
}

/// Clears the running flag and the published `loading` on every exit path.
struct RunningGuard<'a> {
    running: &'a AtomicBool,
    state: &'a watch::Sender<AiPlanState>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
        self.running.store(false, Ordering::SeqCst);
    }
}

impl AiPlanFlow {
    pub fn new(api: ApiClient, queries: QueryClient, polling: &PollingConfig) -> Self {
        let (state, _) = watch::channel(AiPlanState::default());
        Self {
            api,
            queries,
            poll_interval: polling.ai_poll_interval(),
            max_attempts: polling.ai_max_poll_attempts,
            running: AtomicBool::new(false),
            state,
        }
    }

    pub fn state(&self) -> AiPlanState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AiPlanState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Generates this week's plan from the onboarding draft.
    ///
    /// Refuses when there is no access token or the week already has tasks.
    /// The goal comes from the draft and the topic is its first focus topic.
    /// A second call while one is in flight returns
    /// [`GenerationOutcome::AlreadyRunning`] without touching the backend.
    pub async fn generate(
        &self,
        access_token: Option<&str>,
        draft: &OnboardingDraft,
        current_tasks: &[StudyTask],
        cancel: Option<&CancellationToken>,
    ) -> Result<GenerationOutcome, SchedioraError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("AI generation already running");
            return Ok(GenerationOutcome::AlreadyRunning);
        }
        let _guard = RunningGuard {
            running: &self.running,
            state: &self.state,
        };
        self.state.send_replace(AiPlanState {
            loading: true,
            status: None,
            error: None,
        });

        let result = self
            .run(access_token, draft, current_tasks, cancel)
            .await;
        match &result {
            Ok(job) => {
                info!(job_id = %job.job_id, "AI plan generated");
            }
            Err(e) => {
                warn!(error = %e, "AI plan generation failed");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
            }
        }
        result.map(GenerationOutcome::Completed)
    }

    async fn run(
        &self,
        access_token: Option<&str>,
        draft: &OnboardingDraft,
        current_tasks: &[StudyTask],
        cancel: Option<&CancellationToken>,
    ) -> Result<AiJob, SchedioraError> {
        let token = access_token.ok_or(SchedioraError::NotAuthenticated)?;
        if !current_tasks.is_empty() {
            return Err(SchedioraError::PlanAlreadyExists);
        }

        let queued = self
            .api
            .generate_plan(token, &draft.goal, draft.primary_topic())
            .await?;
        self.publish_status(&queued.status);
        let job_id = queued.job_id;
        debug!(%job_id, goal = %draft.goal, topic = draft.primary_topic(), "AI job queued");

        for attempt in 1..=self.max_attempts {
            self.pause(cancel).await?;
            let job = self.api.ai_job(token, &job_id).await?;
            debug!(%job_id, attempt, status = %job.status, "AI job polled");
            self.publish_status(&job.status);

            match job.status {
                JobStatus::Completed => {
                    self.queries.invalidate(QueryKey::StudySessions);
                    self.queries.invalidate(QueryKey::DashboardSummary(None));
                    self.queries.invalidate(QueryKey::AiWeeklyStatus);
                    return Ok(job);
                }
                JobStatus::Failed => return Err(SchedioraError::JobFailed { job_id }),
                _ => {}
            }
        }

        Err(SchedioraError::JobTimeout {
            job_id,
            attempts: self.max_attempts,
        })
    }

    async fn pause(&self, cancel: Option<&CancellationToken>) -> Result<(), SchedioraError> {
        match cancel {
            Some(cancel) => tokio::select! {
                _ = cancel.cancelled() => Err(SchedioraError::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => Ok(()),
            },
            None => {
                tokio::time::sleep(self.poll_interval).await;
                Ok(())
            }
        }
    }

    fn publish_status(&self, status: &JobStatus) {
        let status = status.clone();
        self.state.send_modify(|s| s.status = Some(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schediora_test_utils::mock_backend::*;
    use schediora_test_utils::TestHarness;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn flow(harness: &TestHarness, queries: &QueryClient) -> AiPlanFlow {
        AiPlanFlow::new(harness.api.clone(), queries.clone(), &harness.config.polling)
    }

    fn task() -> StudyTask {
        serde_json::from_value(task_json("s1", Some("p1"), "pending", 45)).unwrap()
    }

    #[tokio::test]
    async fn completes_after_running_polls_and_invalidates() {
        let harness = TestHarness::builder().build().await.unwrap();
        Mock::given(method("POST"))
            .and(path("/ai/plans/generate"))
            .and(body_json(serde_json::json!({"goal": "Semester Exam", "topic": "Math"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(job_json("j1", "queued")))
            .expect(1)
            .mount(&harness.server)
            .await;
        mount_job_statuses(&harness.server, "j1", &["running", "running", "running", "completed"])
            .await;
        let queries = QueryClient::new(&harness.config.polling);
        let mut invalidations = queries.subscribe_invalidations();
        let flow = flow(&harness, &queries);

        let outcome = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[], None)
            .await
            .unwrap();

        let GenerationOutcome::Completed(job) = outcome else {
            panic!("expected a completed job");
        };
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(harness.request_count("/ai/jobs/j1").await, 4);

        let mut seen = Vec::new();
        while let Ok(key) = invalidations.try_recv() {
            seen.push(key);
        }
        assert_eq!(
            seen,
            [
                QueryKey::StudySessions,
                QueryKey::DashboardSummary(None),
                QueryKey::AiWeeklyStatus
            ]
        );

        let state = flow.state();
        assert!(!state.loading);
        assert_eq!(state.status, Some(JobStatus::Completed));
        assert!(state.error.is_none());
        assert!(!flow.is_running());
    }

    #[tokio::test]
    async fn stuck_queue_times_out_without_invalidations() {
        let harness = TestHarness::builder().build().await.unwrap();
        mount_generate(&harness.server, "j2").await;
        mount_job_statuses(&harness.server, "j2", &["queued"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let mut invalidations = queries.subscribe_invalidations();
        let flow = flow(&harness, &queries);

        let err = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[], None)
            .await
            .unwrap_err();

        assert!(matches!(err, SchedioraError::JobTimeout { attempts: 45, .. }));
        assert_eq!(harness.request_count("/ai/jobs/j2").await, 45);
        assert!(invalidations.try_recv().is_err());
        let state = flow.state();
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("AI job timeout. Please retry and verify worker/Ollama are running.")
        );
    }

    #[tokio::test]
    async fn configured_attempt_budget_bounds_polling() {
        let harness = TestHarness::builder().with_poll_attempts(3).build().await.unwrap();
        mount_generate(&harness.server, "j4").await;
        mount_job_statuses(&harness.server, "j4", &["running"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let flow = flow(&harness, &queries);

        let err = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[], None)
            .await
            .unwrap_err();

        assert!(matches!(err, SchedioraError::JobTimeout { attempts: 3, .. }));
        assert_eq!(harness.request_count("/ai/jobs/j4").await, 3);
        assert_eq!(flow.state().status, Some(JobStatus::Running));
    }

    #[tokio::test]
    async fn failed_job_reports_worker_error() {
        let harness = TestHarness::builder().build().await.unwrap();
        mount_generate(&harness.server, "j3").await;
        mount_job_statuses(&harness.server, "j3", &["running", "failed"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let flow = flow(&harness, &queries);

        let err = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AI generation failed. Check worker/backend logs.");
        assert_eq!(flow.state().status, Some(JobStatus::Failed));
    }

    #[tokio::test]
    async fn refuses_without_token_or_with_existing_tasks() {
        let harness = TestHarness::builder().build().await.unwrap();
        let queries = QueryClient::new(&harness.config.polling);
        let flow = flow(&harness, &queries);

        let err = flow
            .generate(None, &OnboardingDraft::default(), &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Session is invalid. Please sign in again.");

        let err = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[task()], None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Weekly planner already set. You can generate a new AI plan next week."
        );
        assert_eq!(harness.total_requests().await, 0);
    }

    #[tokio::test]
    async fn empty_focus_topics_fall_back_to_biology() {
        let harness = TestHarness::builder().build().await.unwrap();
        Mock::given(method("POST"))
            .and(path("/ai/plans/generate"))
            .and(body_json(serde_json::json!({"goal": "UTBK", "topic": "Biology"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(job_json("j4", "queued")))
            .expect(1)
            .mount(&harness.server)
            .await;
        mount_job_statuses(&harness.server, "j4", &["completed"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let flow = flow(&harness, &queries);
        let draft = OnboardingDraft::new("UTBK", 3, schediora_core::FocusTopics::from_topics(Vec::<String>::new()));

        flow.generate(Some("a1"), &draft, &[], None).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_call_is_a_no_op() {
        let harness = TestHarness::builder().build().await.unwrap();
        mount_generate(&harness.server, "j5").await;
        mount_job_statuses(&harness.server, "j5", &["running", "running", "completed"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let flow = Arc::new(flow(&harness, &queries));
        let draft = OnboardingDraft::default();

        let (first, second) = tokio::join!(
            flow.generate(Some("a1"), &draft, &[], None),
            async {
                // Let the first call claim the flag.
                tokio::task::yield_now().await;
                flow.generate(Some("a1"), &draft, &[], None).await
            }
        );

        assert!(matches!(first.unwrap(), GenerationOutcome::Completed(_)));
        assert_eq!(second.unwrap(), GenerationOutcome::AlreadyRunning);
        assert_eq!(harness.request_count("/ai/plans/generate").await, 1);
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let harness = TestHarness::builder().build().await.unwrap();
        mount_generate(&harness.server, "j6").await;
        mount_job_statuses(&harness.server, "j6", &["running"]).await;
        let queries = QueryClient::new(&harness.config.polling);
        let flow = flow(&harness, &queries);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = flow
            .generate(Some("a1"), &OnboardingDraft::default(), &[], Some(&cancel))
            .await
            .unwrap_err();

        assert!(matches!(err, SchedioraError::Cancelled));
        assert_eq!(harness.request_count("/ai/jobs/j6").await, 0);
        assert!(!flow.is_running());
    }
}
