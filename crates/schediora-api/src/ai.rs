// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI plan generation endpoints.

use schediora_core::{AiJob, SchedioraError, WeeklyAiStatus};
use serde::Serialize;

use crate::client::{ApiClient, RequestOptions};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    goal: &'a str,
    topic: &'a str,
}

impl ApiClient {
    /// `POST /ai/plans/generate`: queues a generation job.
    pub async fn generate_plan(
        &self,
        access_token: &str,
        goal: &str,
        topic: &str,
    ) -> Result<AiJob, SchedioraError> {
        self.request(
            "/ai/plans/generate",
            RequestOptions::post()
                .bearer(access_token)
                .json(&GenerateRequest { goal, topic }),
        )
        .await
    }

    /// `GET /ai/jobs/{id}`
    pub async fn ai_job(&self, access_token: &str, job_id: &str) -> Result<AiJob, SchedioraError> {
        self.request(
            &format!("/ai/jobs/{job_id}"),
            RequestOptions::get().bearer(access_token),
        )
        .await
    }

    /// `GET /ai/plans/status/weekly`
    pub async fn weekly_ai_status(&self, access_token: &str) -> Result<WeeklyAiStatus, SchedioraError> {
        self.request(
            "/ai/plans/status/weekly",
            RequestOptions::get().bearer(access_token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schediora_config::model::ApiConfig;
    use schediora_core::JobStatus;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_then_read_completed_job() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai/plans/generate"))
            .and(body_json(serde_json::json!({"goal": "UTBK", "topic": "Math"})))
            .respond_with(
                ResponseTemplate::new(202)
                    .set_body_json(serde_json::json!({"job_id": "j1", "status": "queued"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ai/jobs/j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "job_id": "j1",
                "status": "completed",
                "result": "Plan ready",
                "result_structured": {
                    "title": "UTBK Math sprint",
                    "summary": "Five sessions",
                    "steps": [{"title": "Algebra review"}, {"title": "Mock test", "detail": "90 minutes"}]
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: server.uri(),
            request_timeout_ms: 1000,
        })
        .unwrap();

        let queued = client.generate_plan("a1", "UTBK", "Math").await.unwrap();
        assert_eq!(queued.status, JobStatus::Queued);

        let job = client.ai_job("a1", &queued.job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let plan = job.result_structured.unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].detail.as_deref(), Some("90 minutes"));
    }

    #[tokio::test]
    async fn weekly_status_reads_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ai/plans/status/weekly"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"has_generated_this_week": true})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: server.uri(),
            request_timeout_ms: 1000,
        })
        .unwrap();
        assert!(client.weekly_ai_status("a1").await.unwrap().has_generated_this_week);
    }
}
