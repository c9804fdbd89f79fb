// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route helpers for the mock Schediora backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Replies with each template in turn, repeating the last one forever.
pub struct SequenceResponder {
    responses: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl SequenceResponder {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        Self {
            responses,
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(index).or_else(|| self.responses.last()) {
            Some(template) => template.clone(),
            None => ResponseTemplate::new(500),
        }
    }
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({"access_token": access, "refresh_token": refresh, "token_type": "bearer"})
}

pub fn task_json(id: &str, plan_id: Option<&str>, status: &str, duration: u32) -> Value {
    json!({
        "id": id,
        "plan_id": plan_id,
        "title": format!("Task {id}"),
        "topic": "Math",
        "duration_minutes": duration,
        "status": status,
        "scheduled_at": null,
    })
}

pub fn job_json(job_id: &str, status: &str) -> Value {
    json!({"job_id": job_id, "status": status, "result": null, "result_structured": null})
}

/// `GET /users/me` succeeds for `access_token`.
pub async fn mount_me(server: &MockServer, access_token: &str, email: &str) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "email": email})))
        .mount(server)
        .await;
}

/// `GET /users/me` fails with 401 for `access_token`.
pub async fn mount_me_unauthorized(server: &MockServer, access_token: &str) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid access token"})),
        )
        .mount(server)
        .await;
}

/// `POST /auth/refresh` rotates `refresh_token` into a new pair.
pub async fn mount_refresh(server: &MockServer, refresh_token: &str, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": refresh_token})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .mount(server)
        .await;
}

/// `POST /auth/refresh` rejects every refresh token.
pub async fn mount_refresh_rejected(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid refresh token"})),
        )
        .mount(server)
        .await;
}

/// `POST {route}` (login or register) answers with a token pair.
pub async fn mount_auth_success(server: &MockServer, route: &str, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .mount(server)
        .await;
}

/// `POST {route}` fails with `status` and `{"detail": detail}`.
pub async fn mount_auth_failure(server: &MockServer, route: &str, status: u16, detail: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"detail": detail})))
        .mount(server)
        .await;
}

/// `POST /auth/logout` acknowledges.
pub async fn mount_logout(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})))
        .mount(server)
        .await;
}

/// `GET /sessions?week=current` returns `tasks`.
pub async fn mount_tasks(server: &MockServer, tasks: Value) {
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(server)
        .await;
}

/// `POST /ai/plans/generate` queues `job_id`.
pub async fn mount_generate(server: &MockServer, job_id: &str) {
    Mock::given(method("POST"))
        .and(path("/ai/plans/generate"))
        .respond_with(ResponseTemplate::new(202).set_body_json(job_json(job_id, "queued")))
        .mount(server)
        .await;
}

/// `GET /ai/jobs/{job_id}` walks through `statuses`, repeating the last one.
pub async fn mount_job_statuses(server: &MockServer, job_id: &str, statuses: &[&str]) {
    let responses = statuses
        .iter()
        .map(|status| ResponseTemplate::new(200).set_body_json(job_json(job_id, status)))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/ai/jobs/{job_id}")))
        .respond_with(SequenceResponder::new(responses))
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_responder_repeats_last_template() {
        let server = MockServer::start().await;
        mount_job_statuses(&server, "j1", &["running", "completed"]).await;

        let url = format!("{}/ai/jobs/j1", server.uri());
        let mut seen = Vec::new();
        for _ in 0..3 {
            let body: Value = fetch_json(&url).await;
            seen.push(body["status"].as_str().unwrap_or_default().to_string());
        }
        assert_eq!(seen, ["running", "completed", "completed"]);
    }

    async fn fetch_json(url: &str) -> Value {
        let config = schediora_config::model::ApiConfig {
            base_url: url.to_string(),
            request_timeout_ms: 1_000,
        };
        let client = schediora_api::ApiClient::new(&config).unwrap();
        client
            .request("", schediora_api::RequestOptions::get())
            .await
            .unwrap()
    }
}
