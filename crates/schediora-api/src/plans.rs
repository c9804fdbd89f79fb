// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Study task ("session") and plan endpoints.

use schediora_core::{NewTask, SchedioraError, StudyTask, TaskStatus};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, RequestOptions};

/// Plan created by `POST /plans`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlan {
    pub id: String,
    pub title: String,
}

/// Task appended by `POST /plans/current/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    pub id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: TaskStatus,
}

impl ApiClient {
    /// `GET /sessions?week=current`: tasks of the current week's plan.
    pub async fn study_tasks(&self, access_token: &str) -> Result<Vec<StudyTask>, SchedioraError> {
        self.request("/sessions?week=current", RequestOptions::get().bearer(access_token))
            .await
    }

    /// `PATCH /sessions/{id}`
    pub async fn update_task_status(
        &self,
        access_token: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), SchedioraError> {
        let _: IgnoredAny = self
            .request(
                &format!("/sessions/{task_id}"),
                RequestOptions::patch()
                    .bearer(access_token)
                    .json(&StatusUpdate { status }),
            )
            .await?;
        Ok(())
    }

    /// `POST /plans`: creates this week's plan with its first task.
    pub async fn create_plan(
        &self,
        access_token: &str,
        task: &NewTask,
    ) -> Result<CreatedPlan, SchedioraError> {
        self.request("/plans", RequestOptions::post().bearer(access_token).json(task))
            .await
    }

    /// `POST /plans/current/sessions`: appends a task to the current plan.
    pub async fn add_task_to_current_plan(
        &self,
        access_token: &str,
        task: &NewTask,
    ) -> Result<CreatedTask, SchedioraError> {
        self.request(
            "/plans/current/sessions",
            RequestOptions::post().bearer(access_token).json(task),
        )
        .await
    }
}
