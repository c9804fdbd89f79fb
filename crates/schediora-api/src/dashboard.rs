// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard summary endpoint.

use schediora_core::types::{SubjectSlice, TrendPoint};
use schediora_core::{ChartRange, DashboardSummary, SchedioraError};
use serde::Deserialize;

use crate::client::{ApiClient, RequestOptions};

/// Colours assigned to subject slices, cycled by position.
pub const CHART_PALETTE: [&str; 5] = ["#38BDF8", "#2DD4BF", "#FDBA74", "#A78BFA", "#FB7185"];

#[derive(Debug, Deserialize)]
struct SummaryWire {
    today_completed: u32,
    today_total: u32,
    streak_days: u32,
    #[serde(default)]
    weekly_progress: Vec<u32>,
    #[serde(default)]
    focus_minutes_trend: Vec<TrendPoint>,
    #[serde(default)]
    subject_distribution: Vec<SubjectWire>,
}

#[derive(Debug, Deserialize)]
struct SubjectWire {
    subject: String,
    minutes: u32,
}

impl From<SummaryWire> for DashboardSummary {
    fn from(wire: SummaryWire) -> Self {
        let subject_distribution = wire
            .subject_distribution
            .into_iter()
            .zip(CHART_PALETTE.iter().copied().cycle())
            .map(|(item, color)| SubjectSlice {
                subject: item.subject,
                minutes: item.minutes,
                color,
            })
            .collect();

        DashboardSummary {
            today_completed: wire.today_completed,
            today_total: wire.today_total,
            streak_days: wire.streak_days,
            weekly_progress: wire.weekly_progress,
            focus_minutes_trend: wire.focus_minutes_trend,
            subject_distribution,
        }
    }
}

impl ApiClient {
    /// `GET /dashboard/summary?range={7d|30d}`
    pub async fn dashboard_summary(
        &self,
        access_token: &str,
        range: ChartRange,
    ) -> Result<DashboardSummary, SchedioraError> {
        let wire: SummaryWire = self
            .request(
                &format!("/dashboard/summary?range={range}"),
                RequestOptions::get().bearer(access_token),
            )
            .await?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schediora_config::model::ApiConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn summary_assigns_palette_colours_cyclically() {
        let server = MockServer::start().await;
        let subjects: Vec<_> = ["Math", "Biology", "Chemistry", "English", "Physics", "History"]
            .iter()
            .map(|s| serde_json::json!({"subject": s, "minutes": 30}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/dashboard/summary"))
            .and(query_param("range", "30d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "today_completed": 2,
                "today_total": 3,
                "streak_days": 4,
                "weekly_progress": [1, 2, 3, 0, 0, 0, 0],
                "focus_minutes_trend": [{"label": "Mon", "minutes": 50}],
                "subject_distribution": subjects,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: server.uri(),
            request_timeout_ms: 1000,
        })
        .unwrap();
        let summary = client.dashboard_summary("a1", ChartRange::Month).await.unwrap();

        assert_eq!(summary.today_completed, 2);
        assert_eq!(summary.weekly_progress.len(), 7);
        assert_eq!(summary.focus_minutes_trend[0].label, "Mon");
        assert_eq!(summary.subject_distribution[0].color, "#38BDF8");
        assert_eq!(summary.subject_distribution[4].color, "#FB7185");
        assert_eq!(summary.subject_distribution[5].color, "#38BDF8");
    }
}
