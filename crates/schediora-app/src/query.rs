// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background data-fetch queries with periodic refetch and invalidation.
//!
//! A [`PolledQuery`] fetches immediately, then again every refetch interval
//! or as soon as a matching [`QueryKey`] is invalidated through the shared
//! [`QueryClient`]. Previously fetched data stays visible while a refetch is
//! in flight and after a failed one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use schediora_api::ApiClient;
use schediora_config::model::PollingConfig;
use schediora_core::{ChartRange, DashboardSummary, SchedioraError, StudyTask, WeeklyAiStatus};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const INVALIDATION_CAPACITY: usize = 64;

/// Identifies a cached query, or a pattern of queries to invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    StudySessions,
    /// `None` matches the summary for every range.
    DashboardSummary(Option<ChartRange>),
    AiWeeklyStatus,
}

impl QueryKey {
    /// Returns true if invalidating `self` should refetch the query keyed `key`.
    pub fn matches(&self, key: &QueryKey) -> bool {
        match (self, key) {
            (QueryKey::DashboardSummary(None), QueryKey::DashboardSummary(_)) => true,
            (pattern, key) => pattern == key,
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::StudySessions => write!(f, "study-sessions"),
            QueryKey::DashboardSummary(Some(range)) => write!(f, "dashboard-summary/{range}"),
            QueryKey::DashboardSummary(None) => write!(f, "dashboard-summary"),
            QueryKey::AiWeeklyStatus => write!(f, "ai-weekly-status"),
        }
    }
}

/// Observable state of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_fetching: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            updated_at: None,
        }
    }
}

impl<T> QueryState<T> {
    /// True until the first successful fetch.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

type Fetcher<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<T, SchedioraError>> + Send + Sync>;

/// Shared invalidation bus and refetch policy.
#[derive(Clone)]
pub struct QueryClient {
    invalidations: broadcast::Sender<QueryKey>,
    refetch_interval: Duration,
    retries: u32,
}

impl QueryClient {
    pub fn new(polling: &PollingConfig) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            invalidations,
            refetch_interval: polling.refetch_interval(),
            retries: polling.query_retries,
        }
    }

    /// Marks every query matching `key` stale, triggering an immediate refetch.
    pub fn invalidate(&self, key: QueryKey) {
        // Err only means no query is currently running.
        let listeners = self.invalidations.send(key).unwrap_or(0);
        debug!(%key, listeners, "query invalidated");
    }

    pub fn subscribe_invalidations(&self) -> broadcast::Receiver<QueryKey> {
        self.invalidations.subscribe()
    }

    /// Starts a polled query. Without a token the query is disabled and
    /// its state stays empty.
    pub fn spawn<T, F>(&self, key: QueryKey, token: Option<&str>, fetch: F) -> PolledQuery<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(String) -> BoxFuture<'static, Result<T, SchedioraError>> + Send + Sync + 'static,
    {
        let (state_tx, state_rx) = watch::channel(QueryState::default());
        let cancel = CancellationToken::new();

        let task = token.map(|token| {
            let worker = QueryWorker {
                key,
                token: token.to_string(),
                fetch: Arc::new(fetch) as Fetcher<T>,
                state: state_tx,
                invalidations: self.invalidations.subscribe(),
                refetch_interval: self.refetch_interval,
                retries: self.retries,
                cancel: cancel.clone(),
            };
            tokio::spawn(worker.run())
        });
        if task.is_none() {
            debug!(%key, "query disabled: no access token");
        }

        PolledQuery {
            key,
            state: state_rx,
            cancel,
            task,
        }
    }

    /// `GET /sessions?week=current`, keyed [`QueryKey::StudySessions`].
    pub fn study_sessions(&self, api: &ApiClient, token: Option<&str>) -> PolledQuery<Vec<StudyTask>> {
        let api = api.clone();
        self.spawn(QueryKey::StudySessions, token, move |token| {
            let api = api.clone();
            Box::pin(async move { api.study_tasks(&token).await })
        })
    }

    /// `GET /dashboard/summary`, keyed by range.
    pub fn dashboard_summary(
        &self,
        api: &ApiClient,
        token: Option<&str>,
        range: ChartRange,
    ) -> PolledQuery<DashboardSummary> {
        let api = api.clone();
        self.spawn(QueryKey::DashboardSummary(Some(range)), token, move |token| {
            let api = api.clone();
            Box::pin(async move { api.dashboard_summary(&token, range).await })
        })
    }

    /// `GET /ai/plans/status/weekly`, keyed [`QueryKey::AiWeeklyStatus`].
    pub fn weekly_ai_status(&self, api: &ApiClient, token: Option<&str>) -> PolledQuery<WeeklyAiStatus> {
        let api = api.clone();
        self.spawn(QueryKey::AiWeeklyStatus, token, move |token| {
            let api = api.clone();
            Box::pin(async move { api.weekly_ai_status(&token).await })
        })
    }
}

/// Handle to a running query. Dropping it stops the background task.
pub struct PolledQuery<T> {
    key: QueryKey,
    state: watch::Receiver<QueryState<T>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> PolledQuery<T> {
    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.task.is_some()
    }

    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn watch(&self) -> watch::Receiver<QueryState<T>> {
        self.state.clone()
    }

    /// Stops refetching. The last state stays readable.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for PolledQuery<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct QueryWorker<T> {
    key: QueryKey,
    token: String,
    fetch: Fetcher<T>,
    state: watch::Sender<QueryState<T>>,
    invalidations: broadcast::Receiver<QueryKey>,
    refetch_interval: Duration,
    retries: u32,
    cancel: CancellationToken,
}

impl<T: Send + Sync + 'static> QueryWorker<T> {
    async fn run(mut self) {
        loop {
            self.state.send_modify(|s| s.is_fetching = true);

            let result = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.fetch_with_retry() => result,
            };

            self.state.send_modify(|s| {
                s.is_fetching = false;
                match result {
                    Ok(data) => {
                        s.data = Some(data);
                        s.error = None;
                        s.updated_at = Some(Utc::now());
                    }
                    Err(e) => {
                        warn!(key = %self.key, error = %e, "query fetch failed");
                        s.error = Some(e.to_string());
                    }
                }
            });

            if !self.wait_for_refetch().await {
                break;
            }
        }
        debug!(key = %self.key, "query stopped");
    }

    async fn fetch_with_retry(&self) -> Result<T, SchedioraError> {
        let mut attempt = 0;
        loop {
            match (self.fetch)(self.token.clone()).await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    debug!(key = %self.key, attempt, error = %e, "retrying query fetch");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Waits for the interval or a matching invalidation. Returns false once cancelled.
    async fn wait_for_refetch(&mut self) -> bool {
        let sleep = tokio::time::sleep(self.refetch_interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = &mut sleep => return true,
                received = self.invalidations.recv() => match received {
                    Ok(pattern) if pattern.matches(&self.key) => {
                        debug!(key = %self.key, "refetching after invalidation");
                        return true;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(key = %self.key, skipped, "invalidations lagged, refetching");
                        return true;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return tokio::select! {
                            _ = self.cancel.cancelled() => false,
                            _ = &mut sleep => true,
                        };
                    }
                },
            }
        }
    }
}
