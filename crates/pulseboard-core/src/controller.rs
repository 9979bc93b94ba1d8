// ── Controller ──
//
// Executes refresh plans against the backend and runs the periodic
// schedulers. It never touches `DashboardState`: every fetch result and
// every timer tick travels back to the UI loop over one unbounded channel,
// so all state mutation stays on that loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pulseboard_api::ApiClient;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::state::{FetchKind, FetchOutcome, FetchPayload, FetchRequest, RefreshPlan};

/// Which scheduler fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTick {
    Refresh,
    Health,
}

/// Everything the controller reports back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Fetched(FetchOutcome),
    Tick(ScheduleTick),
}

// ── Controller ───────────────────────────────────────────────────

/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: DashboardConfig,
    client: ApiClient,
    events: mpsc::UnboundedSender<ControllerEvent>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Build a controller and the receiving end of its event channel.
    pub fn new(
        config: DashboardConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ControllerEvent>), CoreError> {
        let client = ApiClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a controller around an existing client.
    pub fn with_client(
        config: DashboardConfig,
        client: ApiClient,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                events,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        };
        (controller, rx)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Spawn one task per request. Each delivers a `ControllerEvent::Fetched`
    /// when it completes; siblings never wait on each other.
    pub fn execute(&self, plan: RefreshPlan) {
        for request in plan {
            let client = self.inner.client.clone();
            let events = self.inner.events.clone();
            let cancel = self.inner.cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    outcome = fetch(&client, request) => {
                        let _ = events.send(ControllerEvent::Fetched(outcome));
                    }
                }
            });
        }
    }

    /// Start the periodic refresh and health schedulers. An interval of
    /// zero disables that scheduler.
    pub async fn start_schedulers(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        let config = &self.inner.config;

        for (tick, secs) in [
            (ScheduleTick::Refresh, config.refresh_interval_secs),
            (ScheduleTick::Health, config.health_interval_secs),
        ] {
            if secs == 0 {
                debug!(?tick, "scheduler disabled");
                continue;
            }
            handles.push(tokio::spawn(schedule_task(
                tick,
                Duration::from_secs(secs),
                self.inner.events.clone(),
                self.inner.cancel.clone(),
            )));
        }
    }

    /// Cancel schedulers and in-flight fetches, then wait for the
    /// schedulers to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handles: Vec<_> = std::mem::take(&mut *self.inner.task_handles.lock().await);
        for handle in handles {
            let _ = handle.await;
        }
        info!("controller stopped");
    }
}

/// Run one request against the backend.
pub async fn fetch(client: &ApiClient, request: FetchRequest) -> FetchOutcome {
    let result = match &request.kind {
        FetchKind::Summary { days } => client
            .metrics_summary(*days)
            .await
            .map(FetchPayload::Summary),
        FetchKind::Metrics(query) => client.list_metrics(query).await.map(FetchPayload::Metrics),
        FetchKind::Notifications(query) => client
            .list_notifications(query)
            .await
            .map(FetchPayload::Notifications),
        FetchKind::Charts(query) => client
            .list_metrics(query)
            .await
            .map(|page| FetchPayload::Charts(page.data)),
        FetchKind::Health => client.health().await.map(FetchPayload::Health),
    }
    .map_err(CoreError::from);

    FetchOutcome::new(&request, result, Utc::now())
}

// ── Background tasks ─────────────────────────────────────────────

async fn schedule_task(
    tick: ScheduleTick,
    period: Duration,
    events: mpsc::UnboundedSender<ControllerEvent>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!(?tick, "scheduler tick");
                if events.send(ControllerEvent::Tick(tick)).is_err() {
                    break;
                }
            }
        }
    }
}
