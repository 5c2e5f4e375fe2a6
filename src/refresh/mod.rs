//! Periodic refresh of the displayed status page.
//!
//! One cycle runs as soon as the refresher starts, then one per interval
//! until it is stopped. Cycles are not serialized: a manual refresh may
//! overlap a scheduled one, and whichever finishes last is what is shown.

use crate::fetch::Fetcher;
use crate::page::{classify, OverallStatus, StatusPageResponse};

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// The latest result of refreshing a status page.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// Last successfully aggregated page, kept when later cycles fail.
    pub page: Option<Arc<StatusPageResponse>>,
    /// User-facing message of the most recent failure, cleared on success.
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
}

impl PageState {
    pub fn overall_status(&self) -> OverallStatus {
        classify(self.page.as_ref().map(|p| &p.statistics))
    }
}

/// Keeps a [`PageState`] current for one status page key.
pub struct Refresher {
    fetcher: Arc<Fetcher>,
    key: String,
    interval: Duration,
    state: Arc<RwLock<PageState>>,
    stop: Arc<Mutex<Option<tokio::sync::broadcast::Sender<()>>>>,
    /// Generation of the live refresh loop, 0 when none is running.
    running: Arc<AtomicU64>,
    generation: AtomicU64,
}

impl Refresher {
    pub fn new(fetcher: Arc<Fetcher>, key: &str, interval: Duration) -> Self {
        Self {
            fetcher,
            key: key.to_string(),
            interval,
            state: Arc::new(RwLock::new(PageState::default())),
            stop: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicU64::new(0)),
            generation: AtomicU64::new(0),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the refresh loop in a background task.
    pub async fn start(&self) {
        let mut stop_guard = self.stop.lock().await;
        if stop_guard.is_some() {
            return; // Already running
        }

        let (tx, mut rx) = tokio::sync::broadcast::channel(1);
        *stop_guard = Some(tx);
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.running.store(run, Ordering::SeqCst);
        drop(stop_guard);

        let fetcher = self.fetcher.clone();
        let key = self.key.clone();
        let state = self.state.clone();
        let running = self.running.clone();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            "Refresher: Watching status page {} every {:?}",
            key,
            self.interval
        );

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = rx.recv() => break,
                    // The first tick completes immediately
                    _ = interval.tick() => {
                        run_cycle(&fetcher, &key, &state).await;
                    }
                }
            }

            // A loop started after this one owns the flag now
            let _ = running.compare_exchange(run, 0, Ordering::SeqCst, Ordering::SeqCst);
            tracing::info!("Refresher: Stopped watching {}", key);
        });
    }

    /// Stop the refresh loop. A cycle already in flight still completes.
    pub async fn stop(&self) {
        let mut stop = self.stop.lock().await;
        if let Some(tx) = stop.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) != 0
    }

    /// Run one extra cycle now, alongside the scheduled ones.
    pub fn refresh_now(&self) {
        let fetcher = self.fetcher.clone();
        let key = self.key.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            run_cycle(&fetcher, &key, &state).await;
        });
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }
}

/// Fetch and aggregate `key` once, recording the outcome in `state`.
pub async fn run_cycle(fetcher: &Fetcher, key: &str, state: &RwLock<PageState>) {
    let attempt = Utc::now();
    let result = fetcher.fetch_status_page(key).await;

    let mut state = state.write().await;
    state.last_attempt = Some(attempt);

    match result {
        Ok(page) => {
            tracing::debug!(
                "Refresher: {} refreshed with {} monitors",
                key,
                page.monitors.len()
            );
            state.page = Some(Arc::new(page));
            state.error = None;
            state.last_refresh = Some(Utc::now());
        }
        Err(e) => {
            tracing::warn!("Refresher: Failed to refresh {}: {}", key, e);
            state.error = Some(e.user_message());
        }
    }
}
