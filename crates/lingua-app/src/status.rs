use std::sync::atomic::{AtomicU64, Ordering};

use lingua_types::{RequestId, TranslationStatus};
use tokio::sync::{RwLock, watch};

/// Application status
pub struct AppStatus {
    pub translation: RwLock<TranslationStatus>,
    /// Last request that got its final answer, finished or rejected
    settled: watch::Sender<Option<RequestId>>,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            translation: RwLock::new(TranslationStatus::Idle),
            settled: watch::Sender::new(None),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn mark_settled(&self, id: RequestId) {
        self.settled.send_replace(Some(id));
    }

    /// Subscribe before sending a request, then wait with [`AppStatus::wait_settled`]
    pub fn subscribe_settled(&self) -> watch::Receiver<Option<RequestId>> {
        self.settled.subscribe()
    }

    pub async fn wait_settled(settled: &mut watch::Receiver<Option<RequestId>>, id: RequestId) {
        if settled.wait_for(|last| *last == Some(id)).await.is_err() {
            tracing::debug!("Status dropped while waiting for {id}");
        }
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}
