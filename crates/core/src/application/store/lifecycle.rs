// Store activation: refresh loop and notification sweeper

use std::future::pending;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, MissedTickBehavior};
use tracing::{debug, error, info};

use super::DashboardStore;
use crate::application::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use crate::error::{AppError, Result};

/// Owner of an active store's background tasks.
///
/// `stop` disarms the timers and waits for both tasks; dropping the handle
/// disarms them without waiting.
pub struct StoreHandle {
    store: Arc<DashboardStore>,
    shutdown: ShutdownSender,
    tasks: Vec<JoinHandle<()>>,
}

impl StoreHandle {
    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.store
    }

    /// Disarm both timers and wait until the tasks have exited
    pub async fn stop(mut self) {
        self.shutdown.shutdown();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                error!(error = ?e, "Store task ended abnormally");
            }
        }
        info!("Dashboard store stopped");
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        self.store.active.store(false, Ordering::Release);
    }
}

impl DashboardStore {
    /// Activate the store: refresh immediately, then every refresh interval,
    /// and expire notifications as they age out.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<StoreHandle> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(AppError::InvalidState(
                "dashboard store is already active".to_string(),
            ));
        }

        let (shutdown, token) = shutdown_channel();
        let tasks = vec![
            tokio::spawn(run_refresh_loop(Arc::clone(self), token.clone())),
            tokio::spawn(run_notification_sweeper(Arc::clone(self), token)),
        ];

        info!(
            refresh_interval_ms = self.config.refresh_interval_ms,
            "Dashboard store started"
        );

        Ok(StoreHandle {
            store: Arc::clone(self),
            shutdown,
            tasks,
        })
    }
}

async fn run_refresh_loop(store: Arc<DashboardStore>, mut shutdown: ShutdownToken) {
    // first tick completes immediately
    let mut tick = interval(store.config.refresh_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if shutdown.is_shutdown() {
            break;
        }
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = tick.tick() => {}
        }
        tokio::select! {
            _ = shutdown.wait() => {
                debug!("Refresh interrupted by shutdown");
                break;
            }
            _ = store.refresh() => {}
        }
    }
    debug!("Refresh loop exited");
}

async fn run_notification_sweeper(store: Arc<DashboardStore>, mut shutdown: ShutdownToken) {
    loop {
        if shutdown.is_shutdown() {
            break;
        }
        let next_expiry = store.lock_notifications().next_expiry();
        let expiry = async move {
            match next_expiry {
                Some(at) => sleep_until(at).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            _ = shutdown.wait() => break,
            // a new notification may expire sooner than the one we sleep on
            _ = store.notifications_changed.notified() => {}
            _ = expiry => {
                let removed = store.lock_notifications().prune(tokio::time::Instant::now());
                debug!(removed, "Expired notifications cleared");
            }
        }
    }
    debug!("Notification sweeper exited");
}
