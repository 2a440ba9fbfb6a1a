//! Dashboard state store
//!
//! Owns the current [`DashboardData`] snapshot and every mutation of it:
//! periodic refreshes from the injected [`DataSource`] and optimistic
//! updates for user actions.
//!
//! The snapshot is never edited in place. Each change builds a new
//! `DashboardData` from the previous one and publishes it through a
//! `tokio::sync::watch` channel, so readers either see the old aggregate or
//! the new one, never a mix.

pub mod create_job;
mod lifecycle;
pub mod notifications;

pub use create_job::CreateJobRequest;
pub use lifecycle::StoreHandle;
pub use notifications::{Notification, NotificationKind};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::domain::{DashboardData, Job};
use crate::error::{AppError, Result};
use crate::port::{DataSource, IdProvider, TimeProvider};
use notifications::NotificationQueue;

/// Marks job creation as in flight for as long as it lives
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DashboardStore {
    config: StoreConfig,
    data_source: Arc<dyn DataSource>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,

    snapshot: watch::Sender<Arc<DashboardData>>,
    connected: AtomicBool,
    creating_job: AtomicBool,
    active: AtomicBool,

    notifications: Mutex<NotificationQueue>,
    notifications_changed: Notify,
}

impl DashboardStore {
    /// Create an inactive store holding the zeroed snapshot
    pub fn new(
        config: StoreConfig,
        data_source: Arc<dyn DataSource>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let (snapshot, _) = watch::channel(Arc::new(DashboardData::empty()));
        let notifications = Mutex::new(NotificationQueue::new(config.notification_capacity));

        Ok(Self {
            config,
            data_source,
            id_provider,
            time_provider,
            snapshot,
            connected: AtomicBool::new(false),
            creating_job: AtomicBool::new(false),
            active: AtomicBool::new(false),
            notifications,
            notifications_changed: Notify::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<DashboardData> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is marked changed whenever a new snapshot is published
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardData>> {
        self.snapshot.subscribe()
    }

    /// True once a refresh succeeded and until one fails
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn is_creating_job(&self) -> bool {
        self.creating_job.load(Ordering::Acquire)
    }

    /// Live notifications, soonest to expire first
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock_notifications().active(Instant::now())
    }

    /// Replace the snapshot with a fresh sample from the data source.
    ///
    /// A failed sample keeps the last good snapshot and marks the store
    /// disconnected; the failure never reaches the caller.
    pub async fn refresh(&self) {
        match self.data_source.sample().await {
            Ok(mut data) => {
                data.normalize();
                let queues = data.queues.len();
                let total_jobs = data.system_stats.total_jobs;
                self.snapshot.send_replace(Arc::new(data));

                if !self.connected.swap(true, Ordering::AcqRel) {
                    info!("Data source connected");
                }
                debug!(queues, total_jobs, "Snapshot refreshed");
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, keeping last snapshot");
                if self.connected.swap(false, Ordering::AcqRel) {
                    self.notify(
                        NotificationKind::Error,
                        format!("Lost connection to data source: {}", e),
                        self.config.action_notice(),
                    );
                }
            }
        }
    }

    /// Validate and create a job, prepending it to the recent jobs.
    ///
    /// Single flight: while one creation is pending every other call fails
    /// with [`AppError::Busy`]. Dropping the returned future before it
    /// completes discards the request without committing anything.
    pub async fn create_job(&self, req: CreateJobRequest) -> Result<Job> {
        let _in_flight = InFlight::acquire(&self.creating_job).ok_or_else(|| {
            debug!(queue = %req.queue_name, "Job creation already in flight");
            AppError::Busy
        })?;

        let data = create_job::validate_request(&req, &self.snapshot()).map_err(|e| {
            debug!(field = ?e.field(), error = %e, "Job creation rejected");
            e
        })?;

        sleep(self.config.create_job_latency()).await;

        let now = self.time_provider.now_millis();
        let attempts = self.config.default_job_attempts;
        let capacity = self.config.recent_jobs_capacity;
        let mut created = None;
        self.patch(|current| {
            let id = self.fresh_job_id(current)?;
            let job = create_job::build_job(&req, id, now, data, attempts);
            let mut recent = Vec::with_capacity(capacity);
            recent.push(job.clone());
            recent.extend(current.recent_jobs.iter().take(capacity - 1).cloned());
            created = Some(job);
            Some(DashboardData {
                recent_jobs: Arc::new(recent),
                ..current.clone()
            })
        });

        let job = created.ok_or_else(|| {
            warn!(queue = %req.queue_name, "No unused job id available");
            AppError::InvalidState("could not allocate an unused job id".to_string())
        })?;

        info!(job_id = %job.id, queue = %job.queue_name, name = %job.name, "Job created");
        self.notify(
            NotificationKind::Success,
            format!(
                "Job \"{}\" created successfully in {}!",
                job.name, job.queue_name
            ),
            self.config.job_created_notice(),
        );

        Ok(job)
    }

    /// Mark a queue paused. Returns false if no queue has that name.
    pub fn pause_queue(&self, name: &str) -> bool {
        self.set_paused(name, true)
    }

    /// Mark a queue running again. Returns false if no queue has that name.
    pub fn resume_queue(&self, name: &str) -> bool {
        self.set_paused(name, false)
    }

    /// Send a job back to waiting with a fresh retry budget.
    /// Returns false if the job is not among the recent jobs.
    pub fn retry_job(&self, job_id: &str) -> bool {
        let matched = self.patch(|current| {
            let idx = current.recent_jobs.iter().position(|j| j.id == job_id)?;
            let mut jobs = current.recent_jobs.as_ref().clone();
            jobs[idx].retry();
            Some(DashboardData {
                recent_jobs: Arc::new(jobs),
                ..current.clone()
            })
        });

        if matched {
            info!(job_id, "Job queued for retry");
            self.notify(
                NotificationKind::Success,
                format!("Job \"{}\" has been queued for retry", job_id),
                self.config.action_notice(),
            );
        } else {
            debug!(job_id, "Retry ignored: unknown job");
        }
        matched
    }

    /// Drop a job from the recent jobs. Returns false if it is not there.
    pub fn remove_job(&self, job_id: &str) -> bool {
        let matched = self.patch(|current| {
            if current.job(job_id).is_none() {
                return None;
            }
            let jobs: Vec<Job> = current
                .recent_jobs
                .iter()
                .filter(|j| j.id != job_id)
                .cloned()
                .collect();
            Some(DashboardData {
                recent_jobs: Arc::new(jobs),
                ..current.clone()
            })
        });

        if matched {
            info!(job_id, "Job removed");
            self.notify(
                NotificationKind::Success,
                format!("Job \"{}\" has been removed", job_id),
                self.config.action_notice(),
            );
        } else {
            debug!(job_id, "Remove ignored: unknown job");
        }
        matched
    }

    /// Acknowledge an alert. Returns false if no alert has that id.
    pub fn acknowledge_alert(&self, alert_id: &str) -> bool {
        let mut matched = false;
        self.patch(|current| {
            let idx = current.alerts.iter().position(|a| a.id == alert_id)?;
            matched = true;
            if current.alerts[idx].acknowledged {
                return None;
            }
            let mut alerts = current.alerts.as_ref().clone();
            alerts[idx].acknowledged = true;
            Some(DashboardData {
                alerts: Arc::new(alerts),
                ..current.clone()
            })
        });

        if matched {
            info!(alert_id, "Alert acknowledged");
            self.notify(
                NotificationKind::Success,
                format!("Alert \"{}\" acknowledged", alert_id),
                self.config.action_notice(),
            );
        } else {
            debug!(alert_id, "Acknowledge ignored: unknown alert");
        }
        matched
    }

    fn set_paused(&self, name: &str, paused: bool) -> bool {
        let mut matched = false;
        self.patch(|current| {
            let idx = current.queues.iter().position(|q| q.name == name)?;
            matched = true;
            if current.queues[idx].is_paused == paused {
                return None;
            }
            let mut queues = current.queues.as_ref().clone();
            queues[idx].is_paused = paused;
            Some(DashboardData {
                queues: Arc::new(queues),
                ..current.clone()
            })
        });

        let verb = if paused { "paused" } else { "resumed" };
        if matched {
            info!(queue = name, "Queue {}", verb);
            self.notify(
                NotificationKind::Success,
                format!("Queue \"{}\" has been {}", name, verb),
                self.config.action_notice(),
            );
        } else {
            debug!(queue = name, "Ignored {} request: unknown queue", verb);
        }
        matched
    }

    /// Id that no recent job carries yet. Each recent job can reject at
    /// most one candidate, so a provider that keeps repeating itself gives up.
    fn fresh_job_id(&self, current: &DashboardData) -> Option<String> {
        (0..=current.recent_jobs.len())
            .map(|_| self.id_provider.generate_id())
            .find(|id| current.job(id).is_none())
    }

    /// Publish `edit(current)` as the new snapshot; `None` leaves it untouched.
    /// Returns whether a new snapshot was published.
    fn patch(&self, edit: impl FnOnce(&DashboardData) -> Option<DashboardData>) -> bool {
        self.snapshot.send_if_modified(|current| match edit(&**current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }

    fn notify(&self, kind: NotificationKind, message: String, ttl: Duration) {
        self.lock_notifications()
            .push(kind, message, ttl, Instant::now());
        self.notifications_changed.notify_one();
    }

    fn lock_notifications(&self) -> MutexGuard<'_, NotificationQueue> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
