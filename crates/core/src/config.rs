// Dashboard configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::constants::*;
use crate::error::{AppError, Result};

/// Top-level configuration, typically loaded from a file plus environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub store: StoreConfig,
    pub endpoints: Endpoints,
}

/// Store timers and bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub refresh_interval_ms: u64,
    /// Simulated round trip before a created job is committed
    pub create_job_latency_ms: u64,
    pub recent_jobs_capacity: usize,
    pub notification_capacity: usize,
    pub job_created_notice_ms: u64,
    pub action_notice_ms: u64,
    pub default_job_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            create_job_latency_ms: DEFAULT_CREATE_JOB_LATENCY_MS,
            recent_jobs_capacity: RECENT_JOBS_CAPACITY,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            job_created_notice_ms: JOB_CREATED_NOTICE_MS,
            action_notice_ms: ACTION_NOTICE_MS,
            default_job_attempts: DEFAULT_JOB_ATTEMPTS,
        }
    }
}

impl StoreConfig {
    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(AppError::Config(
                "refresh_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.recent_jobs_capacity == 0 {
            return Err(AppError::Config(
                "recent_jobs_capacity must be greater than 0".to_string(),
            ));
        }
        if self.notification_capacity == 0 {
            return Err(AppError::Config(
                "notification_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn create_job_latency(&self) -> Duration {
        Duration::from_millis(self.create_job_latency_ms)
    }

    pub fn job_created_notice(&self) -> Duration {
        Duration::from_millis(self.job_created_notice_ms)
    }

    pub fn action_notice(&self) -> Duration {
        Duration::from_millis(self.action_notice_ms)
    }
}

/// Connection endpoints of the future backend.
///
/// Carried through configuration only; no adapter dereferences them yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub redis_url: String,
    pub api_base_url: String,
    pub websocket_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            websocket_url: DEFAULT_WEBSOCKET_URL.to_string(),
        }
    }
}
