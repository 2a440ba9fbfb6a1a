// Worker Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Active,
    Idle,
    Paused,
    Stopped,
    Error,
}

/// Logical processing agent servicing one or more queues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub queues: Vec<String>,
    pub status: WorkerStatus,
    pub processed_jobs: u64,
    pub failed_jobs: u64,
    pub last_activity: DateTime<Utc>,
    pub uptime: u64,       // ms
    pub memory_usage: f64, // MB
    pub cpu_usage: f64,    // percent
}

impl Worker {
    pub fn services(&self, queue_name: &str) -> bool {
        self.queues.iter().any(|q| q == queue_name)
    }
}
