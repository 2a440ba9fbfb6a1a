// Queue Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue identifier
pub type QueueName = String;

/// Named bucket of jobs tracked by status counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    pub name: QueueName,
    pub is_paused: bool,

    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
    pub delayed: u64,
    pub paused: u64,
    pub stuck: u64,

    /// Sum of the five primary counters; recomputed by `recompute_total`
    #[serde(default)]
    pub total: u64,

    pub processing_rate: f64,
    pub completion_rate: f64,
    pub failure_rate: f64,
    pub avg_processing_time: f64, // ms

    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Queue {
    /// Empty, running queue
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            is_paused: false,
            waiting: 0,
            active: 0,
            completed: 0,
            failed: 0,
            delayed: 0,
            paused: 0,
            stuck: 0,
            total: 0,
            processing_rate: 0.0,
            completion_rate: 0.0,
            failure_rate: 0.0,
            avg_processing_time: 0.0,
            created_at,
            last_activity: None,
        }
    }

    /// waiting + active + completed + failed + delayed
    ///
    /// `paused` and `stuck` are reported separately and never counted.
    pub fn primary_total(&self) -> u64 {
        self.waiting + self.active + self.completed + self.failed + self.delayed
    }

    pub fn recompute_total(&mut self) {
        self.total = self.primary_total();
    }
}
