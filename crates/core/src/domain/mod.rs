// Domain Layer - Dashboard entities and aggregates

pub mod alert;
pub mod dashboard;
pub mod error;
pub mod job;
pub mod metrics;
pub mod queue;
pub mod stats;
pub mod worker;

// Re-exports
pub use alert::{Alert, AlertSeverity, AlertType};
pub use dashboard::DashboardData;
pub use error::{DomainError, JobField, ValidationError};
pub use job::{
    Backoff, BackoffSettings, BackoffType, Job, JobId, JobOptions, JobStatus, Priority,
    RepeatBound, RepeatOptions, Retention,
};
pub use metrics::QueueMetrics;
pub use queue::{Queue, QueueName};
pub use stats::{
    BrokerStats, CpuUsage, ErrorRecord, ErrorStats, HeapUsage, MemoryUsage, SystemStats,
    ThroughputStats,
};
pub use worker::{Worker, WorkerStatus};

/// Convert epoch milliseconds to a UTC timestamp (out-of-range values clamp to the epoch)
pub fn datetime_from_millis(millis: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
