// Per-queue metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Queue, Worker};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMetrics {
    pub queue_name: String,
    pub total_jobs: u64,
    pub completed_jobs: u64,
    pub failed_jobs: u64,
    pub active_jobs: u64,
    pub waiting_jobs: u64,
    pub delayed_jobs: u64,
    pub throughput: f64,
    pub avg_processing_time: f64,
    pub error_rate: f64,
    pub memory_usage: f64,
    pub cpu_usage: f64,
    pub timestamp: DateTime<Utc>,
}

impl QueueMetrics {
    /// Derive metrics for `queue`; resource usage is summed over the workers servicing it
    pub fn derive(queue: &Queue, workers: &[Worker], timestamp: DateTime<Utc>) -> Self {
        let (memory_usage, cpu_usage) = workers
            .iter()
            .filter(|w| w.services(&queue.name))
            .fold((0.0, 0.0), |(mem, cpu), w| {
                (mem + w.memory_usage, cpu + w.cpu_usage)
            });

        Self {
            queue_name: queue.name.clone(),
            total_jobs: queue.primary_total(),
            completed_jobs: queue.completed,
            failed_jobs: queue.failed,
            active_jobs: queue.active,
            waiting_jobs: queue.waiting,
            delayed_jobs: queue.delayed,
            throughput: queue.processing_rate,
            avg_processing_time: queue.avg_processing_time,
            error_rate: queue.failure_rate,
            memory_usage,
            cpu_usage,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkerStatus;

    fn worker(id: &str, queues: &[&str], memory: f64, cpu: f64) -> Worker {
        Worker {
            id: id.to_string(),
            name: id.to_string(),
            queues: queues.iter().map(|q| q.to_string()).collect(),
            status: WorkerStatus::Active,
            processed_jobs: 0,
            failed_jobs: 0,
            last_activity: Utc::now(),
            uptime: 0,
            memory_usage: memory,
            cpu_usage: cpu,
        }
    }

    #[test]
    fn test_derive_sums_only_servicing_workers() {
        let mut queue = Queue::new("email-queue", Utc::now());
        queue.waiting = 4;
        queue.completed = 10;
        queue.failure_rate = 2.5;

        let workers = vec![
            worker("w1", &["email-queue"], 100.0, 20.0),
            worker("w2", &["image-processing"], 300.0, 70.0),
            worker("w3", &["email-queue", "data-export"], 50.0, 5.0),
        ];

        let metrics = QueueMetrics::derive(&queue, &workers, Utc::now());
        assert_eq!(metrics.total_jobs, 14);
        assert_eq!(metrics.waiting_jobs, 4);
        assert_eq!(metrics.memory_usage, 150.0);
        assert_eq!(metrics.cpu_usage, 25.0);
        assert_eq!(metrics.error_rate, 2.5);
    }
}
