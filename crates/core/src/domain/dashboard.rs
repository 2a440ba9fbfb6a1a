// Dashboard snapshot (root aggregate)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Alert, BrokerStats, Job, Queue, QueueMetrics, SystemStats, Worker};

/// Complete point-in-time aggregate.
///
/// Every collection sits behind its own `Arc`: a patch that rewrites one
/// collection shares all the others with the snapshot it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub queues: Arc<Vec<Queue>>,
    pub workers: Arc<Vec<Worker>>,
    pub system_stats: Arc<SystemStats>,
    pub recent_jobs: Arc<Vec<Job>>,
    pub alerts: Arc<Vec<Alert>>,
    pub metrics: Arc<Vec<QueueMetrics>>,
}

impl DashboardData {
    /// Zeroed snapshot used before the first refresh
    pub fn empty() -> Self {
        let system_stats = SystemStats {
            redis_stats: BrokerStats {
                connected: true,
                ..Default::default()
            },
            ..Default::default()
        };

        Self {
            queues: Arc::default(),
            workers: Arc::default(),
            system_stats: Arc::new(system_stats),
            recent_jobs: Arc::default(),
            alerts: Arc::default(),
            metrics: Arc::default(),
        }
    }

    /// Recompute every derived figure from its inputs:
    /// queue totals, then the system-wide queue/job/worker totals.
    /// Job progress outside 0..=100 is clamped.
    pub fn normalize(&mut self) {
        if self.recent_jobs.iter().any(|j| j.progress > 100) {
            for job in Arc::make_mut(&mut self.recent_jobs).iter_mut() {
                job.progress = job.progress.min(100);
            }
        }

        for queue in Arc::make_mut(&mut self.queues).iter_mut() {
            queue.recompute_total();
        }

        let total_jobs = self.queues.iter().map(|q| q.total).sum();
        let stats = Arc::make_mut(&mut self.system_stats);
        stats.total_jobs = total_jobs;
        stats.total_queues = self.queues.len() as u64;
        stats.total_workers = self.workers.len() as u64;
    }

    pub fn queue(&self, name: &str) -> Option<&Queue> {
        self.queues.iter().find(|q| q.name == name)
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.recent_jobs.iter().find(|j| j.id == id)
    }
}

impl Default for DashboardData {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobOptions;
    use chrono::Utc;

    #[test]
    fn test_empty_snapshot() {
        let data = DashboardData::empty();
        assert!(data.queues.is_empty());
        assert!(data.recent_jobs.is_empty());
        assert!(data.system_stats.redis_stats.connected);
        assert_eq!(data.system_stats.cpu_usage.load_average, [0.0; 3]);
        assert_eq!(data.system_stats.total_jobs, 0);
    }

    #[test]
    fn test_normalize_recomputes_totals() {
        let mut a = Queue::new("a", Utc::now());
        a.waiting = 1;
        a.completed = 10;
        a.total = 0;
        let mut b = Queue::new("b", Utc::now());
        b.failed = 2;
        b.delayed = 3;
        b.stuck = 50;
        b.total = 1234;

        let mut data = DashboardData {
            queues: Arc::new(vec![a, b]),
            ..DashboardData::empty()
        };
        data.normalize();

        assert_eq!(data.queues[0].total, 11);
        assert_eq!(data.queues[1].total, 5);
        assert_eq!(data.system_stats.total_jobs, 16);
        assert_eq!(data.system_stats.total_queues, 2);
        assert_eq!(data.system_stats.total_workers, 0);
    }

    #[test]
    fn test_normalize_clamps_job_progress() {
        let job = |id: &str, progress: u8| {
            let mut job = Job::new(
                id,
                0,
                "email-queue",
                "send-email",
                serde_json::json!({}),
                JobOptions::default(),
            );
            job.progress = progress;
            job
        };
        let mut data = DashboardData {
            recent_jobs: Arc::new(vec![
                job("job-1", 150),
                job("job-2", 40),
                job("job-3", 255),
            ]),
            ..DashboardData::empty()
        };
        data.normalize();

        let progress: Vec<u8> = data.recent_jobs.iter().map(|j| j.progress).collect();
        assert_eq!(progress, vec![100, 40, 100]);
    }
}
