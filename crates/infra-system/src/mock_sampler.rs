// Mock data source
// Produces plausible dashboard snapshots without any backing queue system

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use taskdeck_core::domain::{
    datetime_from_millis, Alert, AlertSeverity, AlertType, BrokerStats, CpuUsage, DashboardData,
    ErrorStats, HeapUsage, Job, JobOptions, MemoryUsage, Queue, QueueMetrics, SystemStats,
    ThroughputStats, Worker, WorkerStatus,
};
use taskdeck_core::port::{DataSource, SourceError, TimeProvider};

/// 2024-01-01T00:00:00Z
const QUEUES_CREATED_AT_MS: i64 = 1_704_067_200_000;

/// `base + [0, span)`
#[derive(Debug, Clone, Copy)]
struct Spread {
    base: f64,
    span: f64,
}

const fn spread(base: f64, span: f64) -> Spread {
    Spread { base, span }
}

impl Spread {
    fn pick(self, rng: &mut impl Rng) -> f64 {
        self.base + rng.gen_range(0.0..self.span)
    }

    fn pick_count(self, rng: &mut impl Rng) -> u64 {
        self.pick(rng).floor() as u64
    }
}

struct QueueProfile {
    name: &'static str,
    waiting: Spread,
    active: Spread,
    completed: Spread,
    failed: Spread,
    delayed: Spread,
    processing_rate: Spread,
    completion_rate: Spread,
    failure_rate: Spread,
    avg_processing_time: Spread,
}

const QUEUE_PROFILES: [QueueProfile; 3] = [
    QueueProfile {
        name: "email-queue",
        waiting: spread(0.0, 50.0),
        active: spread(0.0, 10.0),
        completed: spread(500.0, 1000.0),
        failed: spread(0.0, 20.0),
        delayed: spread(0.0, 15.0),
        processing_rate: spread(0.0, 100.0),
        completion_rate: spread(85.0, 10.0),
        failure_rate: spread(0.0, 5.0),
        avg_processing_time: spread(500.0, 2000.0),
    },
    QueueProfile {
        name: "image-processing",
        waiting: spread(0.0, 30.0),
        active: spread(0.0, 5.0),
        completed: spread(300.0, 800.0),
        failed: spread(0.0, 10.0),
        delayed: spread(0.0, 8.0),
        processing_rate: spread(0.0, 80.0),
        completion_rate: spread(90.0, 8.0),
        failure_rate: spread(0.0, 3.0),
        avg_processing_time: spread(1000.0, 5000.0),
    },
    QueueProfile {
        name: "data-export",
        waiting: spread(0.0, 20.0),
        active: spread(0.0, 3.0),
        completed: spread(200.0, 500.0),
        failed: spread(0.0, 8.0),
        delayed: spread(0.0, 5.0),
        processing_rate: spread(0.0, 60.0),
        completion_rate: spread(88.0, 7.0),
        failure_rate: spread(0.0, 4.0),
        avg_processing_time: spread(800.0, 3000.0),
    },
];

struct WorkerProfile {
    id: &'static str,
    name: &'static str,
    queue: &'static str,
    processed: Spread,
    failed: Spread,
    memory_mb: Spread,
    cpu: Spread,
}

const WORKER_PROFILES: [WorkerProfile; 2] = [
    WorkerProfile {
        id: "worker-1",
        name: "Email Worker #1",
        queue: "email-queue",
        processed: spread(500.0, 1000.0),
        failed: spread(0.0, 20.0),
        memory_mb: spread(50.0, 100.0),
        cpu: spread(10.0, 50.0),
    },
    WorkerProfile {
        id: "worker-2",
        name: "Image Processor #1",
        queue: "image-processing",
        processed: spread(300.0, 800.0),
        failed: spread(0.0, 15.0),
        memory_mb: spread(80.0, 150.0),
        cpu: spread(20.0, 70.0),
    },
];

const UPTIME_MS: Spread = spread(3_600_000.0, 86_400_000.0);

/// Pseudo-random snapshot generator
///
/// Queue names, workers, recent jobs and alerts are fixed; counters and
/// resource figures are drawn fresh on every sample.
pub struct MockSampler {
    rng: Mutex<StdRng>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MockSampler {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            time_provider,
        }
    }

    /// Reproducible sampler: equal seeds and clocks yield equal snapshots
    pub fn with_seed(time_provider: Arc<dyn TimeProvider>, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            time_provider,
        }
    }

    fn generate(&self, now: i64) -> Result<DashboardData, SourceError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let rng = &mut *rng;
        let timestamp = datetime_from_millis(now);
        let created_at = datetime_from_millis(QUEUES_CREATED_AT_MS);

        let queues: Vec<Queue> = QUEUE_PROFILES
            .iter()
            .map(|p| {
                let mut queue = Queue::new(p.name, created_at);
                queue.waiting = p.waiting.pick_count(rng);
                queue.active = p.active.pick_count(rng);
                queue.completed = p.completed.pick_count(rng);
                queue.failed = p.failed.pick_count(rng);
                queue.delayed = p.delayed.pick_count(rng);
                queue.processing_rate = p.processing_rate.pick(rng);
                queue.completion_rate = p.completion_rate.pick(rng);
                queue.failure_rate = p.failure_rate.pick(rng);
                queue.avg_processing_time = p.avg_processing_time.pick(rng);
                queue.last_activity = Some(timestamp);
                queue.recompute_total();
                queue
            })
            .collect();

        let workers: Vec<Worker> = WORKER_PROFILES
            .iter()
            .map(|p| Worker {
                id: p.id.to_string(),
                name: p.name.to_string(),
                queues: vec![p.queue.to_string()],
                status: WorkerStatus::Active,
                processed_jobs: p.processed.pick_count(rng),
                failed_jobs: p.failed.pick_count(rng),
                last_activity: timestamp,
                uptime: UPTIME_MS.pick_count(rng),
                memory_usage: p.memory_mb.pick(rng),
                cpu_usage: p.cpu.pick(rng),
            })
            .collect();

        let metrics: Vec<QueueMetrics> = queues
            .iter()
            .map(|q| QueueMetrics::derive(q, &workers, timestamp))
            .collect();

        let system_stats = SystemStats {
            total_queues: queues.len() as u64,
            total_jobs: queues.iter().map(|q| q.total).sum(),
            total_workers: workers.len() as u64,
            system_uptime: UPTIME_MS.pick_count(rng),
            memory_usage: MemoryUsage {
                used: spread(512.0, 2048.0).pick(rng),
                total: 4096.0,
                percentage: spread(25.0, 50.0).pick(rng),
                heap: HeapUsage {
                    used: spread(256.0, 1024.0).pick(rng),
                    total: 2048.0,
                },
                external: spread(50.0, 100.0).pick(rng),
            },
            cpu_usage: CpuUsage {
                percentage: spread(20.0, 60.0).pick(rng),
                load_average: [
                    rng.gen_range(0.0..2.0),
                    rng.gen_range(0.0..2.0),
                    rng.gen_range(0.0..2.0),
                ],
                cores: 8,
            },
            redis_stats: BrokerStats {
                connected: true,
                total_connections: spread(50.0, 100.0).pick_count(rng),
                used_memory: spread(100.0, 500.0).pick(rng),
                keyspace_hits: spread(5_000.0, 10_000.0).pick_count(rng),
                keyspace_misses: spread(200.0, 1_000.0).pick_count(rng),
                commands_processed: spread(50_000.0, 100_000.0).pick_count(rng),
            },
            throughput: ThroughputStats {
                jobs_per_second: spread(10.0, 50.0).pick(rng),
                jobs_per_minute: spread(600.0, 3_000.0).pick(rng),
                jobs_per_hour: spread(36_000.0, 180_000.0).pick(rng),
                avg_response_time: spread(200.0, 1_000.0).pick(rng),
            },
            errors: ErrorStats {
                total_errors: spread(20.0, 100.0).pick_count(rng),
                error_rate: rng.gen_range(0.0..5.0),
                recent_errors: Vec::new(),
            },
        };

        Ok(DashboardData {
            queues: Arc::new(queues),
            workers: Arc::new(workers),
            system_stats: Arc::new(system_stats),
            recent_jobs: Arc::new(recent_jobs(now)?),
            alerts: Arc::new(alerts(now)),
            metrics: Arc::new(metrics),
        })
    }
}

#[async_trait]
impl DataSource for MockSampler {
    async fn sample(&self) -> Result<DashboardData, SourceError> {
        let now = self.time_provider.now_millis();
        let data = self.generate(now)?;
        debug!(
            queues = data.queues.len(),
            workers = data.workers.len(),
            "Mock snapshot generated"
        );
        Ok(data)
    }
}

fn job_options() -> JobOptions {
    JobOptions {
        attempts: Some(3),
        delay: Some(0),
        ..Default::default()
    }
}

/// One completed, one active and one failed job, all anchored at `now`
fn recent_jobs(now: i64) -> Result<Vec<Job>, SourceError> {
    let mut sent = Job::new(
        "job-1",
        now - 2000,
        "email-queue",
        "send-welcome-email",
        json!({"userId": "123", "email": "user@example.com"}),
        job_options(),
    );
    sent.start(now - 1000)?;
    sent.complete(now)?;

    let mut resizing = Job::new(
        "job-2",
        now - 1500,
        "image-processing",
        "resize-avatar",
        json!({"imageId": "456", "size": "200x200"}),
        job_options(),
    );
    resizing.start(now - 500)?;
    resizing.report_progress(75)?;

    let mut export = Job::new(
        "job-3",
        now - 3000,
        "data-export",
        "export-user-data",
        json!({"userId": "789", "format": "csv"}),
        job_options(),
    );
    export.start(now - 2500)?;
    export.fail(now - 2000, "Database connection timeout")?;
    export.attempts_made = 2;

    Ok(vec![sent, resizing, export])
}

fn alerts(now: i64) -> Vec<Alert> {
    let alert = |id: &str,
                 kind: AlertType,
                 severity: AlertSeverity,
                 message: &str,
                 details: &str,
                 age_ms: i64,
                 queue_name: Option<&str>| Alert {
        id: id.to_string(),
        kind,
        severity,
        message: message.to_string(),
        details: Some(details.to_string()),
        timestamp: datetime_from_millis(now - age_ms),
        acknowledged: false,
        queue_name: queue_name.map(str::to_string),
        job_id: None,
    };

    vec![
        alert(
            "alert-1",
            AlertType::HighFailureRate,
            AlertSeverity::High,
            "High failure rate detected in email-queue",
            "Failure rate has exceeded 5% threshold",
            0,
            Some("email-queue"),
        ),
        alert(
            "alert-2",
            AlertType::MemoryHigh,
            AlertSeverity::Critical,
            "Critical memory usage detected",
            "Memory usage has reached 95% on worker-1",
            300_000,
            None,
        ),
        alert(
            "alert-3",
            AlertType::QueueStalled,
            AlertSeverity::Medium,
            "Queue processing stalled",
            "image-processing queue has been inactive for 10 minutes",
            600_000,
            Some("image-processing"),
        ),
        alert(
            "alert-4",
            AlertType::CpuHigh,
            AlertSeverity::Low,
            "Elevated CPU usage",
            "CPU usage consistently above 80% for the last 5 minutes",
            900_000,
            None,
        ),
    ]
}
