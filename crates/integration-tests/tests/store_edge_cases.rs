//! Store edge cases: contention, outages, cancellation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_test::assert_ok;

use taskdeck_core::application::{CreateJobRequest, DashboardStore};
use taskdeck_core::config::StoreConfig;
use taskdeck_core::domain::DashboardData;
use taskdeck_core::port::id_provider::mocks::SequentialIdProvider;
use taskdeck_core::port::time_provider::mocks::FixedTimeProvider;
use taskdeck_core::port::{DataSource, SourceError};
use taskdeck_core::AppError;
use taskdeck_infra_system::MockSampler;

const NOW: i64 = 1_700_000_000_000;

/// Mock sampler that can be switched off to simulate an outage
struct FlakySource {
    inner: MockSampler,
    down: Mutex<bool>,
}

impl FlakySource {
    async fn set_down(&self, down: bool) {
        *self.down.lock().await = down;
    }
}

#[async_trait]
impl DataSource for FlakySource {
    async fn sample(&self) -> Result<DashboardData, SourceError> {
        if *self.down.lock().await {
            return Err(SourceError::Unavailable("connection refused".to_string()));
        }
        self.inner.sample().await
    }
}

fn store_with(source: Arc<dyn DataSource>) -> Arc<DashboardStore> {
    Arc::new(
        DashboardStore::new(
            StoreConfig::default(),
            source,
            Arc::new(SequentialIdProvider::default()),
            Arc::new(FixedTimeProvider::new(NOW)),
        )
        .unwrap(),
    )
}

fn mock_store() -> Arc<DashboardStore> {
    let time = Arc::new(FixedTimeProvider::new(NOW));
    store_with(Arc::new(MockSampler::with_seed(time, 99)))
}

fn request(name: &str) -> CreateJobRequest {
    CreateJobRequest {
        queue_name: "data-export".to_string(),
        job_name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_creates_only_one_wins() {
    let store = mock_store();
    store.refresh().await;

    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create_job(request(&format!("export-{}", i))).await })
        })
        .collect();

    let mut created = 0;
    let mut busy = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::Busy) => busy += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(busy, 9);
    assert_eq!(store.snapshot().recent_jobs.len(), 4);
    assert!(!store.is_creating_job());
}

#[tokio::test(start_paused = true)]
async fn test_aborted_create_releases_flag() {
    let store = mock_store();
    store.refresh().await;
    let before = store.snapshot();

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.create_job(request("abandoned")).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.is_creating_job());

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    assert!(!store.is_creating_job());
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
    assert_ok!(store.create_job(request("next")).await);
}

#[tokio::test(start_paused = true)]
async fn test_outage_keeps_last_snapshot_then_recovers() {
    let time = Arc::new(FixedTimeProvider::new(NOW));
    let source = Arc::new(FlakySource {
        inner: MockSampler::with_seed(time, 4),
        down: Mutex::new(false),
    });
    let store = store_with(source.clone());
    let handle = store.start().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.is_connected());
    let good = store.snapshot();

    source.set_down(true).await;
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(!store.is_connected());
    assert!(Arc::ptr_eq(&good, &store.snapshot()));
    assert_eq!(store.notifications().len(), 1);

    // actions keep working against the stale snapshot
    assert!(store.pause_queue("email-queue"));

    source.set_down(false).await;
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(store.is_connected());
    assert!(!store.snapshot().queue("email-queue").unwrap().is_paused);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_targets_never_publish() {
    let store = mock_store();
    store.refresh().await;

    let mut snapshots = store.subscribe();
    snapshots.borrow_and_update();

    assert!(!store.pause_queue("ghost-queue"));
    assert!(!store.resume_queue("ghost-queue"));
    assert!(!store.retry_job("job-999"));
    assert!(!store.remove_job("job-999"));
    assert!(!store.acknowledge_alert("alert-999"));

    assert!(!snapshots.has_changed().unwrap());
    assert!(store.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_recent_jobs_capacity_from_config() {
    let time = Arc::new(FixedTimeProvider::new(NOW));
    let store = Arc::new(
        DashboardStore::new(
            StoreConfig {
                recent_jobs_capacity: 5,
                create_job_latency_ms: 10,
                ..Default::default()
            },
            Arc::new(MockSampler::with_seed(time.clone(), 1)),
            Arc::new(SequentialIdProvider::default()),
            time,
        )
        .unwrap(),
    );
    store.refresh().await;

    for i in 0..8 {
        store.create_job(request(&format!("export-{}", i))).await.unwrap();
    }

    let names: Vec<_> = store
        .snapshot()
        .recent_jobs
        .iter()
        .map(|j| j.name.clone())
        .collect();
    assert_eq!(
        names,
        vec!["export-7", "export-6", "export-5", "export-4", "export-3"]
    );
}
