// Host statistics decorator
// reason: sysinfo for cross-platform CPU and memory readings
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use taskdeck_core::domain::{CpuUsage, DashboardData};
use taskdeck_core::port::{DataSource, SourceError};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Host readings taken at one refresh
#[derive(Debug, Clone, PartialEq)]
struct HostReadings {
    memory_used_mb: f64,
    memory_total_mb: f64,
    cpu: CpuUsage,
    uptime_ms: u64,
}

/// CPU sampling state. sysinfo derives usage from the delta between two
/// refreshes, which must be at least `MINIMUM_CPU_UPDATE_INTERVAL` apart.
struct HostState {
    system: System,
    cpu_refreshed_at: Instant,
    /// None until a refresh happened after the priming one
    cpu_percentage: Option<f64>,
}

/// Wraps another data source and replaces its memory, CPU and uptime figures
/// with readings from the machine the dashboard runs on.
///
/// Everything else (queues, workers, jobs, alerts) passes through untouched.
pub struct HostStatsSampler<S> {
    inner: S,
    state: Arc<Mutex<HostState>>,
}

impl<S: DataSource> HostStatsSampler<S> {
    pub fn new(inner: S) -> Self {
        let mut system = System::new();
        // CPU usage is a delta; prime it so the first sample has a baseline
        system.refresh_cpu();
        system.refresh_memory();

        Self {
            inner,
            state: Arc::new(Mutex::new(HostState {
                system,
                cpu_refreshed_at: Instant::now(),
                cpu_percentage: None,
            })),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time left before the first real CPU reading can be taken
    fn cpu_settle_time(&self) -> Duration {
        let state = self.lock_state();
        match state.cpu_percentage {
            Some(_) => Duration::ZERO,
            None => {
                MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(state.cpu_refreshed_at.elapsed())
            }
        }
    }

    fn read_host(&self) -> HostReadings {
        let mut state = self.lock_state();

        if state.cpu_refreshed_at.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL
            || state.cpu_percentage.is_none()
        {
            state.system.refresh_cpu();
            state.cpu_refreshed_at = Instant::now();
            let usage = f64::from(state.system.global_cpu_info().cpu_usage());
            state.cpu_percentage = Some(usage);
        }
        state.system.refresh_memory();

        let sys = &state.system;
        let load = System::load_average();
        HostReadings {
            memory_used_mb: sys.used_memory() as f64 / BYTES_PER_MB,
            memory_total_mb: sys.total_memory() as f64 / BYTES_PER_MB,
            cpu: CpuUsage {
                percentage: state.cpu_percentage.unwrap_or_default(),
                load_average: [load.one, load.five, load.fifteen],
                cores: sys.cpus().len() as u32,
            },
            uptime_ms: System::uptime().saturating_mul(1000),
        }
    }
}

#[async_trait]
impl<S: DataSource> DataSource for HostStatsSampler<S> {
    async fn sample(&self) -> Result<DashboardData, SourceError> {
        let mut data = self.inner.sample().await?;

        let settle = self.cpu_settle_time();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        let host = self.read_host();

        let stats = Arc::make_mut(&mut data.system_stats);
        stats.memory_usage.used = host.memory_used_mb;
        stats.memory_usage.total = host.memory_total_mb;
        stats.memory_usage.percentage = if host.memory_total_mb > 0.0 {
            host.memory_used_mb / host.memory_total_mb * 100.0
        } else {
            0.0
        };
        stats.cpu_usage = host.cpu;
        stats.system_uptime = host.uptime_ms;

        debug!(
            cpu = stats.cpu_usage.percentage,
            memory_pct = stats.memory_usage.percentage,
            "Host readings applied"
        );
        Ok(data)
    }
}
