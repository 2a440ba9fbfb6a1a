// Store constants (no magic values)

/// Snapshot refresh period (3s)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 3000;

/// Simulated backend round trip for job creation (1s)
pub const DEFAULT_CREATE_JOB_LATENCY_MS: u64 = 1000;

/// Bound of the most-recent-first job list
pub const RECENT_JOBS_CAPACITY: usize = 20;

/// Notifications kept visible at once
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 5;

/// Lifetime of the "job created" notice (5s)
pub const JOB_CREATED_NOTICE_MS: u64 = 5000;

/// Lifetime of pause/resume/retry/remove notices (3s)
pub const ACTION_NOTICE_MS: u64 = 3000;

/// Retry budget given to newly created jobs
pub const DEFAULT_JOB_ATTEMPTS: u32 = 3;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:3001";
