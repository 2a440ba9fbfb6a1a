// System-wide statistics sampled on every refresh

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_queues: u64,
    pub total_jobs: u64,
    pub total_workers: u64,
    pub system_uptime: u64, // ms
    pub memory_usage: MemoryUsage,
    pub cpu_usage: CpuUsage,
    /// Connection statistics of the external store backing the queues
    pub redis_stats: BrokerStats,
    pub throughput: ThroughputStats,
    pub errors: ErrorStats,
}

/// Memory figures in MB
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub used: f64,
    pub total: f64,
    pub percentage: f64,
    pub heap: HeapUsage,
    pub external: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeapUsage {
    pub used: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub percentage: f64,
    /// 1, 5 and 15 minute load averages
    pub load_average: [f64; 3],
    pub cores: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStats {
    pub connected: bool,
    pub total_connections: u64,
    pub used_memory: f64, // MB
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub commands_processed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputStats {
    pub jobs_per_second: f64,
    pub jobs_per_minute: f64,
    pub jobs_per_hour: f64,
    pub avg_response_time: f64, // ms
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStats {
    pub total_errors: u64,
    pub error_rate: f64,
    pub recent_errors: Vec<ErrorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}
