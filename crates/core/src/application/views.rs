// Derived views: pure functions of the snapshot used by renderers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Job, JobStatus, Queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Neutral,
    Info,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub tone: BadgeTone,
    pub icon: &'static str,
    pub label: String,
}

pub fn status_badge(status: JobStatus) -> StatusBadge {
    let (tone, icon) = match status {
        JobStatus::Waiting => (BadgeTone::Neutral, "⏳"),
        JobStatus::Active => (BadgeTone::Info, "⚡"),
        JobStatus::Completed => (BadgeTone::Success, "✅"),
        JobStatus::Failed => (BadgeTone::Error, "❌"),
        JobStatus::Delayed => (BadgeTone::Warning, "⏰"),
        JobStatus::Paused => (BadgeTone::Warning, "⏸️"),
        JobStatus::Stuck => (BadgeTone::Error, "🚫"),
    };

    StatusBadge {
        tone,
        icon,
        label: capitalize(status.as_str()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human-readable uptime using the two largest applicable units
pub fn format_uptime(millis: u64) -> String {
    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Progress bar fill in percent, clamped to [0, 100]
pub fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// `part` as a percentage of `whole`, clamped like [`bar_width`]
pub fn ratio_width(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || whole.is_nan() {
        return 0.0;
    }
    bar_width(part / whole * 100.0)
}

// ============================================================================
// Listing queries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSortKey {
    #[default]
    Timestamp,
    Progress,
    Attempts,
}

/// Filter, sort and paging options for recent jobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobQuery {
    pub status: Option<JobStatus>,
    pub queue: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub sort_by: JobSortKey,
    pub sort_order: SortOrder,
    /// Case-insensitive match on job id or name
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

pub fn query_jobs<'a>(jobs: &'a [Job], query: &JobQuery) -> Vec<&'a Job> {
    let search = query.search.as_deref().map(str::to_lowercase);
    let from = query.date_from.map(|d| d.timestamp_millis());
    let to = query.date_to.map(|d| d.timestamp_millis());

    let mut matched: Vec<&Job> = jobs
        .iter()
        .filter(|j| query.status.map_or(true, |s| j.status == s))
        .filter(|j| query.queue.as_deref().map_or(true, |q| j.queue_name == q))
        .filter(|j| from.map_or(true, |f| j.timestamp >= f))
        .filter(|j| to.map_or(true, |t| j.timestamp <= t))
        .filter(|j| {
            search.as_deref().map_or(true, |s| {
                j.id.to_lowercase().contains(s) || j.name.to_lowercase().contains(s)
            })
        })
        .collect();

    // stable, so equal keys keep snapshot order
    matched.sort_by(|a, b| {
        let ord = match query.sort_by {
            JobSortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            JobSortKey::Progress => a.progress.cmp(&b.progress),
            JobSortKey::Attempts => a.attempts_made.cmp(&b.attempts_made),
        };
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    matched
        .into_iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatusFilter {
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueSortKey {
    #[default]
    Name,
    Total,
    Active,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueQuery {
    pub status: Option<QueueStatusFilter>,
    pub sort_by: QueueSortKey,
    pub sort_order: SortOrder,
    pub search: Option<String>,
}

pub fn query_queues<'a>(queues: &'a [Queue], query: &QueueQuery) -> Vec<&'a Queue> {
    let search = query.search.as_deref().map(str::to_lowercase);

    let mut matched: Vec<&Queue> = queues
        .iter()
        .filter(|q| match query.status {
            Some(QueueStatusFilter::Active) => !q.is_paused,
            Some(QueueStatusFilter::Paused) => q.is_paused,
            None => true,
        })
        .filter(|q| {
            search
                .as_deref()
                .map_or(true, |s| q.name.to_lowercase().contains(s))
        })
        .collect();

    matched.sort_by(|a, b| {
        let ord = match query.sort_by {
            QueueSortKey::Name => a.name.cmp(&b.name),
            QueueSortKey::Total => a.total.cmp(&b.total),
            QueueSortKey::Active => a.active.cmp(&b.active),
            QueueSortKey::Failed => a.failed.cmp(&b.failed),
        };
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobOptions;
    use serde_json::json;

    #[test]
    fn test_status_badges() {
        let badge = status_badge(JobStatus::Waiting);
        assert_eq!(badge.tone, BadgeTone::Neutral);
        assert_eq!(badge.label, "Waiting");

        assert_eq!(status_badge(JobStatus::Active).tone, BadgeTone::Info);
        assert_eq!(status_badge(JobStatus::Completed).tone, BadgeTone::Success);
        assert_eq!(status_badge(JobStatus::Failed).tone, BadgeTone::Error);
        assert_eq!(status_badge(JobStatus::Delayed).tone, BadgeTone::Warning);
        assert_eq!(status_badge(JobStatus::Paused).tone, BadgeTone::Warning);
        assert_eq!(status_badge(JobStatus::Stuck).tone, BadgeTone::Error);
        assert_eq!(status_badge(JobStatus::Stuck).label, "Stuck");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(45_000), "45s");
        assert_eq!(format_uptime(90_000), "1m 30s");
        assert_eq!(format_uptime(3_661_000), "1h 1m");
        assert_eq!(format_uptime(90_000_000), "1d 1h");
    }

    #[test]
    fn test_bar_width_clamps() {
        assert_eq!(bar_width(42.5), 42.5);
        assert_eq!(bar_width(-3.0), 0.0);
        assert_eq!(bar_width(140.0), 100.0);
        assert_eq!(bar_width(f64::NAN), 0.0);

        assert_eq!(ratio_width(512.0, 2048.0), 25.0);
        assert_eq!(ratio_width(300.0, 200.0), 100.0);
        assert_eq!(ratio_width(10.0, 0.0), 0.0);
    }

    fn job(id: &str, queue: &str, status: JobStatus, timestamp: i64, progress: u8) -> Job {
        let mut job = Job::new(
            id,
            timestamp,
            queue,
            format!("{}-task", id),
            json!({}),
            JobOptions::default(),
        );
        job.status = status;
        job.progress = progress;
        job
    }

    fn jobs() -> Vec<Job> {
        vec![
            job("job-1", "email-queue", JobStatus::Completed, 3_000, 100),
            job("job-2", "image-processing", JobStatus::Active, 1_000, 75),
            job("job-3", "email-queue", JobStatus::Failed, 2_000, 10),
        ]
    }

    fn ids(jobs: Vec<&Job>) -> Vec<&str> {
        jobs.into_iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_query_jobs_filters() {
        let jobs = jobs();

        let by_queue = JobQuery {
            queue: Some("email-queue".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(query_jobs(&jobs, &by_queue)), vec!["job-3", "job-1"]);

        let by_status = JobQuery {
            status: Some(JobStatus::Active),
            ..Default::default()
        };
        assert_eq!(ids(query_jobs(&jobs, &by_status)), vec!["job-2"]);

        let by_search = JobQuery {
            search: Some("JOB-3".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(query_jobs(&jobs, &by_search)), vec!["job-3"]);

        let by_date = JobQuery {
            date_from: DateTime::from_timestamp_millis(1_500),
            date_to: DateTime::from_timestamp_millis(2_500),
            ..Default::default()
        };
        assert_eq!(ids(query_jobs(&jobs, &by_date)), vec!["job-3"]);
    }

    #[test]
    fn test_query_jobs_sort_and_page() {
        let jobs = jobs();
        let query = JobQuery {
            sort_by: JobSortKey::Progress,
            sort_order: SortOrder::Desc,
            offset: 1,
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(ids(query_jobs(&jobs, &query)), vec!["job-2"]);
    }

    #[test]
    fn test_query_queues() {
        let mut email = Queue::new("email-queue", Utc::now());
        email.failed = 7;
        let mut images = Queue::new("image-processing", Utc::now());
        images.is_paused = true;
        images.failed = 2;
        let queues = vec![images, email];

        let all = query_queues(&queues, &QueueQuery::default());
        assert_eq!(all[0].name, "email-queue");

        let paused = QueueQuery {
            status: Some(QueueStatusFilter::Paused),
            ..Default::default()
        };
        let found = query_queues(&queues, &paused);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "image-processing");

        let worst = QueueQuery {
            sort_by: QueueSortKey::Failed,
            sort_order: SortOrder::Desc,
            search: Some("QUEUE".to_string()),
            ..Default::default()
        };
        let found = query_queues(&queues, &worst);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].failed, 7);
    }
}
