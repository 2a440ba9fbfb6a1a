//! Terminal rendering of a dashboard snapshot

use colored::{ColoredString, Colorize};
use tabled::{Table, Tabled};

use taskdeck_core::application::views::{
    bar_width, format_uptime, query_jobs, query_queues, ratio_width, status_badge, BadgeTone,
    JobQuery, QueueQuery,
};
use taskdeck_core::application::{Notification, NotificationKind};
use taskdeck_core::domain::{DashboardData, Job, Queue};

const BAR_CELLS: usize = 20;

/// Fixed-width text bar for a percentage
pub fn bar(percent: f64) -> String {
    let filled = (bar_width(percent) / 100.0 * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

fn toned(text: &str, tone: BadgeTone) -> ColoredString {
    match tone {
        BadgeTone::Success => text.green(),
        BadgeTone::Error => text.red(),
        BadgeTone::Warning => text.yellow(),
        BadgeTone::Info => text.cyan(),
        BadgeTone::Neutral => text.normal(),
    }
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Queue")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Waiting")]
    waiting: u64,
    #[tabled(rename = "Active")]
    active: u64,
    #[tabled(rename = "Completed")]
    completed: u64,
    #[tabled(rename = "Failed")]
    failed: u64,
    #[tabled(rename = "Delayed")]
    delayed: u64,
    #[tabled(rename = "Total")]
    total: u64,
    #[tabled(rename = "Failure %")]
    failure_rate: String,
}

impl From<&Queue> for QueueRow {
    fn from(queue: &Queue) -> Self {
        Self {
            name: queue.name.clone(),
            state: if queue.is_paused {
                "paused".yellow().to_string()
            } else {
                "running".green().to_string()
            },
            waiting: queue.waiting,
            active: queue.active,
            completed: queue.completed,
            failed: queue.failed,
            delayed: queue.delayed,
            total: queue.total,
            failure_rate: format!("{:.1}", queue.failure_rate),
        }
    }
}

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Queue")]
    queue: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Attempts")]
    attempts: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        let badge = status_badge(job.status);
        Self {
            id: job.id.clone(),
            name: job.name.clone(),
            queue: job.queue_name.clone(),
            status: toned(&format!("{} {}", badge.icon, badge.label), badge.tone).to_string(),
            progress: format!("{} {:>3}%", bar(f64::from(job.progress)), job.progress),
            attempts: format!("{}/{}", job.attempts_made, job.opts.max_attempts()),
        }
    }
}

pub fn status_line(connected: bool, data: &DashboardData) -> String {
    let stats = &data.system_stats;
    let link = if connected {
        "● connected".green()
    } else {
        "● disconnected".red()
    };

    format!(
        "{}  {} queues  {} jobs  {} workers  uptime {}\n  cpu {} {:>5.1}%\n  mem {} {:>5.1}%  ({:.0}/{:.0} MB)",
        link,
        stats.total_queues,
        stats.total_jobs,
        stats.total_workers,
        format_uptime(stats.system_uptime),
        bar(stats.cpu_usage.percentage),
        stats.cpu_usage.percentage,
        bar(ratio_width(stats.memory_usage.used, stats.memory_usage.total)),
        stats.memory_usage.percentage,
        stats.memory_usage.used,
        stats.memory_usage.total,
    )
}

pub fn queue_table<'a>(queues: impl IntoIterator<Item = &'a Queue>) -> String {
    Table::new(queues.into_iter().map(QueueRow::from)).to_string()
}

pub fn job_table<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> String {
    Table::new(jobs.into_iter().map(JobRow::from)).to_string()
}

pub fn notification_line(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::Success => format!("✓ {}", notification.message)
            .as_str()
            .green()
            .to_string(),
        NotificationKind::Error => format!("✗ {}", notification.message)
            .as_str()
            .red()
            .to_string(),
    }
}

/// Selects and orders the rows of a dashboard frame
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub jobs: JobQuery,
    pub queues: QueueQuery,
}

/// Full dashboard frame
pub fn dashboard(
    connected: bool,
    data: &DashboardData,
    notifications: &[Notification],
    listing: &Listing,
) -> String {
    let mut out = String::new();
    out.push_str(&status_line(connected, data));
    out.push_str("\n\n");
    out.push_str(&"Queues".cyan().bold().to_string());
    out.push('\n');
    out.push_str(&queue_table(query_queues(&data.queues, &listing.queues)));
    out.push_str("\n\n");
    out.push_str(&"Recent Jobs".cyan().bold().to_string());
    out.push('\n');
    out.push_str(&job_table(query_jobs(&data.recent_jobs, &listing.jobs)));
    for notification in notifications {
        out.push('\n');
        out.push_str(&notification_line(notification));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use taskdeck_core::application::views::QueueStatusFilter;
    use taskdeck_core::domain::{JobOptions, JobStatus};

    #[test]
    fn test_bar_fills_proportionally() {
        assert_eq!(bar(0.0), "░".repeat(BAR_CELLS));
        assert_eq!(bar(100.0), "█".repeat(BAR_CELLS));
        assert_eq!(bar(250.0), "█".repeat(BAR_CELLS));
        assert_eq!(bar(50.0).chars().filter(|c| *c == '█').count(), BAR_CELLS / 2);
    }

    #[test]
    fn test_dashboard_lists_queues_and_jobs() {
        colored::control::set_override(false);

        let mut queue = Queue::new("email-queue", Utc::now());
        queue.is_paused = true;
        let job = Job::new(
            "job-1",
            0,
            "email-queue",
            "send-email",
            serde_json::json!({}),
            JobOptions::default(),
        );
        let data = DashboardData {
            queues: Arc::new(vec![queue]),
            recent_jobs: Arc::new(vec![job]),
            ..DashboardData::empty()
        };

        let frame = dashboard(true, &data, &[], &Listing::default());
        assert!(frame.contains("email-queue"));
        assert!(frame.contains("paused"));
        assert!(frame.contains("send-email"));
        assert!(frame.contains("Waiting"));
        assert!(frame.contains("0/1"));
    }

    #[test]
    fn test_dashboard_applies_listing() {
        colored::control::set_override(false);

        let job = |id: &str, queue: &str, status: JobStatus| {
            let mut job = Job::new(
                id,
                0,
                queue,
                format!("{}-task", id),
                serde_json::json!({}),
                JobOptions::default(),
            );
            job.status = status;
            job
        };
        let mut paused = Queue::new("data-export", Utc::now());
        paused.is_paused = true;
        let data = DashboardData {
            queues: Arc::new(vec![Queue::new("email-queue", Utc::now()), paused]),
            recent_jobs: Arc::new(vec![
                job("job-1", "email-queue", JobStatus::Completed),
                job("job-2", "data-export", JobStatus::Failed),
            ]),
            ..DashboardData::empty()
        };
        let listing = Listing {
            jobs: JobQuery {
                status: Some(JobStatus::Failed),
                ..Default::default()
            },
            queues: QueueQuery {
                status: Some(QueueStatusFilter::Active),
                ..Default::default()
            },
        };

        let frame = dashboard(true, &data, &[], &listing);
        assert!(frame.contains("job-2-task"));
        assert!(!frame.contains("job-1-task"));
        assert!(frame.contains("email-queue"));
        // the paused queue only shows up through its job row
        assert!(!frame.contains("paused"));
    }
}
