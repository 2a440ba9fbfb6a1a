//! Listing flags for the dashboard tables

use clap::{Args, ValueEnum};

use taskdeck_core::application::views::{
    JobQuery, JobSortKey, QueueQuery, QueueSortKey, QueueStatusFilter, SortOrder,
};
use taskdeck_core::domain::JobStatus;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    Timestamp,
    Progress,
    Attempts,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Active,
    Paused,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueSort {
    #[default]
    Name,
    Total,
    Active,
    Failed,
}

fn parse_job_status(s: &str) -> Result<JobStatus, String> {
    JobStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            let known: Vec<_> = JobStatus::ALL.iter().map(|st| st.as_str()).collect();
            format!("unknown status '{}' (expected one of: {})", s, known.join(", "))
        })
}

fn order(desc: bool) -> SortOrder {
    if desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// Only jobs in this queue
    #[arg(long)]
    pub queue: Option<String>,

    /// Only jobs in this status (waiting, active, failed, ...)
    #[arg(long, value_parser = parse_job_status)]
    pub status: Option<JobStatus>,

    /// Case-insensitive match on job id or name
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub sort: JobSort,

    /// Newest (or largest) jobs first
    #[arg(long)]
    pub desc: bool,

    /// Show at most this many jobs
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only running or only paused queues
    #[arg(long, value_enum)]
    pub queue_state: Option<QueueState>,

    #[arg(long, value_enum, default_value_t)]
    pub queue_sort: QueueSort,

    #[arg(long)]
    pub queue_desc: bool,
}

impl ListingArgs {
    pub fn job_query(&self) -> JobQuery {
        JobQuery {
            status: self.status,
            queue: self.queue.clone(),
            limit: self.limit,
            sort_by: match self.sort {
                JobSort::Timestamp => JobSortKey::Timestamp,
                JobSort::Progress => JobSortKey::Progress,
                JobSort::Attempts => JobSortKey::Attempts,
            },
            sort_order: order(self.desc),
            search: self.search.clone(),
            ..Default::default()
        }
    }

    pub fn queue_query(&self) -> QueueQuery {
        QueueQuery {
            status: self.queue_state.map(|state| match state {
                QueueState::Active => QueueStatusFilter::Active,
                QueueState::Paused => QueueStatusFilter::Paused,
            }),
            sort_by: match self.queue_sort {
                QueueSort::Name => QueueSortKey::Name,
                QueueSort::Total => QueueSortKey::Total,
                QueueSort::Active => QueueSortKey::Active,
                QueueSort::Failed => QueueSortKey::Failed,
            },
            sort_order: order(self.queue_desc),
            search: None,
        }
    }
}
