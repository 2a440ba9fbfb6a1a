// Job Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Job ID
pub type JobId = String;

/// Priority (higher number = higher priority)
pub type Priority = i32;

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Waiting,
    Active,
    Completed,
    Failed,
    Delayed,
    Paused,
    Stuck,
}

impl JobStatus {
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Waiting,
        JobStatus::Active,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Delayed,
        JobStatus::Paused,
        JobStatus::Stuck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Waiting => "waiting",
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Delayed => "delayed",
            JobStatus::Paused => "paused",
            JobStatus::Stuck => "stuck",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    Fixed,
    Exponential,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffSettings {
    #[serde(rename = "type")]
    pub kind: BackoffType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

/// Backoff policy: either a bare kind or a full settings object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Backoff {
    Kind(BackoffType),
    Settings(BackoffSettings),
}

/// Retention policy for finished jobs: keep/drop flag or number of jobs to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Retention {
    Flag(bool),
    Keep(u64),
}

/// Repeat window bound: epoch milliseconds or a date string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepeatBound {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<RepeatBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<RepeatBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<Backoff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_on_complete: Option<Retention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_on_fail: Option<Retention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatOptions>,
}

impl JobOptions {
    /// Retry budget; a job without an explicit budget gets a single attempt
    pub fn max_attempts(&self) -> u32 {
        self.attempts.unwrap_or(1)
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub data: serde_json::Value,
    pub opts: JobOptions,
    pub progress: u8,

    pub processed_on: Option<i64>, // epoch ms
    pub finished_on: Option<i64>,  // epoch ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returnvalue: Option<serde_json::Value>,

    pub attempts_made: u32,
    pub delay: u64,
    pub timestamp: i64, // epoch ms
    pub status: JobStatus,
    pub queue_name: String,
}

impl Job {
    /// Create a new waiting job
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `timestamp` - Creation time in epoch ms (injected, not system time)
    /// * `queue_name` - Owning queue
    /// * `name` - Job name
    /// * `data` - Payload
    /// * `opts` - Job options; `opts.delay` also becomes the job's delay
    pub fn new(
        id: impl Into<String>,
        timestamp: i64,
        queue_name: impl Into<String>,
        name: impl Into<String>,
        data: serde_json::Value,
        opts: JobOptions,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            delay: opts.delay.unwrap_or(0),
            opts,
            progress: 0,
            processed_on: None,
            finished_on: None,
            failed_reason: None,
            returnvalue: None,
            attempts_made: 0,
            timestamp,
            status: JobStatus::Waiting,
            queue_name: queue_name.into(),
        }
    }

    fn transition_error(&self, to: JobStatus) -> DomainError {
        DomainError::InvalidStateTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    /// Pick the job up for processing (waiting/delayed -> active)
    pub fn start(&mut self, now_millis: i64) -> Result<()> {
        if !matches!(self.status, JobStatus::Waiting | JobStatus::Delayed) {
            return Err(self.transition_error(JobStatus::Active));
        }
        if self.attempts_made >= self.opts.max_attempts() {
            return Err(DomainError::AttemptsExhausted {
                job_id: self.id.clone(),
                max_attempts: self.opts.max_attempts(),
            });
        }
        self.status = JobStatus::Active;
        self.attempts_made += 1;
        self.processed_on = Some(now_millis);
        Ok(())
    }

    /// Report progress of an active job, saturating at 100
    pub fn report_progress(&mut self, progress: u8) -> Result<()> {
        if self.status != JobStatus::Active {
            return Err(self.transition_error(JobStatus::Active));
        }
        self.progress = progress.min(100);
        Ok(())
    }

    /// Transition to completed (active -> completed)
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        if self.status != JobStatus::Active {
            return Err(self.transition_error(JobStatus::Completed));
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.finished_on = Some(now_millis);
        Ok(())
    }

    /// Transition to failed (active -> failed)
    pub fn fail(&mut self, now_millis: i64, reason: impl Into<String>) -> Result<()> {
        if self.status != JobStatus::Active {
            return Err(self.transition_error(JobStatus::Failed));
        }
        self.status = JobStatus::Failed;
        self.failed_reason = Some(reason.into());
        self.finished_on = Some(now_millis);
        Ok(())
    }

    /// Put the job back to the start of its lifecycle with a fresh retry budget
    pub fn retry(&mut self) {
        self.status = JobStatus::Waiting;
        self.progress = 0;
        self.attempts_made = 0;
        self.failed_reason = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job() -> Job {
        Job::new(
            "job-1",
            1000,
            "email-queue",
            "send-email",
            json!({"to": "user@example.com"}),
            JobOptions {
                attempts: Some(3),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_job_is_waiting() {
        let job = job();
        assert_eq!(job.status, JobStatus::Waiting);
        assert_eq!(job.progress, 0);
        assert_eq!(job.attempts_made, 0);
        assert!(job.processed_on.is_none());
        assert!(job.failed_reason.is_none());
    }

    #[test]
    fn test_lifecycle_to_completed() {
        let mut job = job();
        job.start(2000).unwrap();
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.attempts_made, 1);
        assert_eq!(job.processed_on, Some(2000));

        job.report_progress(150).unwrap();
        assert_eq!(job.progress, 100);

        job.complete(3000).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.finished_on, Some(3000));
    }

    #[test]
    fn test_failed_then_retry() {
        let mut job = job();
        job.start(2000).unwrap();
        job.fail(2500, "Database connection timeout").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.failed_reason.as_deref(),
            Some("Database connection timeout")
        );

        job.retry();
        assert_eq!(job.status, JobStatus::Waiting);
        assert_eq!(job.attempts_made, 0);
        assert!(job.failed_reason.is_none());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut job = job();
        assert!(job.complete(2000).is_err());
        assert!(job.fail(2000, "boom").is_err());

        job.start(2000).unwrap();
        let err = job.start(2100).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStateTransition {
                from: "active".to_string(),
                to: "active".to_string(),
            }
        );
    }

    #[test]
    fn test_start_refused_when_attempts_exhausted() {
        let mut job = job();
        for attempt in 0..3 {
            job.start(2000 + attempt).unwrap();
            job.fail(2001 + attempt, "boom").unwrap();
            job.status = JobStatus::Waiting;
        }
        assert!(matches!(
            job.start(5000),
            Err(DomainError::AttemptsExhausted { max_attempts: 3, .. })
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(job()).unwrap();
        assert_eq!(value["queueName"], "email-queue");
        assert_eq!(value["attemptsMade"], 0);
        assert_eq!(value["status"], "waiting");
        assert_eq!(value["opts"]["attempts"], 3);
        assert!(value.get("failedReason").is_none());
    }

    #[test]
    fn test_backoff_accepts_kind_or_settings() {
        let opts: JobOptions =
            serde_json::from_value(json!({"backoff": "exponential", "removeOnComplete": 10}))
                .unwrap();
        assert_eq!(opts.backoff, Some(Backoff::Kind(BackoffType::Exponential)));
        assert_eq!(opts.remove_on_complete, Some(Retention::Keep(10)));

        let opts: JobOptions = serde_json::from_value(
            json!({"backoff": {"type": "fixed", "delay": 500}, "removeOnFail": true}),
        )
        .unwrap();
        assert_eq!(
            opts.backoff,
            Some(Backoff::Settings(BackoffSettings {
                kind: BackoffType::Fixed,
                delay: Some(500),
                settings: None,
            }))
        );
        assert_eq!(opts.remove_on_fail, Some(Retention::Flag(true)));
    }
}
