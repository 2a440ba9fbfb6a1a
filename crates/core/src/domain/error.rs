// Domain Error Types

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid job state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Job {job_id} exhausted its {max_attempts} attempts")]
    AttemptsExhausted { job_id: String, max_attempts: u32 },
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Form field a validation error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    QueueName,
    JobName,
    Data,
}

impl std::fmt::Display for JobField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            JobField::QueueName => "queue_name",
            JobField::JobName => "job_name",
            JobField::Data => "data",
        })
    }
}

/// Job creation validation failures.
///
/// Display strings are user-facing and shown inline next to `field()`.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Queue name is required")]
    QueueNameRequired,

    #[error("Job name is required")]
    JobNameRequired,

    #[error("Invalid JSON format in job data")]
    InvalidJobData(#[source] serde_json::Error),

    #[error("Queue \"{0}\" does not exist")]
    UnknownQueue(String),
}

impl ValidationError {
    pub fn field(&self) -> JobField {
        match self {
            ValidationError::QueueNameRequired | ValidationError::UnknownQueue(_) => {
                JobField::QueueName
            }
            ValidationError::JobNameRequired => JobField::JobName,
            ValidationError::InvalidJobData(_) => JobField::Data,
        }
    }
}
