// Create Job Use Case

use serde::{Deserialize, Serialize};

use crate::domain::{DashboardData, Job, JobOptions, Priority, ValidationError};

/// Job creation form as submitted by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub queue_name: String,
    pub job_name: String,

    /// Raw JSON text; blank means an empty object
    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub priority: Priority,

    /// Delay in ms
    #[serde(default)]
    pub delay: u64,
}

/// Validate the request against the current snapshot and parse its payload.
///
/// Checks run in a fixed order and stop at the first failure:
/// queue name, job name, payload, queue existence.
pub fn validate_request(
    req: &CreateJobRequest,
    snapshot: &DashboardData,
) -> Result<serde_json::Value, ValidationError> {
    if req.queue_name.trim().is_empty() {
        return Err(ValidationError::QueueNameRequired);
    }
    if req.job_name.trim().is_empty() {
        return Err(ValidationError::JobNameRequired);
    }

    let data = if req.data.trim().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(&req.data).map_err(ValidationError::InvalidJobData)?
    };

    if snapshot.queue(&req.queue_name).is_none() {
        return Err(ValidationError::UnknownQueue(req.queue_name.clone()));
    }

    Ok(data)
}

/// Build the waiting job for a validated request
pub fn build_job(
    req: &CreateJobRequest,
    id: String,
    now_millis: i64,
    data: serde_json::Value,
    attempts: u32,
) -> Job {
    Job::new(
        id,
        now_millis,
        req.queue_name.clone(),
        req.job_name.clone(),
        data,
        JobOptions {
            priority: Some(req.priority),
            delay: Some(req.delay),
            attempts: Some(attempts),
            ..Default::default()
        },
    )
}
