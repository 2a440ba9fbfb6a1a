// Data Source Port
// Where the store pulls fresh snapshots from on every refresh tick

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DashboardData, DomainError};

/// Sampling failures
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Inconsistent sample: {0}")]
    Domain(#[from] DomainError),
}

/// Snapshot provider
///
/// Implementations:
/// - MockSampler: pseudo-random dashboard data
/// - HostStatsSampler: decorates another source with real host readings
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Produce a complete snapshot.
    ///
    /// Derived totals in the returned data need not be consistent; the store
    /// recomputes them before publishing.
    async fn sample(&self) -> Result<DashboardData, SourceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted reply for one `sample()` call
    #[derive(Debug, Clone)]
    pub enum Reply {
        Data(DashboardData),
        Unavailable(String),
    }

    /// Replays scripted replies in order, repeating the last one forever
    pub struct ScriptedSource {
        replies: Arc<Mutex<VecDeque<Reply>>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl ScriptedSource {
        pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into_iter().collect())),
                call_count: Arc::new(Mutex::new(0)),
            }
        }
        pub fn always(data: DashboardData) -> Self {
            Self::new([Reply::Data(data)])
        }
        pub fn push(&self, reply: Reply) {
            self.replies.lock().unwrap().push_back(reply);
        }
        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        async fn sample(&self) -> Result<DashboardData, SourceError> {
            *self.call_count.lock().unwrap() += 1;

            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.len() > 1 {
                    replies.pop_front()
                } else {
                    replies.front().cloned()
                }
            };

            match reply {
                Some(Reply::Data(data)) => Ok(data),
                Some(Reply::Unavailable(msg)) => Err(SourceError::Unavailable(msg)),
                None => Err(SourceError::Unavailable("no scripted reply".to_string())),
            }
        }
    }
}
