// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique job ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production), ids look like `job-<uuid>`
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        format!("job-{}", uuid::Uuid::new_v4())
    }
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Hands out `job-1`, `job-2`, ...
    #[derive(Default)]
    pub struct SequentialIdProvider {
        next: AtomicU64,
    }

    impl IdProvider for SequentialIdProvider {
        fn generate_id(&self) -> String {
            format!("job-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique_and_prefixed() {
        let a = UuidProvider.generate_id();
        let b = UuidProvider.generate_id();
        assert!(a.starts_with("job-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = mocks::SequentialIdProvider::default();
        assert_eq!(ids.generate_id(), "job-1");
        assert_eq!(ids.generate_id(), "job-2");
    }
}
