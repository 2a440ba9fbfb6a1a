// Taskdeck Infrastructure - System Adapters
// Implements: DataSource (mock generator, host statistics decorator)

pub mod host_stats;
pub mod mock_sampler;

pub use host_stats::HostStatsSampler;
pub use mock_sampler::MockSampler;
