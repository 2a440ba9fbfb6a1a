// Application Layer - Dashboard store and derived views

pub mod constants;
pub mod shutdown;
pub mod store;
pub mod views;

// Re-exports
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use store::{CreateJobRequest, DashboardStore, Notification, NotificationKind, StoreHandle};
