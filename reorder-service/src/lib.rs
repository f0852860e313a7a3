pub mod alert_handlers;
pub mod app;
pub mod config;
pub mod notifications;
pub mod reorder_handlers;
pub mod snapshot_handlers;

pub use app::{build_router, AppState, SnapshotStore};
pub use config::ServiceConfig;
