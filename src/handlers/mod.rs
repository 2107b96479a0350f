pub mod auth_handler;
pub mod calendar_handler;
pub mod dashboard_handler;
pub mod debug;
pub mod github_handler;
pub mod health;
pub mod metrics;
pub mod news_handler;
pub mod ooo_handler;
pub mod payments_handler;
pub mod references_handler;
pub mod reimbursements_handler;
pub mod users_handler;

pub use debug::debug_handler;
pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
