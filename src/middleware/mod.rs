pub mod metrics;
pub mod request_id;
pub mod secret_auth;
pub mod session_gate;

pub use metrics::metrics_middleware;
pub use request_id::{request_id_middleware, RequestId};
pub use secret_auth::require_debug_key;
pub use session_gate::{is_protected_path, login_redirect, session_gate};
