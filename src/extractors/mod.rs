pub mod auth;
pub mod roles;

pub use auth::{session_from_headers, SessionUser, SESSION_COOKIE};
pub use roles::RoleStore;
