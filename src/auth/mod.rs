pub mod claims;
pub mod jwt;
pub mod oauth_state;
pub mod providers;

pub use claims::SessionClaims;
pub use jwt::{issue_session, validate_session};
pub use oauth_state::{generate_state, sanitize_callback, validate_state};
pub use providers::{allow_sign_in, provider_for, IdentityProvider, Provider, ProviderProfile};
