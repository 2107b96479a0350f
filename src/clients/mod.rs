pub mod backend;
pub mod github;
pub mod ooo;
pub mod reimbursements;
pub mod users;

pub use backend::BackendClient;
pub use github::GitHubClient;
