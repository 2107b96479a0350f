pub mod calendar;
pub mod dashboard;
pub mod github;
pub mod news;
pub mod ooo;
pub mod ooo_input;
pub mod payment;
pub mod reimbursement;
pub mod reimbursement_input;
pub mod role;
pub mod user;

pub use calendar::{CalendarDay, CalendarEvent, MonthView};
pub use dashboard::{Dashboard, NavItem, QuickAction, RoleOption};
pub use github::{GitHubMember, GitHubUserDetails, MemberStats, OrgMembersResponse, Pagination};
pub use news::NewsItem;
pub use ooo::{OooMutationResponse, OooStatus, OooSummary, OooView};
pub use ooo_input::{OooRequest, UpsertOooInput};
pub use payment::{PaymentQuote, PaymentQuoteRequest};
pub use reimbursement::{
    Reimbursement, ReimbursementMutationResponse, ReimbursementStatusUpdate, StatusUpdateResponse,
};
pub use reimbursement_input::{
    CreateReimbursementForm, ReceiptFile, ReimbursementDraft, ReimbursementRequest,
    UpdateStatusInput,
};
pub use role::{role_redirect, Role};
pub use user::{
    BackendUser, CreateUserRequest, CreatedUser, SyncOutcome, SyncResponse, UpdateUserInput,
};
