use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::extractors::SESSION_COOKIE;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GateFul API",
        version = "0.1.0",
        description = "Corporate portal service: OOO tracking, reimbursements, news, calendar and GitHub organization members"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Auth
        crate::handlers::auth_handler::sign_in,
        crate::handlers::auth_handler::oauth_callback,
        crate::handlers::auth_handler::get_session,
        crate::handlers::auth_handler::sign_out,
        crate::handlers::auth_handler::get_role,
        crate::handlers::auth_handler::switch_role,

        // Dashboards
        crate::handlers::dashboard_handler::dashboard,

        // OOO
        crate::handlers::ooo_handler::list_ooo,
        crate::handlers::ooo_handler::ooo_summary,
        crate::handlers::ooo_handler::get_my_ooo,
        crate::handlers::ooo_handler::upsert_ooo,
        crate::handlers::ooo_handler::delete_my_ooo,

        // Reimbursements
        crate::handlers::reimbursements_handler::list_reimbursements,
        crate::handlers::reimbursements_handler::create_reimbursement,
        crate::handlers::reimbursements_handler::update_reimbursement_status,

        // Payments
        crate::handlers::payments_handler::quote_payment,

        // Users
        crate::handlers::users_handler::sync_user,
        crate::handlers::users_handler::get_me,
        crate::handlers::users_handler::update_me,

        // GitHub
        crate::handlers::github_handler::org_members,
        crate::handlers::github_handler::member_stats,

        // News and calendar
        crate::handlers::news_handler::get_news,
        crate::handlers::calendar_handler::get_month,
        crate::handlers::calendar_handler::list_events,

        // References
        crate::handlers::references_handler::get_ooo_reasons,
        crate::handlers::references_handler::get_reimbursement_categories,
    ),
    components(
        schemas(
            crate::models::Role,
            crate::models::Dashboard,
            crate::models::NavItem,
            crate::models::QuickAction,
            crate::models::RoleOption,
            crate::models::OooStatus,
            crate::models::OooSummary,
            crate::models::OooView,
            crate::models::UpsertOooInput,
            crate::models::OooMutationResponse,
            crate::models::Reimbursement,
            crate::models::CreateReimbursementForm,
            crate::models::ReimbursementMutationResponse,
            crate::models::UpdateStatusInput,
            crate::models::StatusUpdateResponse,
            crate::models::ReimbursementStatusUpdate,
            crate::models::PaymentQuoteRequest,
            crate::models::PaymentQuote,
            crate::models::BackendUser,
            crate::models::UpdateUserInput,
            crate::models::SyncResponse,
            crate::models::SyncOutcome,
            crate::models::GitHubMember,
            crate::models::Pagination,
            crate::models::OrgMembersResponse,
            crate::models::MemberStats,
            crate::models::NewsItem,
            crate::models::CalendarEvent,
            crate::models::CalendarDay,
            crate::models::MonthView,
            crate::handlers::news_handler::NewsFeed,
            crate::handlers::auth_handler::SessionResponse,
            crate::handlers::auth_handler::SessionUserView,
            crate::handlers::auth_handler::SwitchRoleRequest,
            crate::handlers::auth_handler::RoleResponse,
            crate::handlers::auth_handler::RoleEcho,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "OAuth sign-in, session and role switch"),
        (name = "dashboard", description = "Role dashboards"),
        (name = "ooo", description = "Out-of-office status"),
        (name = "reimbursements", description = "Expense reimbursements"),
        (name = "payments", description = "USD to ETH payout quotes"),
        (name = "users", description = "Backend user sync"),
        (name = "github", description = "GitHub organization members"),
        (name = "news", description = "Company news feed"),
        (name = "calendar", description = "Company calendar"),
        (name = "references", description = "Reference data"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/ooo",
            "/api/reimbursements/{id}",
            "/api/payments/quote",
            "/api/github/org-members",
            "/api/auth/role",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
