use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    models::{MemberStats, OrgMembersResponse},
    AppError, AppResult, AppState,
};

const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrgMembersQuery {
    pub org: Option<String>,
    /// Defaults to 30, at most 100
    pub per_page: Option<u32>,
    /// Defaults to 1
    pub page: Option<u32>,
}

impl OrgMembersQuery {
    fn org(&self) -> AppResult<&str> {
        self.org
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .ok_or_else(|| AppError::BadRequest("Organization name is required".to_string()))
    }

    fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(30).clamp(1, MAX_PER_PAGE)
    }

    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// GET /api/github/org-members
#[utoipa::path(
    get,
    path = "/api/github/org-members",
    params(OrgMembersQuery),
    responses(
        (status = 200, description = "Members with profiles and pagination", body = OrgMembersResponse),
        (status = 400, description = "Organization name is required"),
        (status = 401, description = "GITHUB_TOKEN is not configured")
    ),
    tag = "github"
)]
pub async fn org_members(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrgMembersQuery>,
) -> AppResult<Json<OrgMembersResponse>> {
    let org = query.org()?;
    let response = state
        .github
        .org_members(org, query.per_page(), query.page())
        .await?;

    Ok(Json(response))
}

/// GET /api/github/member-stats
#[utoipa::path(
    get,
    path = "/api/github/member-stats",
    params(OrgMembersQuery),
    responses(
        (status = 200, description = "Reimbursement and OOO counters per member", body = Vec<MemberStats>),
        (status = 400, description = "Organization name is required")
    ),
    tag = "github"
)]
pub async fn member_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrgMembersQuery>,
) -> AppResult<Json<Vec<MemberStats>>> {
    let org = query.org()?;
    // Summaries only, no per-member detail fetch
    let (members, _) = state
        .github
        .list_members(org, query.per_page.unwrap_or(MAX_PER_PAGE).clamp(1, MAX_PER_PAGE), query.page())
        .await?;

    Ok(Json(members.into_iter().map(MemberStats::seeded).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(org: Option<&str>, per_page: Option<u32>, page: Option<u32>) -> OrgMembersQuery {
        OrgMembersQuery {
            org: org.map(str::to_string),
            per_page,
            page,
        }
    }

    #[test]
    fn test_org_is_required() {
        assert!(matches!(query(None, None, None).org(), Err(AppError::BadRequest(_))));
        assert!(matches!(query(Some("  "), None, None).org(), Err(AppError::BadRequest(_))));
        assert_eq!(query(Some("blockful"), None, None).org().unwrap(), "blockful");
    }

    #[test]
    fn test_paging_defaults_and_bounds() {
        let q = query(Some("blockful"), None, None);
        assert_eq!((q.per_page(), q.page()), (30, 1));

        let q = query(Some("blockful"), Some(500), Some(0));
        assert_eq!((q.per_page(), q.page()), (100, 1));
    }
}
