use futures::future::join_all;
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

use crate::{
    auth::providers::USER_AGENT,
    models::{GitHubMember, GitHubUserDetails, OrgMembersResponse, Pagination},
    AppError, AppResult,
};

const ACCEPT: &str = "application/vnd.github.v3+json";
const TIMEOUT: Duration = Duration::from_secs(15);
const MEMBERS_ERROR: &str = "Failed to fetch organization members";

/// Proxy for the GitHub REST API, authenticated with a personal access token
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            token,
        }
    }

    /// API URL joined with percent-encoded path segments, so `org` and `login` stay one segment each
    fn url(&self, segments: &[&str]) -> AppResult<url::Url> {
        let mut url = url::Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid GITHUB_API_URL {}: {}", self.api_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("GITHUB_API_URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn get(&self, token: &str, url: url::Url) -> RequestBuilder {
        self.http
            .get(url)
            .timeout(TIMEOUT)
            .bearer_auth(token)
            .header(header::ACCEPT, ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
    }

    fn token(&self) -> AppResult<&str> {
        self.token.as_deref().ok_or_else(|| {
            AppError::Unauthorized(
                "GitHub authentication required. Please login with GitHub or set GITHUB_TOKEN env variable."
                    .to_string(),
            )
        })
    }

    /// Member summaries for one page, without profile details
    pub async fn list_members(&self, org: &str, per_page: u32, page: u32) -> AppResult<(Vec<GitHubMember>, Pagination)> {
        let token = self.token()?;
        let url = self.url(&["orgs", org, "members"])?;
        let response = self
            .get(token, url)
            .query(&[("per_page", per_page), ("page", page)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(org, error = %e, "GitHub members request failed");
                AppError::Internal("Internal server error".to_string())
            })?;

        if !response.status().is_success() {
            return Err(members_error(response).await);
        }

        let link = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let members: Vec<GitHubMember> = response.json().await.map_err(|e| {
            tracing::error!(org, error = %e, "Failed to parse GitHub members");
            AppError::Internal("Internal server error".to_string())
        })?;

        tracing::debug!(org, page, count = members.len(), "Fetched GitHub organization members");
        Ok((members, parse_pagination(link.as_deref(), page, per_page)))
    }

    /// One page of members with their public profiles fetched concurrently
    pub async fn org_members(&self, org: &str, per_page: u32, page: u32) -> AppResult<OrgMembersResponse> {
        let (members, pagination) = self.list_members(org, per_page, page).await?;
        let token = self.token()?;

        // One detail request per member, all in flight at once
        let members = join_all(members.into_iter().map(|member| self.enrich(token, member))).await;

        Ok(OrgMembersResponse { members, pagination })
    }

    async fn enrich(&self, token: &str, member: GitHubMember) -> GitHubMember {
        let url = match self.url(&["users", member.login.as_str()]) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(login = %member.login, error = %e, "Invalid GitHub user URL");
                return member;
            }
        };
        let result = self.get(token, url).send().await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(login = %member.login, status = %response.status(), "GitHub user details unavailable");
                return member;
            }
            Err(e) => {
                tracing::warn!(login = %member.login, error = %e, "GitHub user details request failed");
                return member;
            }
        };

        match response.json::<GitHubUserDetails>().await {
            Ok(details) => member.with_details(details),
            Err(e) => {
                tracing::warn!(login = %member.login, error = %e, "Failed to parse GitHub user details");
                member
            }
        }
    }
}

async fn members_error(response: Response) -> AppError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let details = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string();

    tracing::error!(status = %status, details, "GitHub API error");
    AppError::Upstream {
        status,
        message: MEMBERS_ERROR.to_string(),
        details: Some(details),
    }
}

/// Pagination from a GitHub `Link` header. Without a header there is a single page;
/// with one, the last page is the highest `page=` seen, never below the current one.
pub fn parse_pagination(link: Option<&str>, current_page: u32, per_page: u32) -> Pagination {
    let mut has_next = false;
    let mut has_prev = false;

    let Some(link) = link.filter(|l| !l.trim().is_empty()) else {
        return Pagination {
            current_page,
            total_pages: 1,
            per_page,
            has_next,
            has_prev,
        };
    };

    let mut total_pages = current_page.max(1);
    for entry in link.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next().map(str::trim) else {
            continue;
        };
        let target = target.trim_start_matches('<').trim_end_matches('>');

        if let Some(page) = page_param(target) {
            total_pages = total_pages.max(page);
        }

        for param in parts {
            match param.trim() {
                r#"rel="next""# => has_next = true,
                r#"rel="prev""# => has_prev = true,
                _ => {}
            }
        }
    }

    Pagination {
        current_page,
        total_pages,
        per_page,
        has_next,
        has_prev,
    }
}

fn page_param(target: &str) -> Option<u32> {
    let url = url::Url::parse(target).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = r#"<https://api.github.com/organizations/1/members?per_page=30&page=2>; rel="next", <https://api.github.com/organizations/1/members?per_page=30&page=4>; rel="last""#;

    #[test]
    fn test_pagination_without_header() {
        assert_eq!(
            parse_pagination(None, 1, 30),
            Pagination {
                current_page: 1,
                total_pages: 1,
                per_page: 30,
                has_next: false,
                has_prev: false,
            }
        );
    }

    #[test]
    fn test_pagination_without_header_is_single_page() {
        let pagination = parse_pagination(None, 3, 30);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.current_page, 3);
        assert!(!pagination.has_next);
    }

    #[test]
    fn test_url_keeps_org_in_one_segment() {
        let client = GitHubClient::new(Client::new(), "https://api.github.com", None);

        let url = client.url(&["orgs", "foo/teams/bar", "members"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/orgs/foo%2Fteams%2Fbar/members");

        let url = client.url(&["users", "../admin"]).unwrap();
        assert_eq!(url.path(), "/users/..%2Fadmin");
    }

    #[test]
    fn test_pagination_first_page() {
        let pagination = parse_pagination(Some(LINK), 1, 30);
        assert_eq!(pagination.total_pages, 4);
        assert!(pagination.has_next);
        assert!(!pagination.has_prev);
    }

    #[test]
    fn test_pagination_ignores_per_page() {
        let link = r#"<https://api.github.com/organizations/1/members?per_page=100&page=2>; rel="next""#;
        assert_eq!(parse_pagination(Some(link), 1, 100).total_pages, 2);
    }

    #[test]
    fn test_pagination_last_page() {
        let link = r#"<https://api.github.com/organizations/1/members?page=3>; rel="prev", <https://api.github.com/organizations/1/members?page=1>; rel="first""#;
        let pagination = parse_pagination(Some(link), 4, 30);
        assert_eq!(pagination.total_pages, 4);
        assert!(!pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let client = GitHubClient::new(Client::new(), "http://127.0.0.1:9", None);
        let err = client.org_members("blockful", 30, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
