use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Organization member, optionally enriched with the public user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GitHubMember {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub site_admin: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Profile fields from `GET /users/{login}`
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUserDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl GitHubMember {
    pub fn with_details(mut self, details: GitHubUserDetails) -> Self {
        self.name = details.name;
        self.email = details.email;
        self.bio = details.bio;
        self.location = details.location;
        self.company = details.company;
        self.blog = details.blog;
        self.twitter_username = details.twitter_username;
        self.public_repos = details.public_repos;
        self.public_gists = details.public_gists;
        self.followers = details.followers;
        self.following = details.following;
        self.created_at = details.created_at;
        self.updated_at = details.updated_at;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrgMembersResponse {
    pub members: Vec<GitHubMember>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReimbursementCounters {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OooCounters {
    pub total: u64,
    pub active: u64,
    pub upcoming: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberStats {
    pub member: GitHubMember,
    pub reimbursements: ReimbursementCounters,
    pub ooo: OooCounters,
}

impl MemberStats {
    /// Placeholder counters derived from the member id so they stay stable between loads.
    pub fn seeded(member: GitHubMember) -> Self {
        let seed = member.id;
        Self {
            reimbursements: ReimbursementCounters {
                total: seed % 10 + 1,
                pending: seed % 3 + 1,
                approved: (seed % 8) / 2 + 1,
                rejected: (seed % 4) / 3,
            },
            ooo: OooCounters {
                total: seed % 5 + 1,
                active: seed % 2,
                upcoming: seed % 3 + 1,
                completed: (seed % 4) / 2,
            },
            member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64) -> GitHubMember {
        serde_json::from_value(serde_json::json!({
            "login": "octocat",
            "id": id,
            "avatar_url": "https://avatars.githubusercontent.com/u/1",
            "html_url": "https://github.com/octocat",
            "type": "User",
            "site_admin": false
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_member_defaults_counters() {
        let m = member(1);
        assert_eq!(m.kind, "User");
        assert_eq!(m.followers, 0);
        assert!(m.name.is_none());
    }

    #[test]
    fn test_with_details_merges_profile() {
        let details: GitHubUserDetails = serde_json::from_value(serde_json::json!({
            "name": "The Octocat",
            "company": "@github",
            "followers": 42,
            "public_repos": 8
        }))
        .unwrap();

        let enriched = member(1).with_details(details);
        assert_eq!(enriched.name.as_deref(), Some("The Octocat"));
        assert_eq!(enriched.followers, 42);
        assert_eq!(enriched.login, "octocat");
    }

    #[test]
    fn test_seeded_stats_are_deterministic() {
        let stats = MemberStats::seeded(member(7));
        assert_eq!(
            stats.reimbursements,
            ReimbursementCounters { total: 8, pending: 2, approved: 4, rejected: 1 }
        );
        assert_eq!(
            stats.ooo,
            OooCounters { total: 3, active: 1, upcoming: 2, completed: 1 }
        );
    }
}
