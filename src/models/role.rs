use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Which dashboard the UI renders. Not an authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Employee => "Employee",
        }
    }

    /// Root path of this role's dashboard
    pub fn dashboard_root(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Employee => "/employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Where the UI should be sent when `path` is shown under `role`.
///
/// The root goes to the role's dashboard, and a dashboard path that belongs to
/// the other role is sent back to the active one. Everything else stays put.
pub fn role_redirect(path: &str, role: Role) -> Option<&'static str> {
    if path == "/" {
        return Some(role.dashboard_root());
    }

    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");

    match first_segment.parse::<Role>() {
        Ok(path_role) if path_role != role => Some(role.dashboard_root()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_employee() {
        assert_eq!(Role::default(), Role::Employee);
    }

    #[test]
    fn test_parse_role_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" employee ".parse::<Role>().unwrap(), Role::Employee);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_root_redirects_to_role_dashboard() {
        assert_eq!(role_redirect("/", Role::Admin), Some("/admin"));
        assert_eq!(role_redirect("/", Role::Employee), Some("/employee"));
    }

    #[test]
    fn test_mismatched_dashboard_redirects() {
        assert_eq!(role_redirect("/admin/ooo", Role::Employee), Some("/employee"));
        assert_eq!(role_redirect("/employee", Role::Admin), Some("/admin"));
    }

    #[test]
    fn test_matching_or_neutral_paths_stay() {
        assert_eq!(role_redirect("/admin/reimbursement", Role::Admin), None);
        assert_eq!(role_redirect("/news", Role::Employee), None);
        assert_eq!(role_redirect("/administrator", Role::Employee), None);
    }
}
