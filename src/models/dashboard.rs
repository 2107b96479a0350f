use serde::Serialize;
use utoipa::ToSchema;

use super::Role;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuickAction {
    pub title: String,
    pub description: String,
    pub href: String,
}

/// Entry in the role switcher
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleOption {
    pub role: Role,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub role: Role,
    pub title: String,
    pub subtitle: String,
    pub navigation: Vec<NavItem>,
    pub quick_actions: Vec<QuickAction>,
    pub role_options: Vec<RoleOption>,
}

fn role_options(active: Role) -> Vec<RoleOption> {
    Role::ALL
        .iter()
        .map(|&role| RoleOption {
            role,
            label: role.display_name().to_string(),
            active: role == active,
        })
        .collect()
}

fn nav(label: &str, href: &str) -> NavItem {
    NavItem {
        label: label.to_string(),
        href: href.to_string(),
    }
}

fn action(title: &str, description: &str, href: &str) -> QuickAction {
    QuickAction {
        title: title.to_string(),
        description: description.to_string(),
        href: href.to_string(),
    }
}

impl Dashboard {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                role,
                title: "Admin Dashboard".to_string(),
                subtitle: "System overview and management".to_string(),
                navigation: vec![
                    nav("Dashboard", "/admin"),
                    nav("Reimbursements", "/admin/reimbursement"),
                    nav("OOO", "/admin/ooo"),
                    nav("GitHub Members", "/github-members"),
                ],
                quick_actions: vec![
                    action("Review Reimbursements", "Approve, reject and pay expense claims", "/admin/reimbursement"),
                    action("Team OOO", "See who is out of office", "/admin/ooo"),
                    action("Member Statistics", "Reimbursement and OOO counts per member", "/github-members"),
                ],
                role_options: role_options(role),
            },
            Role::Employee => Self {
                role,
                title: "Employee Dashboard".to_string(),
                subtitle: "Your requests and team updates".to_string(),
                navigation: vec![
                    nav("Dashboard", "/employee"),
                    nav("Reimbursement", "/employee/reimbursement"),
                    nav("OOO", "/employee/ooo"),
                ],
                quick_actions: vec![
                    action("Request Reimbursement", "Submit new reimbursement request", "/employee/reimbursement"),
                    action("Set OOO Status", "Configure out of office status", "/employee/ooo"),
                    action("View OOO Overview", "See team status and your OOO history", "/employee/ooo-list"),
                    action("GateFul News", "OOO, reimbursements, team news & alerts", "/news"),
                    action("Calendar", "View your schedule", "/employee/calendar"),
                    action("Team Members", "View team directory and contacts", "/employee/team"),
                ],
                role_options: role_options(role),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboards_differ_by_role() {
        let admin = Dashboard::for_role(Role::Admin);
        let employee = Dashboard::for_role(Role::Employee);

        assert!(admin.navigation.iter().all(|n| !n.href.starts_with("/employee")));
        assert!(employee.navigation.iter().all(|n| !n.href.starts_with("/admin")));
        assert_eq!(admin.navigation[0].href, Role::Admin.dashboard_root());
        assert_eq!(employee.navigation[0].href, Role::Employee.dashboard_root());
    }

    #[test]
    fn test_role_switcher_marks_active_role() {
        let admin = Dashboard::for_role(Role::Admin);
        let active: Vec<_> = admin.role_options.iter().filter(|o| o.active).collect();

        assert_eq!(admin.role_options.len(), 2);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Administrator");
    }
}
