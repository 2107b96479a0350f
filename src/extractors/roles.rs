use moka::future::Cache;
use std::time::Duration;

use crate::models::Role;

/// Active UI role per session. Lives only in memory; a session with no entry is an employee.
#[derive(Clone)]
pub struct RoleStore {
    cache: Cache<String, Role>,
}

impl RoleStore {
    pub fn new(session_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(session_ttl)
            .max_capacity(10_000)
            .build();

        Self { cache }
    }

    pub async fn current(&self, session_id: &str) -> Role {
        self.cache.get(session_id).await.unwrap_or_default()
    }

    /// Called whenever a session is created
    pub async fn reset(&self, session_id: &str) {
        self.cache.insert(session_id.to_string(), Role::Employee).await;
    }

    /// Store the new role and return the dashboard root to navigate to.
    /// Switching to the role already active changes nothing.
    pub async fn switch(&self, session_id: &str, role: Role) -> Option<&'static str> {
        if self.current(session_id).await == role {
            return None;
        }

        self.cache.insert(session_id.to_string(), role).await;
        tracing::info!(session_id, role = %role, "Role switched");

        Some(role.dashboard_root())
    }

    pub async fn clear(&self, session_id: &str) {
        self.cache.invalidate(session_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RoleStore {
        RoleStore::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_unknown_session_is_employee() {
        assert_eq!(store().current("missing").await, Role::Employee);
    }

    #[tokio::test]
    async fn test_switch_returns_dashboard_root() {
        let store = store();
        assert_eq!(store.switch("s1", Role::Admin).await, Some("/admin"));
        assert_eq!(store.current("s1").await, Role::Admin);
        assert_eq!(store.switch("s1", Role::Employee).await, Some("/employee"));
    }

    #[tokio::test]
    async fn test_switch_to_same_role_is_noop() {
        let store = store();
        store.reset("s1").await;
        assert_eq!(store.switch("s1", Role::Employee).await, None);
    }

    #[tokio::test]
    async fn test_reset_returns_to_employee() {
        let store = store();
        store.switch("s1", Role::Admin).await;
        store.reset("s1").await;
        assert_eq!(store.current("s1").await, Role::Employee);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store();
        store.switch("s1", Role::Admin).await;
        assert_eq!(store.current("s2").await, Role::Employee);
        store.clear("s1").await;
        assert_eq!(store.current("s1").await, Role::Employee);
    }
}
