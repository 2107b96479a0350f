use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const OOO_REASONS: [&str; 6] = [
    "Vacation",
    "Sick Leave",
    "Business Trip",
    "Training",
    "Personal",
    "Other",
];

/// OOO record as stored by the backend. Dates are passed through as sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OooStatus {
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub active: bool,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub message: String,
    pub emergency_contact: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl OooStatus {
    /// True when `today` falls inside the record's start/end dates (inclusive).
    pub fn covers(&self, today: NaiveDate) -> bool {
        match (parse_day(&self.start_date), parse_day(&self.end_date)) {
            (Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }
}

/// Accepts plain `YYYY-MM-DD` dates and RFC 3339 timestamps.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OooMutationResponse {
    pub message: String,
    pub ooo: Option<OooStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OooSummary {
    pub active: usize,
    pub inactive: usize,
    pub total: usize,
    /// Active records whose dates include today
    pub out_today: usize,
    pub currently_out: Vec<OooStatus>,
}

impl OooSummary {
    pub fn from_statuses(statuses: Vec<OooStatus>, today: NaiveDate) -> Self {
        let total = statuses.len();
        let currently_out: Vec<OooStatus> = statuses.into_iter().filter(|s| s.active).collect();
        Self {
            active: currently_out.len(),
            inactive: total - currently_out.len(),
            total,
            out_today: currently_out.iter().filter(|s| s.covers(today)).count(),
            currently_out,
        }
    }
}

/// Which records the OOO list returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OooView {
    #[default]
    All,
    /// Colleagues currently out
    Team,
    My,
}

impl OooView {
    pub fn apply(self, statuses: Vec<OooStatus>, email: &str) -> Vec<OooStatus> {
        match self {
            OooView::All => statuses,
            OooView::Team => statuses
                .into_iter()
                .filter(|s| s.active && !s.user_email.eq_ignore_ascii_case(email))
                .collect(),
            OooView::My => statuses
                .into_iter()
                .filter(|s| s.user_email.eq_ignore_ascii_case(email))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(email: &str, active: bool) -> OooStatus {
        OooStatus {
            id: format!("ooo-{}", email),
            user_name: "Ana".to_string(),
            user_email: email.to_string(),
            active,
            start_date: "2024-01-10".to_string(),
            end_date: "2024-01-20T00:00:00.000Z".to_string(),
            reason: "Vacation".to_string(),
            message: "Back after the holidays".to_string(),
            emergency_contact: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_parse_day_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(parse_day("2024-01-20"), Some(expected));
        assert_eq!(parse_day("2024-01-20T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_day("20/01/2024"), None);
    }

    #[test]
    fn test_covers_is_inclusive() {
        let status = sample("ana@blockful.io", true);
        assert!(status.covers(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()));
        assert!(status.covers(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()));
        assert!(!status.covers(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()));
    }

    #[test]
    fn test_views() {
        let statuses = vec![
            sample("me@blockful.io", true),
            sample("a@blockful.io", true),
            sample("b@blockful.io", false),
        ];

        assert_eq!(OooView::All.apply(statuses.clone(), "me@blockful.io").len(), 3);

        let team = OooView::Team.apply(statuses.clone(), "me@blockful.io");
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].user_email, "a@blockful.io");

        let mine = OooView::My.apply(statuses, "ME@blockful.io");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_email, "me@blockful.io");
    }

    #[test]
    fn test_summary_counts() {
        let mut later = sample("c@blockful.io", true);
        later.start_date = "2024-02-01".to_string();
        later.end_date = "2024-02-03".to_string();

        let summary = OooSummary::from_statuses(
            vec![
                sample("a@blockful.io", true),
                sample("b@blockful.io", false),
                later,
            ],
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.out_today, 1);
        assert!(summary.currently_out.iter().all(|s| s.active));
    }

    #[test]
    fn test_deserializes_backend_record() {
        let record: OooStatus = serde_json::from_value(serde_json::json!({
            "id": "1",
            "userName": "Ana",
            "userEmail": "ana@blockful.io",
            "active": true,
            "startDate": "2024-01-10",
            "endDate": "2024-01-12",
            "reason": "Training",
            "message": "At a conference",
            "emergencyContact": null,
            "createdAt": "2024-01-01T10:00:00Z",
            "updatedAt": "2024-01-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.user_email, "ana@blockful.io");
        assert!(record.emergency_contact.is_none());
    }
}
