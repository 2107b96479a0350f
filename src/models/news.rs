use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ALL_CATEGORIES: &str = "All";

pub const NEWS_CATEGORIES: [&str; 6] = [
    ALL_CATEGORIES,
    "Policies",
    "Results",
    "Technology",
    "Events",
    "Benefits",
];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub date: NaiveDate,
    pub is_important: bool,
    pub is_read: bool,
    pub tags: Vec<String>,
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    title: &str,
    content: &str,
    category: &str,
    author: &str,
    date: (i32, u32, u32),
    is_important: bool,
    is_read: bool,
    tags: &[&str],
) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        author: author.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
        is_important,
        is_read,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Company announcements shown in the feed
pub static COMPANY_NEWS: Lazy<Vec<NewsItem>> = Lazy::new(|| {
    vec![
        item(
            "1",
            "New Remote Work Policy",
            "Starting next month, we will implement a new remote work policy that will allow employees to work from home up to 3 days per week. This change aims to improve work-life balance.",
            "Policies",
            "Human Resources",
            (2024, 1, 15),
            true,
            false,
            &["remote work", "policy", "benefits"],
        ),
        item(
            "2",
            "Quarter Results - 25% Growth",
            "We are pleased to announce that our company achieved 25% growth in the last quarter. This result is the fruit of the dedicated work of the entire team and the trust of our clients.",
            "Results",
            "Management",
            (2024, 1, 10),
            true,
            true,
            &["results", "growth", "success"],
        ),
        item(
            "3",
            "New Project Management System",
            "We are implementing a new project management system that will significantly improve our productivity and communication between teams. Training will be offered next week.",
            "Technology",
            "IT",
            (2024, 1, 8),
            false,
            false,
            &["system", "productivity", "training"],
        ),
        item(
            "4",
            "Company Event - January 2024",
            "Next Saturday, January 20th, we will hold our annual company event. The event will be held at Central Event Space, starting at 7pm. All employees are invited!",
            "Events",
            "Communication",
            (2024, 1, 5),
            false,
            true,
            &["event", "celebration", "social"],
        ),
        item(
            "5",
            "Health Plan Update",
            "We inform you that our health plan has been updated with new coverages and benefits. Starting in February, all employees will have access to online consultations and expanded dental coverage.",
            "Benefits",
            "Human Resources",
            (2024, 1, 3),
            false,
            false,
            &["health", "benefits", "plan"],
        ),
    ]
});
