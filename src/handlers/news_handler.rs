use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    news::{ALL_CATEGORIES, COMPANY_NEWS, NEWS_CATEGORIES},
    NewsItem,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NewsQuery {
    /// Case-insensitive match on title or content
    pub search: Option<String>,
    /// One of the feed categories; "All" matches everything
    pub category: Option<String>,
    /// Only important items
    #[serde(default)]
    pub important: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub items: Vec<NewsItem>,
    pub categories: Vec<String>,
    pub unread: usize,
}

pub fn filter_news(items: &[NewsItem], query: &NewsQuery) -> Vec<NewsItem> {
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

    let mut filtered: Vec<NewsItem> = items
        .iter()
        .filter(|item| match &search {
            Some(term) => {
                item.title.to_lowercase().contains(term) || item.content.to_lowercase().contains(term)
            }
            None => true,
        })
        .filter(|item| category.map_or(true, |c| item.category == c))
        .filter(|item| !query.important || item.is_important)
        .cloned()
        .collect();

    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

/// GET /api/news
#[utoipa::path(
    get,
    path = "/api/news",
    params(NewsQuery),
    responses(
        (status = 200, description = "Filtered company news, newest first", body = NewsFeed)
    ),
    tag = "news"
)]
pub async fn get_news(Query(query): Query<NewsQuery>) -> Json<NewsFeed> {
    let items = filter_news(&COMPANY_NEWS, &query);

    Json(NewsFeed {
        unread: items.iter().filter(|item| !item.is_read).count(),
        items,
        categories: NEWS_CATEGORIES.iter().map(|c| c.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[NewsItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_unfiltered_is_newest_first() {
        let items = filter_news(&COMPANY_NEWS, &NewsQuery::default());
        assert_eq!(ids(&items), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_content() {
        let query = NewsQuery {
            search: Some("GROWTH".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_news(&COMPANY_NEWS, &query)), vec!["2"]);

        let query = NewsQuery {
            search: Some("dental".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_news(&COMPANY_NEWS, &query)), vec!["5"]);
    }

    #[test]
    fn test_category_all_matches_everything() {
        let query = NewsQuery {
            category: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_news(&COMPANY_NEWS, &query).len(), 5);

        let query = NewsQuery {
            category: Some("Benefits".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_news(&COMPANY_NEWS, &query)), vec!["5"]);
    }

    #[test]
    fn test_important_only() {
        let query = NewsQuery {
            important: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter_news(&COMPANY_NEWS, &query)), vec!["1", "2"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let query = NewsQuery {
            search: Some("quantum".to_string()),
            category: Some("Events".to_string()),
            important: false,
        };
        assert!(filter_news(&COMPANY_NEWS, &query).is_empty());
    }
}
