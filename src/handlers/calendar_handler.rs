use axum::{extract::Query, Json};
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    models::{calendar::COMPANY_EVENTS, CalendarDay, CalendarEvent, MonthView},
    AppError, AppResult,
};

/// Six full weeks
const GRID_CELLS: u64 = 42;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// 1-12, defaults to the current month
    pub month: Option<u32>,
}

/// Month grid starting on the Sunday on or before the 1st
pub fn month_grid(year: i32, month: u32, events: &[CalendarEvent]) -> AppResult<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;

    // Back up to the Sunday on or before the 1st
    let offset = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(offset))
        .ok_or_else(|| AppError::BadRequest(format!("Month out of range: {}-{}", year, month)))?;

    // Six full weeks
    let days = start
        .iter_days()
        .take(GRID_CELLS as usize)
        .map(|date| CalendarDay {
            date,
            is_current_month: date.month() == month && date.year() == year,
            events: events.iter().filter(|e| e.day() == date).cloned().collect(),
        })
        .collect();

    Ok(MonthView { year, month, days })
}

/// GET /api/calendar
#[utoipa::path(
    get,
    path = "/api/calendar",
    params(MonthQuery),
    responses(
        (status = 200, description = "42-day grid with events", body = MonthView),
        (status = 400, description = "Invalid year or month")
    ),
    tag = "calendar"
)]
pub async fn get_month(Query(query): Query<MonthQuery>) -> AppResult<Json<MonthView>> {
    let today = Utc::now().date_naive();
    let view = month_grid(
        query.year.unwrap_or(today.year()),
        query.month.unwrap_or(today.month()),
        &COMPANY_EVENTS,
    )?;

    Ok(Json(view))
}

/// GET /api/calendar/events
#[utoipa::path(
    get,
    path = "/api/calendar/events",
    responses(
        (status = 200, description = "All company events", body = Vec<CalendarEvent>)
    ),
    tag = "calendar"
)]
pub async fn list_events() -> Json<Vec<CalendarEvent>> {
    let mut events = COMPANY_EVENTS.clone();
    events.sort_by_key(|e| e.start);
    Json(events)
}
