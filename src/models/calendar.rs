use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub is_all_day: bool,
    pub color: String,
}

impl CalendarEvent {
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

fn at(date: (i32, u32, u32), hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn event(
    id: &str,
    title: &str,
    description: &str,
    span: (NaiveDateTime, NaiveDateTime),
    location: Option<&str>,
    attendees: &[&str],
    color: &str,
) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        start: span.0,
        end: span.1,
        location: location.map(str::to_string),
        attendees: attendees.iter().map(|a| a.to_string()).collect(),
        is_all_day: false,
        color: color.to_string(),
    }
}

pub static COMPANY_EVENTS: Lazy<Vec<CalendarEvent>> = Lazy::new(|| {
    let mut collective_vacation = event(
        "4",
        "Collective Vacation",
        "Company collective vacation period",
        (at((2024, 1, 20), 0, 0), at((2024, 1, 20), 0, 0)),
        None,
        &[],
        "purple",
    );
    collective_vacation.is_all_day = true;

    vec![
        event(
            "1",
            "Team Meeting",
            "Weekly meeting for project alignment",
            (at((2024, 1, 15), 10, 0), at((2024, 1, 15), 11, 0)),
            Some("Meeting Room A"),
            &["John Silva", "Mary Santos", "Peter Costa"],
            "blue",
        ),
        event(
            "2",
            "Project Presentation",
            "Presentation of the new project to the client",
            (at((2024, 1, 16), 14, 0), at((2024, 1, 16), 15, 30)),
            Some("Main Auditorium"),
            &["Ana Oliveira", "Carlos Lima"],
            "green",
        ),
        event(
            "3",
            "Safety Training",
            "Mandatory training on workplace safety",
            (at((2024, 1, 17), 9, 0), at((2024, 1, 17), 12, 0)),
            Some("Training Room"),
            &["All employees"],
            "red",
        ),
        collective_vacation,
    ]
});
