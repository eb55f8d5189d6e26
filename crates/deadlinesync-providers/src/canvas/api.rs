//! Canvas REST API wire types.
//!
//! Canvas timestamps are UTC; conversions take the target timezone so that
//! every item leaves this module as local wall-clock time.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::source::{Assignment, Course, CourseDetails, CourseEvent, CourseFile};

/// A course as returned by `GET /courses` and `GET /courses/:id`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCourse {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub access_restricted_by_date: bool,
    #[serde(default)]
    pub syllabus_body: Option<String>,
}

impl ApiCourse {
    fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Course {}", self.id))
    }

    /// Converts to a [`Course`]; courses the user can no longer open are dropped.
    pub fn into_course(self) -> Option<Course> {
        if self.access_restricted_by_date {
            return None;
        }
        Some(Course {
            id: self.id,
            name: self.display_name(),
            course_code: self.course_code.filter(|code| !code.is_empty()),
        })
    }

    pub fn into_details(self) -> CourseDetails {
        CourseDetails {
            id: self.id,
            name: self.display_name(),
            syllabus_body: self.syllabus_body,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiAssignment {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl ApiAssignment {
    /// Converts to an [`Assignment`]; assignments without a due date are dropped.
    pub fn into_assignment<Tz: TimeZone>(self, tz: &Tz) -> Option<Assignment> {
        let due_at = self.due_at?.with_timezone(tz).naive_local();
        Some(Assignment {
            id: self.id,
            name: self.name.unwrap_or_else(|| format!("Assignment {}", self.id)),
            due_at,
            description: self.description,
            points_possible: self.points_possible,
            html_url: self.html_url,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCalendarEvent {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl ApiCalendarEvent {
    /// Converts to a [`CourseEvent`]; events without a start are dropped and a
    /// missing end defaults to the start.
    pub fn into_event<Tz: TimeZone>(self, tz: &Tz) -> Option<CourseEvent> {
        let start_at = self.start_at?;
        let end_at = self.end_at.unwrap_or(start_at);
        Some(CourseEvent {
            id: self.id,
            title: self.title.unwrap_or_else(|| format!("Event {}", self.id)),
            start_at: start_at.with_timezone(tz).naive_local(),
            end_at: end_at.with_timezone(tz).naive_local(),
            description: self.description,
            location: self.location_name.filter(|l| !l.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiFile {
    pub id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "content-type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl From<ApiFile> for CourseFile {
    fn from(file: ApiFile) -> Self {
        let url = file
            .url
            .filter(|url| !url.is_empty())
            .or(file.download_url.filter(|url| !url.is_empty()));
        Self {
            id: file.id,
            display_name: file.display_name,
            filename: file.filename,
            content_type: file.content_type,
            url,
        }
    }
}
