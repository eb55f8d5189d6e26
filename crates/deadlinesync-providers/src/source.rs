//! CourseSource trait definition.
//!
//! A [`CourseSource`] supplies everything the sync needs from the learning
//! platform: the course list, syllabus bodies, assignments, calendar events
//! and course files. Canvas is the production implementation; tests use
//! in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

/// A course the user is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Numeric course id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Short course code (e.g. "CS101"), if the platform provides one.
    pub course_code: Option<String>,
}

impl Course {
    /// Creates a course with the given id and name.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            course_code: None,
        }
    }

    /// Builder method to set the course code.
    pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = Some(code.into());
        self
    }
}

/// A course together with its syllabus body.
#[derive(Debug, Clone, Default)]
pub struct CourseDetails {
    pub id: u64,
    pub name: String,
    /// Raw syllabus HTML, if the course has one.
    pub syllabus_body: Option<String>,
}

/// An assignment with a due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    pub name: String,
    /// Due time in local wall-clock time.
    pub due_at: NaiveDateTime,
    pub description: Option<String>,
    pub points_possible: Option<f64>,
    pub html_url: Option<String>,
}

/// A calendar event published on a course calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEvent {
    pub id: u64,
    pub title: String,
    pub start_at: NaiveDateTime,
    /// Defaults to `start_at` when the platform omits it.
    pub end_at: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// A file attached to a course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFile {
    pub id: u64,
    pub display_name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Download location; files without one cannot be fetched.
    pub url: Option<String>,
}

impl CourseFile {
    /// The name shown to users: display name, then filename, then the id.
    pub fn name(&self) -> String {
        self.display_name
            .as_deref()
            .or(self.filename.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("file {}", self.id))
    }

    /// Returns true if the file's MIME type is exactly `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
    }

    /// Returns true if the display name or filename contains any of `keywords`,
    /// ignoring case.
    pub fn name_matches(&self, keywords: &[&str]) -> bool {
        [self.display_name.as_deref(), self.filename.as_deref()]
            .into_iter()
            .flatten()
            .map(str::to_lowercase)
            .any(|name| keywords.iter().any(|keyword| name.contains(keyword)))
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so callers can hold a
/// `&dyn CourseSource`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The learning platform the deadlines come from.
///
/// # Example Implementation
///
/// ```ignore
/// impl CourseSource for CanvasClient {
///     fn name(&self) -> &str { "canvas" }
///
///     fn list_courses(&self) -> BoxFuture<'_, ProviderResult<Vec<Course>>> {
///         Box::pin(async move {
///             let courses = self.get_json("courses", &[("enrollment_state", "active")]).await?;
///             Ok(courses)
///         })
///     }
///     // ... other methods
/// }
/// ```
pub trait CourseSource: Send + Sync {
    /// Returns the name of this source (e.g. "canvas").
    fn name(&self) -> &str;

    /// Lists the user's active courses.
    fn list_courses(&self) -> BoxFuture<'_, ProviderResult<Vec<Course>>>;

    /// Fetches one course with its syllabus body.
    fn fetch_course(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<CourseDetails>>;

    /// Lists assignments that have a due date.
    fn list_assignments(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<Vec<Assignment>>>;

    /// Lists calendar events that have a start time.
    fn list_calendar_events(
        &self,
        course_id: u64,
    ) -> BoxFuture<'_, ProviderResult<Vec<CourseEvent>>>;

    /// Lists the files attached to a course, in platform order.
    fn list_files(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<Vec<CourseFile>>>;

    /// Downloads the bytes of a file.
    fn download_file<'a>(&'a self, file: &'a CourseFile) -> BoxFuture<'a, ProviderResult<Vec<u8>>>;
}
