//! [`CourseSource`] implementation for Canvas.

use chrono::Local;
use tracing::{debug, info};

use crate::error::ProviderResult;
use crate::source::{
    Assignment, BoxFuture, Course, CourseDetails, CourseEvent, CourseFile, CourseSource,
};

use super::api::{ApiAssignment, ApiCalendarEvent, ApiCourse};
use super::client::CanvasClient;
use super::config::CanvasConfig;

/// Canvas LMS course source.
///
/// Timestamps are converted from UTC to the machine's local time.
#[derive(Debug)]
pub struct CanvasSource {
    client: CanvasClient,
}

impl CanvasSource {
    /// Creates a new Canvas source.
    pub fn new(config: CanvasConfig) -> ProviderResult<Self> {
        let client = CanvasClient::new(config)?;
        info!(base_url = %client.config().base_url, "Canvas source ready");
        Ok(Self { client })
    }

    /// Returns the underlying API client.
    pub fn client(&self) -> &CanvasClient {
        &self.client
    }
}

impl CourseSource for CanvasSource {
    fn name(&self) -> &str {
        "canvas"
    }

    fn list_courses(&self) -> BoxFuture<'_, ProviderResult<Vec<Course>>> {
        Box::pin(async move {
            let courses: Vec<Course> = self
                .client
                .list_courses()
                .await?
                .into_iter()
                .filter_map(ApiCourse::into_course)
                .collect();
            debug!(count = courses.len(), "listed active courses");
            Ok(courses)
        })
    }

    fn fetch_course(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<CourseDetails>> {
        Box::pin(async move { Ok(self.client.get_course(course_id).await?.into_details()) })
    }

    fn list_assignments(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<Vec<Assignment>>> {
        Box::pin(async move {
            let assignments: Vec<Assignment> = self
                .client
                .list_assignments(course_id)
                .await?
                .into_iter()
                .filter_map(|a: ApiAssignment| a.into_assignment(&Local))
                .collect();
            debug!(course_id, count = assignments.len(), "listed dated assignments");
            Ok(assignments)
        })
    }

    fn list_calendar_events(
        &self,
        course_id: u64,
    ) -> BoxFuture<'_, ProviderResult<Vec<CourseEvent>>> {
        Box::pin(async move {
            let events: Vec<CourseEvent> = self
                .client
                .list_calendar_events(course_id)
                .await?
                .into_iter()
                .filter_map(|e: ApiCalendarEvent| e.into_event(&Local))
                .collect();
            debug!(course_id, count = events.len(), "listed calendar events");
            Ok(events)
        })
    }

    fn list_files(&self, course_id: u64) -> BoxFuture<'_, ProviderResult<Vec<CourseFile>>> {
        Box::pin(async move {
            let files = self.client.list_files(course_id).await?;
            Ok(files.into_iter().map(CourseFile::from).collect())
        })
    }

    fn download_file<'a>(&'a self, file: &'a CourseFile) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        Box::pin(self.client.download(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn source_name() {
        let config = CanvasConfig::new("https://school.instructure.com", "tok").unwrap();
        let source = CanvasSource::new(config).unwrap();
        assert_eq!(source.name(), "canvas");
        assert_eq!(source.client().config().per_page, 100);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CanvasConfig::new("https://school.instructure.com", "").unwrap();
        let err = CanvasSource::new(config).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
    }
}
