//! Canvas REST API client.
//!
//! A thin HTTP layer: builds URLs, attaches the bearer token, maps HTTP
//! failures onto [`ProviderError`] and decodes JSON bodies.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::source::CourseFile;

use super::api::{ApiAssignment, ApiCalendarEvent, ApiCourse, ApiFile};
use super::config::CanvasConfig;

/// Canvas API client.
#[derive(Debug)]
pub struct CanvasClient {
    http_client: reqwest::Client,
    config: CanvasConfig,
}

impl CanvasClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: CanvasConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Lists active courses (a single page).
    pub(crate) async fn list_courses(&self) -> ProviderResult<Vec<ApiCourse>> {
        self.get_json(
            "courses",
            &[
                ("enrollment_state", "active".to_string()),
                ("per_page", self.config.per_page.to_string()),
            ],
        )
        .await
    }

    /// Fetches a course including its syllabus body.
    ///
    /// Some Canvas instances reject the `include[]` parameter for certain
    /// roles; in that case the plain course endpoint is used instead.
    pub(crate) async fn get_course(&self, course_id: u64) -> ProviderResult<ApiCourse> {
        let path = format!("courses/{}", course_id);
        match self
            .get_json(&path, &[("include[]", "syllabus_body".to_string())])
            .await
        {
            Ok(course) => Ok(course),
            Err(e) => {
                warn!(course_id, error = %e, "syllabus include failed, retrying without it");
                self.get_json(&path, &[]).await
            }
        }
    }

    pub(crate) async fn list_assignments(&self, course_id: u64) -> ProviderResult<Vec<ApiAssignment>> {
        self.get_json(
            &format!("courses/{}/assignments", course_id),
            &[("per_page", self.config.per_page.to_string())],
        )
        .await
    }

    pub(crate) async fn list_calendar_events(
        &self,
        course_id: u64,
    ) -> ProviderResult<Vec<ApiCalendarEvent>> {
        self.get_json(
            "calendar_events",
            &[
                ("context_codes[]", format!("course_{}", course_id)),
                ("type", "event".to_string()),
                ("per_page", self.config.per_page.to_string()),
            ],
        )
        .await
    }

    pub(crate) async fn list_files(&self, course_id: u64) -> ProviderResult<Vec<ApiFile>> {
        self.get_json(
            &format!("courses/{}/files", course_id),
            &[("per_page", self.config.per_page.to_string())],
        )
        .await
    }

    /// Downloads a file's bytes, following redirects to the file store.
    pub async fn download(&self, file: &CourseFile) -> ProviderResult<Vec<u8>> {
        let url = file
            .url
            .as_deref()
            .ok_or_else(|| ProviderError::not_found("file has no downloadable URL"))?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
        })?;
        debug!(file_id = file.id, bytes = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let url = self.config.api_url(path).map_err(|e| {
            ProviderError::configuration(format!("invalid Canvas URL for {}: {}", path, e))
        })?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.token)
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
        })?;

        debug!(path, bytes = body.len(), "Canvas response");
        parse_body(&body)
    }
}

/// Decodes a JSON response body.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> ProviderResult<T> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e))
            .with_provider("canvas")
            .with_source(e)
    })
}

fn request_error(e: reqwest::Error) -> ProviderError {
    let error = if e.is_timeout() {
        ProviderError::network("request timeout")
    } else if e.is_connect() {
        ProviderError::network(format!("connection failed: {}", e))
    } else {
        ProviderError::network(format!("request failed: {}", e))
    };
    error.with_provider("canvas")
}

/// Maps a non-success HTTP status onto a provider error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let error = match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            ProviderError::authentication("Canvas token is invalid or expired")
        }
        reqwest::StatusCode::FORBIDDEN => ProviderError::authorization("access denied"),
        reqwest::StatusCode::NOT_FOUND => ProviderError::not_found("resource not found"),
        reqwest::StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::rate_limited("rate limit exceeded")
        }
        _ => {
            let body: String = body.chars().take(200).collect();
            ProviderError::server(format!("API error ({}): {}", status, body))
        }
    };
    error.with_provider("canvas")
}
