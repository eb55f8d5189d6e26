//! Canvas source configuration.

use std::time::Duration;
use url::Url;

/// Configuration for the Canvas LMS source.
#[derive(Clone)]
pub struct CanvasConfig {
    /// Base URL of the Canvas instance (e.g. `https://school.instructure.com`).
    pub base_url: Url,

    /// API access token, sent as a bearer token.
    pub token: String,

    /// Page size requested from list endpoints.
    pub per_page: u32,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl CanvasConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default page size for list endpoints.
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Creates a new Canvas configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>, token: impl Into<String>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url.as_ref().trim())?;
        Ok(Self {
            base_url: parsed,
            token: token.into(),
            per_page: Self::DEFAULT_PER_PAGE,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("deadlinesync/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page size for list endpoints.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the URL of a REST endpoint under `/api/v1/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not form a valid URL.
    pub fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = format!("{}/api/v1/", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&base)?.join(path.trim_start_matches('/'))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.token.trim().is_empty() {
            return Err("Canvas API token is required");
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err("Canvas base URL must use http or https");
        }
        if self.per_page == 0 {
            return Err("per_page must be greater than zero");
        }
        Ok(())
    }
}

impl std::fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("per_page", &self.per_page)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CanvasConfig::new("https://school.instructure.com", "tok").unwrap();
        assert_eq!(config.per_page, 100);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("deadlinesync/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_url_joins_under_api_v1() {
        let config = CanvasConfig::new("https://school.instructure.com/", "tok").unwrap();
        assert_eq!(
            config.api_url("courses/42/files").unwrap().as_str(),
            "https://school.instructure.com/api/v1/courses/42/files"
        );
        assert_eq!(
            config.api_url("/courses").unwrap().as_str(),
            "https://school.instructure.com/api/v1/courses"
        );
    }

    #[test]
    fn api_url_keeps_a_path_prefix() {
        let config = CanvasConfig::new("https://lms.example.edu/canvas", "tok").unwrap();
        assert_eq!(
            config.api_url("courses").unwrap().as_str(),
            "https://lms.example.edu/canvas/api/v1/courses"
        );
    }

    #[test]
    fn validation() {
        let empty = CanvasConfig::new("https://school.instructure.com", " ").unwrap();
        assert_eq!(empty.validate(), Err("Canvas API token is required"));

        let ftp = CanvasConfig::new("ftp://school.example", "tok").unwrap();
        assert!(ftp.validate().is_err());

        let zero = CanvasConfig::new("https://school.instructure.com", "tok")
            .unwrap()
            .with_per_page(0);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn debug_hides_token() {
        let config = CanvasConfig::new("https://school.instructure.com", "secret-token").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(CanvasConfig::new("not a url", "tok").is_err());
    }
}
