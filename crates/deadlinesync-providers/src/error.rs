//! Failures from the collaborators: Canvas, the PDF converter and the
//! calendar targets.
//!
//! The walker and the aggregation step match on [`ProviderResult`] per
//! document or per course, so one bad file never aborts a run.

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of which collaborator reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Canvas rejected the token (401).
    AuthenticationFailed,
    /// The token may not read this course or file (403).
    AuthorizationFailed,
    /// No response from Canvas or a file host.
    NetworkError,
    /// Canvas throttled the token (429).
    RateLimited,
    /// Any other non-success HTTP status.
    ServerError,
    /// A body that is not the JSON shape Canvas documents.
    InvalidResponse,
    /// Course, file or calendar event does not exist.
    NotFound,
    /// Base URL, token or page size unusable.
    ConfigurationError,
    /// Bytes that do not convert to text.
    DocumentError,
    /// A calendar target failed to read, find or write an event.
    CalendarError,
    /// Local filesystem failure outside a calendar target.
    IoError,
}

impl ProviderErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::DocumentError => "document_error",
            Self::CalendarError => "calendar_error",
            Self::IoError => "io_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed collaborator call.
///
/// Rendered as `[canvas] not_found: ...`; the bracketed part is present once
/// [`with_provider`](Self::with_provider) names the collaborator. The
/// rendered text is what ends up in an `error` candidate's description.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    fn with_code(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::AuthorizationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::ConfigurationError, message)
    }

    /// PDF (or other document) conversion failure.
    pub fn document(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::DocumentError, message)
    }

    pub fn calendar(message: impl Into<String>) -> Self {
        Self::with_code(ProviderErrorCode::CalendarError, message)
    }

    /// Names the collaborator: `"canvas"`, `"pdf"`, `"ics"` or `"memory"`.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Keeps the underlying error for `Error::source`.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider {
            Some(ref provider) => write!(f, "[{}] {}: {}", provider, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::with_code(ProviderErrorCode::IoError, err.to_string()).with_source(err)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_names() {
        assert_eq!(ProviderErrorCode::DocumentError.as_str(), "document_error");
        assert_eq!(ProviderErrorCode::CalendarError.to_string(), "calendar_error");
    }

    #[test]
    fn document_failure_without_provider() {
        let err = ProviderError::document("no text layer");
        assert_eq!(err.code(), ProviderErrorCode::DocumentError);
        assert_eq!(err.message(), "no text layer");
        assert!(err.provider().is_none());
        assert_eq!(err.to_string(), "document_error: no text layer");
    }

    #[test]
    fn provider_prefix_in_rendering() {
        let err = ProviderError::network("connection reset").with_provider("canvas");
        assert_eq!(err.to_string(), "[canvas] network_error: connection reset");
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;
        let err: ProviderError = std::io::Error::other("disk full").into();
        assert_eq!(err.code(), ProviderErrorCode::IoError);
        assert!(err.source().is_some());
        assert!(err.message().contains("disk full"));
    }
}
