//! Client error types.

use std::fmt;

use deadlinesync_providers::ProviderError;

use crate::secret::SecretError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// A secret reference could not be resolved.
    Secret(SecretError),
    /// Canvas, PDF or calendar failure.
    Provider(ProviderError),
    /// IO error.
    Io(std::io::Error),
    /// Bad command-line input.
    Input(String),
    /// Output could not be rendered.
    Output(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Secret(err) => write!(f, "secret error: {}", err),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Output(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Secret(err) => Some(err),
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<SecretError> for ClientError {
    fn from(err: SecretError) -> Self {
        Self::Secret(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_prefixes() {
        assert_eq!(
            ClientError::Config("missing [canvas]".into()).to_string(),
            "configuration error: missing [canvas]"
        );
        let provider: ClientError = ProviderError::authentication("bad token").into();
        assert_eq!(
            provider.to_string(),
            "provider error: authentication_failed: bad token"
        );
    }

    #[test]
    fn sources_are_exposed() {
        let io: ClientError = std::io::Error::other("boom").into();
        assert!(io.source().is_some());
        assert!(ClientError::Input("x".into()).source().is_none());
    }
}
