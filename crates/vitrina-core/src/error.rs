use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationError;

/// Centralized error type for the storefront client
///
/// Every concern has its own enum below; `AppError` is what the binary
/// sees when it does not care which layer failed.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error("api_url '{value}' is not a valid base URL: {source}")]
    ApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

/// Failures of a single gateway call.
///
/// Status codes are passed through as-is; the gateway never decides what a
/// 401 or a 404 means for the page that made the call.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Request rejected before sending: {0}")]
    Validation(#[from] ValidationError),
}

impl GatewayError {
    /// Status code of the server response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// The server refused the attached credential (or its absence).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Outcome of a failed login round trip.
///
/// `Clone` because one result is shared by every caller that asked for the
/// same payload during a mount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("initialization payload is empty")]
    EmptyPayload,

    #[error("host closed before providing an initialization payload")]
    HostClosed,

    #[error("login rejected with status {0}")]
    Rejected(StatusCode),

    #[error("login request failed: {0}")]
    Transport(String),

    #[error("failed to persist session: {0}")]
    Persist(String),
}

impl From<GatewayError> for VerifyError {
    fn from(err: GatewayError) -> Self {
        match err.status() {
            Some(status) => VerifyError::Rejected(status),
            None => VerifyError::Transport(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no authenticated identity in the session")]
    NotAuthenticated,

    #[error("user {0} is not an administrator")]
    NotAdmin(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted storage file: {0}")]
    Corrupted(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("invalid application id '{0}'")]
    InvalidId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_their_code() {
        let err = GatewayError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(VerifyError::from(err), VerifyError::Rejected(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn non_http_failures_become_transport_errors() {
        let err = GatewayError::Validation(ValidationError::Required { field: "text" });
        assert_eq!(err.status(), None);
        assert!(matches!(VerifyError::from(err), VerifyError::Transport(_)));
    }
}
