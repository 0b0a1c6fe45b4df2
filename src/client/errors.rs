use thiserror::Error;

/// Failures surfaced to the calling view. None of them touch the session.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unable to reach the server: {0}")]
    NetworkFailure(String),
    #[error("request timed out")]
    Timeout,
    #[error("request failed ({status}): {message}")]
    RemoteRejection { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// True when the backend refused the credentials we sent (or their absence).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::RemoteRejection {
                status: 401 | 403,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::NetworkFailure(err.to_string())
        }
    }
}
