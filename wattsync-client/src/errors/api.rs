use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    #[error("Malformed response: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ApiError {
    /// Maps a response status to the client-side error taxonomy.
    /// 401/403 are terminal for the session, everything else is a
    /// recoverable transport-level failure.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            status => ApiError::Status(status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
