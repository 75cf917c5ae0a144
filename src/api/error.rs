use serde_json::Value;

/// Discriminant of an [`ApiError`], for callers that only need to branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Transport,
    Status,
    Malformed,
}

/// Failure of one backend call, validated at the network boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Transport(_) => ApiErrorKind::Transport,
            ApiError::Status { .. } => ApiErrorKind::Status,
            ApiError::Malformed(_) => ApiErrorKind::Malformed,
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        ApiError::Malformed(detail.into())
    }

    /// Builds a status error from a non-2xx body, preferring the server's
    /// `message` or `error` field over `fallback`.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| fallback.to_string());
        ApiError::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

pub type ApiResult<T> = Result<T, ApiError>;
