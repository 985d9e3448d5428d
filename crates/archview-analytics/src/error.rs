#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics API key not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API responded with {status}")]
    Status { status: reqwest::StatusCode },
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}
