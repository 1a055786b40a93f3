use thiserror::Error;

/// Transport-level errors raised while talking to the registration endpoint
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_builder() {
            ApiError::Client(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}
