use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};

use crate::config::Config;

mod error;

pub use error::ApiError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Build the JSON request body for a registration attempt.
///
/// Values are embedded verbatim. Nothing is escaped, so callers must not pass
/// values containing `"` or `\`.
pub fn build_request_body(username: &str, email: &str, password: &str) -> String {
    format!(
        "{{ \"username\": \"{}\", \"email\": \"{}\", \"password\": \"{}\" }}",
        username, email, password
    )
}

/// Snapshot of a registration response
#[derive(Debug, Clone)]
pub struct RegistrationResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<String>,
}

impl RegistrationResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Option<String>) -> Self {
        Self { status, headers, body }
    }

    /// Consume a reqwest response, reading the full body
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self, ApiError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(ApiError::from_reqwest)?;

        Ok(Self::new(status, headers, Some(body)))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, lossily decoded
    pub fn header(&self, name: &HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Top-level JSON field rendered as a string.
    ///
    /// Returns `None` when the body is absent, is not a JSON object, or the
    /// field is missing or null.
    pub fn json_field(&self, field: &str) -> Option<String> {
        let body = self.body.as_deref()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;

        match value.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// HTTP client for the registration endpoint
pub struct RegistrationClient {
    client: Client,
    register_url: Url,
}

impl RegistrationClient {
    /// Create a client bound to the base URL in `config`
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let register_url = Url::parse(&config.register_url()).map_err(|e| {
            ApiError::InvalidBaseUrl {
                url: config.api.base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { client, register_url })
    }

    pub fn register_url(&self) -> &Url {
        &self.register_url
    }

    /// Send a single POST to `{base_url}/register`. No retries.
    pub async fn register_user(&self, request_body: String) -> Result<RegistrationResponse, ApiError> {
        tracing::debug!("POST {} {}", self.register_url, request_body);

        let response = self.client
            .post(self.register_url.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(request_body)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        tracing::debug!("Received {} from {}", response.status(), self.register_url);

        RegistrationResponse::from_reqwest(response).await
    }
}
