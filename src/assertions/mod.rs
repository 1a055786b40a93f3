// Response checks shared by every registration scenario

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use reqwest::StatusCode;
use thiserror::Error;

use crate::api::{RegistrationResponse, CONTENT_TYPE_JSON};

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// A failed response check, tagged with the scenario label
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    #[error("[{label}] wrong status code: expected {expected}, got {actual}")]
    StatusCode { label: String, expected: u16, actual: u16 },

    #[error("[{label}] {header} header is missing")]
    MissingHeader { label: String, header: &'static str },

    #[error("[{label}] wrong Content-Type: expected {expected}, got {actual}")]
    ContentType { label: String, expected: String, actual: String },

    #[error("[{label}] Content-Length is not a number: {actual}")]
    ContentLength { label: String, actual: String },

    #[error("[{label}] response body is missing")]
    MissingBody { label: String },

    #[error("[{label}] error message missing from response")]
    MissingErrorMessage { label: String },

    #[error("[{label}] wrong error message: expected {expected:?}, got {actual:?}")]
    ErrorMessage { label: String, expected: String, actual: String },
}

impl AssertionError {
    pub fn label(&self) -> &str {
        match self {
            AssertionError::StatusCode { label, .. }
            | AssertionError::MissingHeader { label, .. }
            | AssertionError::ContentType { label, .. }
            | AssertionError::ContentLength { label, .. }
            | AssertionError::MissingBody { label }
            | AssertionError::MissingErrorMessage { label }
            | AssertionError::ErrorMessage { label, .. } => label,
        }
    }
}

pub fn assert_bad_request(response: &RegistrationResponse, label: &str) -> Result<(), AssertionError> {
    let actual = response.status();
    if actual != StatusCode::BAD_REQUEST {
        return Err(AssertionError::StatusCode {
            label: label.to_string(),
            expected: StatusCode::BAD_REQUEST.as_u16(),
            actual: actual.as_u16(),
        });
    }

    tracing::info!(
        "Response for {}: {}",
        label,
        response.body().unwrap_or_default()
    );
    Ok(())
}

/// Status, header and body checks applied to every scenario
pub fn assert_common_response(response: &RegistrationResponse, label: &str) -> Result<(), AssertionError> {
    assert_bad_request(response, label)?;
    assert_content_type(response, label, CONTENT_TYPE_JSON)?;
    assert_content_length_present(response, label)?;
    assert_server_header_present(response, label)?;
    assert_body_present(response, label)
}

pub fn assert_common_response_with_error(
    response: &RegistrationResponse,
    label: &str,
    expected_error: &str,
) -> Result<(), AssertionError> {
    assert_common_response(response, label)?;

    let actual = response
        .json_field("error")
        .ok_or_else(|| AssertionError::MissingErrorMessage { label: label.to_string() })?;

    if actual != expected_error {
        return Err(AssertionError::ErrorMessage {
            label: label.to_string(),
            expected: expected_error.to_string(),
            actual,
        });
    }
    Ok(())
}

fn assert_content_type(
    response: &RegistrationResponse,
    label: &str,
    expected: &str,
) -> Result<(), AssertionError> {
    let actual = response.header(&CONTENT_TYPE).ok_or_else(|| AssertionError::MissingHeader {
        label: label.to_string(),
        header: "Content-Type",
    })?;

    if !actual.to_lowercase().contains(&expected.to_lowercase()) {
        return Err(AssertionError::ContentType {
            label: label.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    tracing::debug!("Content-Type check passed for {}: {}", label, actual);
    Ok(())
}

fn assert_content_length_present(response: &RegistrationResponse, label: &str) -> Result<(), AssertionError> {
    let actual = response.header(&CONTENT_LENGTH).ok_or_else(|| AssertionError::MissingHeader {
        label: label.to_string(),
        header: "Content-Length",
    })?;

    if !NUMERIC.is_match(&actual) {
        return Err(AssertionError::ContentLength { label: label.to_string(), actual });
    }
    Ok(())
}

fn assert_server_header_present(response: &RegistrationResponse, label: &str) -> Result<(), AssertionError> {
    match response.header(&SERVER) {
        Some(_) => Ok(()),
        None => Err(AssertionError::MissingHeader {
            label: label.to_string(),
            header: "Server",
        }),
    }
}

// Presence only: an empty body passes.
fn assert_body_present(response: &RegistrationResponse, label: &str) -> Result<(), AssertionError> {
    match response.body() {
        Some(_) => Ok(()),
        None => Err(AssertionError::MissingBody { label: label.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::{HeaderMap, HeaderValue};

    const LABEL: &str = "User with blank password";

    fn headers(content_type: Option<&'static str>, length: Option<&'static str>, server: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(v));
        }
        if let Some(v) = length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static(v));
        }
        if let Some(v) = server {
            headers.insert(SERVER, HeaderValue::from_static(v));
        }
        headers
    }

    fn bad_request(body: &str) -> RegistrationResponse {
        RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json; charset=utf-8"), Some("28"), Some("cloudflare")),
            Some(body.to_string()),
        )
    }

    #[test]
    fn test_common_response_passes() {
        let response = bad_request(r#"{"error":"Missing password"}"#);
        assert_eq!(assert_common_response(&response, LABEL), Ok(()));
    }

    #[test]
    fn test_wrong_status_code() {
        let response = RegistrationResponse::new(
            StatusCode::OK,
            headers(Some("application/json"), Some("2"), Some("cloudflare")),
            Some("{}".to_string()),
        );
        assert_eq!(
            assert_bad_request(&response, LABEL),
            Err(AssertionError::StatusCode {
                label: LABEL.to_string(),
                expected: 400,
                actual: 200,
            })
        );
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("Application/JSON"), Some("2"), Some("nginx")),
            Some("{}".to_string()),
        );
        assert_eq!(assert_common_response(&response, LABEL), Ok(()));
    }

    #[test]
    fn test_wrong_content_type() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("text/html"), Some("2"), Some("nginx")),
            Some("{}".to_string()),
        );
        let err = assert_common_response(&response, LABEL).unwrap_err();
        assert_eq!(
            err,
            AssertionError::ContentType {
                label: LABEL.to_string(),
                expected: "application/json".to_string(),
                actual: "text/html".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "[User with blank password] wrong Content-Type: expected application/json, got text/html"
        );
    }

    #[test]
    fn test_missing_content_length() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json"), None, Some("nginx")),
            Some("{}".to_string()),
        );
        assert!(matches!(
            assert_common_response(&response, LABEL),
            Err(AssertionError::MissingHeader { header: "Content-Length", .. })
        ));
    }

    #[test]
    fn test_non_numeric_content_length() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json"), Some("12a"), Some("nginx")),
            Some("{}".to_string()),
        );
        assert!(matches!(
            assert_common_response(&response, LABEL),
            Err(AssertionError::ContentLength { actual, .. }) if actual == "12a"
        ));
    }

    #[test]
    fn test_non_ascii_digit_content_length() {
        let mut headers = headers(Some("application/json"), None, Some("nginx"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_bytes("٣٤".as_bytes()).unwrap());
        let response = RegistrationResponse::new(StatusCode::BAD_REQUEST, headers, Some("{}".to_string()));

        assert_eq!(
            assert_common_response(&response, LABEL),
            Err(AssertionError::ContentLength {
                label: LABEL.to_string(),
                actual: "٣٤".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_server_header() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json"), Some("2"), None),
            Some("{}".to_string()),
        );
        assert!(matches!(
            assert_common_response(&response, LABEL),
            Err(AssertionError::MissingHeader { header: "Server", .. })
        ));
    }

    #[test]
    fn test_empty_body_still_passes() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json"), Some("0"), Some("nginx")),
            Some(String::new()),
        );
        assert_eq!(assert_common_response(&response, LABEL), Ok(()));
    }

    #[test]
    fn test_absent_body_fails() {
        let response = RegistrationResponse::new(
            StatusCode::BAD_REQUEST,
            headers(Some("application/json"), Some("0"), Some("nginx")),
            None,
        );
        assert_eq!(
            assert_common_response(&response, LABEL),
            Err(AssertionError::MissingBody { label: LABEL.to_string() })
        );
    }

    #[test]
    fn test_expected_error_message() {
        let response = bad_request(r#"{"error":"Missing password"}"#);
        assert_eq!(
            assert_common_response_with_error(&response, LABEL, "Missing password"),
            Ok(())
        );
    }

    #[test]
    fn test_error_message_is_case_sensitive() {
        let response = bad_request(r#"{"error":"missing password"}"#);
        let err = assert_common_response_with_error(&response, LABEL, "Missing password").unwrap_err();
        assert_eq!(err.label(), LABEL);
        assert_eq!(
            err,
            AssertionError::ErrorMessage {
                label: LABEL.to_string(),
                expected: "Missing password".to_string(),
                actual: "missing password".to_string(),
            }
        );
    }

    #[test]
    fn test_error_message_must_match_whole_string() {
        let response = bad_request(r#"{"error":"Missing password!"}"#);
        assert!(matches!(
            assert_common_response_with_error(&response, LABEL, "Missing password"),
            Err(AssertionError::ErrorMessage { .. })
        ));
    }

    #[test]
    fn test_missing_error_field() {
        let response = bad_request(r#"{"message":"nope"}"#);
        assert_eq!(
            assert_common_response_with_error(&response, LABEL, "Missing password"),
            Err(AssertionError::MissingErrorMessage { label: LABEL.to_string() })
        );
    }
}
