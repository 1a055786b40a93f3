use anyhow::Result;
use serde::Serialize;

use crate::api::{build_request_body, RegistrationClient, RegistrationResponse};
use crate::assertions::{assert_common_response, assert_common_response_with_error, AssertionError};

pub const ERROR_MESSAGE_MISSING_PASSWORD: &str = "Missing password";
pub const ERROR_MESSAGE_DEFINED_USERS: &str = "Note: Only defined users succeed registration";

/// What a scenario's response is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "error", rename_all = "snake_case")]
pub enum Expectation {
    /// Only the common status/header/body checks
    CommonResponse,
    /// Common checks plus an exact `error` field
    ErrorMessage(&'static str),
}

/// A named registration attempt and its expected outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub expectation: Expectation,
}

pub const EXISTING_USER: Scenario = Scenario {
    name: "existing-user",
    label: "Existing user",
    username: "Emma Wong",
    email: "emma.wong@reqres.in",
    password: "password123",
    expectation: Expectation::CommonResponse,
};

pub const UNAUTHORIZED_USER: Scenario = Scenario {
    name: "unauthorized-user",
    label: "Unauthorized user",
    username: "Unauthorized User",
    email: "unauthorized.user@reqres.in",
    password: "password123",
    expectation: Expectation::CommonResponse,
};

pub const BLANK_PASSWORD: Scenario = Scenario {
    name: "blank-password",
    label: "User with blank password",
    username: "Blank Password User",
    email: "blank.password@reqres.in",
    password: "",
    expectation: Expectation::ErrorMessage(ERROR_MESSAGE_MISSING_PASSWORD),
};

pub const NO_EMAIL: Scenario = Scenario {
    name: "no-email",
    label: "User without email",
    username: "No Email User",
    email: "",
    password: "password123",
    expectation: Expectation::ErrorMessage(ERROR_MESSAGE_DEFINED_USERS),
};

impl Scenario {
    pub fn all() -> [Scenario; 4] {
        [EXISTING_USER, UNAUTHORIZED_USER, BLANK_PASSWORD, NO_EMAIL]
    }

    pub fn find(name: &str) -> Option<Scenario> {
        Self::all().into_iter().find(|s| s.name == name)
    }

    pub fn request_body(&self) -> String {
        build_request_body(self.username, self.email, self.password)
    }

    /// Run the assertion chain for this scenario against a response
    pub fn check(&self, response: &RegistrationResponse) -> Result<(), AssertionError> {
        match self.expectation {
            Expectation::CommonResponse => assert_common_response(response, self.label),
            Expectation::ErrorMessage(expected) => {
                assert_common_response_with_error(response, self.label, expected)
            }
        }
    }

    /// Send the request and check the response.
    ///
    /// Transport failures surface as `ApiError`, failed checks as
    /// `AssertionError`, both wrapped in `anyhow::Error`.
    pub async fn execute(&self, client: &RegistrationClient) -> Result<RegistrationResponse> {
        tracing::debug!("Running scenario {}", self.name);

        let response = client.register_user(self.request_body()).await?;
        self.check(&response)?;

        Ok(response)
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::CommonResponse => write!(f, "400 with common headers"),
            Expectation::ErrorMessage(error) => write!(f, "400 with error \"{}\"", error),
        }
    }
}
