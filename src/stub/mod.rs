// Local stand-in for the reqres.in registration endpoint

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::StubConfig;
use crate::models::scenario::{ERROR_MESSAGE_DEFINED_USERS, ERROR_MESSAGE_MISSING_PASSWORD};

pub const ERROR_MESSAGE_MALFORMED: &str = "Malformed request body";
pub const ERROR_MESSAGE_MISSING_IDENTITY: &str = "Missing email or username";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: usize,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
struct StubState {
    defined_users: Arc<Vec<String>>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message.to_string() }),
    )
        .into_response()
}

/// Outcome of a registration attempt against a set of defined users
pub fn decide(body: &RegisterBody, defined_users: &[String]) -> Result<RegisteredResponse, &'static str> {
    if is_blank(&body.email) && is_blank(&body.username) {
        return Err(ERROR_MESSAGE_MISSING_IDENTITY);
    }
    if is_blank(&body.password) {
        return Err(ERROR_MESSAGE_MISSING_PASSWORD);
    }

    let email = body.email.as_deref().unwrap_or_default();
    let index = defined_users
        .iter()
        .position(|user| user == email)
        .ok_or(ERROR_MESSAGE_DEFINED_USERS)?;

    Ok(RegisteredResponse {
        id: index + 1,
        token: uuid::Uuid::new_v4().simple().to_string(),
    })
}

async fn register(
    State(state): State<StubState>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            tracing::debug!("Rejected registration body: {}", rejection.body_text());
            return bad_request(ERROR_MESSAGE_MALFORMED);
        }
    };

    match decide(&body, &state.defined_users) {
        Ok(registered) => {
            tracing::info!("Registered {}", body.email.as_deref().unwrap_or_default());
            (StatusCode::OK, Json(registered)).into_response()
        }
        Err(message) => bad_request(message),
    }
}

pub fn router(config: &StubConfig) -> Result<Router> {
    let server_name = HeaderValue::from_str(&config.server_name)
        .with_context(|| format!("Invalid server name {:?}", config.server_name))?;

    let state = StubState {
        defined_users: Arc::new(config.defined_users.clone()),
    };

    Ok(Router::new()
        .route("/register", post(register))
        .layer(SetResponseHeaderLayer::if_not_present(header::SERVER, server_name))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve the stub on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, config: &StubConfig) -> Result<()> {
    let app = router(config)?;
    let addr = listener.local_addr().context("Failed to read listener address")?;

    tracing::info!("Registration stub listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Stub server failed")
}
