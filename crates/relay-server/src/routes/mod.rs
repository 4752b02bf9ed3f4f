//! Persona Relay API Routes
//!
//! - /persona, /personas - Persona management
//! - /persona/ask - Synchronous completion
//! - /slack/:persona - Slack Events API webhook
//!
//! Every failure is logged and answered with the same generic 500.

use axum::{http::StatusCode, Json};
use std::fmt::Display;

use crate::models::MessageResponse;

pub mod ask;
pub mod persona;
pub mod slack;
pub mod swagger;

pub const ERROR_MESSAGE: &str = "Error processing message";

pub type ApiError = (StatusCode, Json<MessageResponse>);

/// Log the cause and collapse it into the generic error response
pub fn internal_error<E: Display>(err: E) -> ApiError {
    tracing::error!("{}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new(ERROR_MESSAGE)),
    )
}

/// Parse a JSON request body; malformed or incomplete bodies are failures
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(internal_error)
}
