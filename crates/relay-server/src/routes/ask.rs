//! Ask Route - Synchronous completion as a persona

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use super::{internal_error, parse_body, ApiError};
use crate::models::{AskRequest, MessageResponse};
use crate::AppState;

/// Ask a persona a question and wait for the answer
#[utoipa::path(
    post,
    path = "/persona/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Generated reply", body = MessageResponse),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Ask"
)]
pub async fn ask_persona(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload: AskRequest = parse_body(&body)?;

    let reply = state
        .completion_service
        .ask(&payload.name, &payload.question)
        .await
        .map_err(internal_error)?;

    Ok(Json(MessageResponse::new(reply)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/persona/ask", post(ask_persona))
}
