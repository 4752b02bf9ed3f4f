//! Slack Route - Events API webhook
//!
//! Must answer within Slack's reply budget, so user messages are only
//! enqueued here; the queue poller produces and posts the reply.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use relay::ports::RequestSignature;

use super::{internal_error, ApiError};
use crate::application::InboundOutcome;
use crate::models::MessageResponse;
use crate::AppState;

const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Receive a Slack event for a persona
#[utoipa::path(
    post,
    path = "/slack/{persona}",
    params(("persona" = String, Path, description = "Persona answering this channel")),
    request_body(content = String, description = "Slack Events API envelope", content_type = "application/json"),
    responses(
        (status = 200, description = "Challenge echoed, bot event ignored, or message enqueued"),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Slack"
)]
pub async fn slack_event(
    State(state): State<AppState>,
    persona: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Path(persona) = persona.map_err(internal_error)?;
    let signature = RequestSignature {
        timestamp: header_str(&headers, TIMESTAMP_HEADER),
        signature: header_str(&headers, SIGNATURE_HEADER),
    };
    state
        .chat
        .verify_request(&signature, &body)
        .map_err(internal_error)?;

    let event = state.chat.parse_event(&body).map_err(internal_error)?;
    tracing::debug!("Slack event for {}: {:?}", persona, event);

    let outcome = state
        .inbound_service
        .accept(&persona, event)
        .await
        .map_err(internal_error)?;

    Ok(match outcome {
        InboundOutcome::Challenge(challenge) => (StatusCode::OK, challenge).into_response(),
        InboundOutcome::IgnoredBot => {
            Json(MessageResponse::new("Bot triggered this event")).into_response()
        }
        InboundOutcome::Enqueued { .. } => {
            Json(MessageResponse::new("Message processed successfully")).into_response()
        }
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/slack/:persona", post(slack_event))
}
