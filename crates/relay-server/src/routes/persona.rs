//! Persona Routes - Persona Management
//!
//! HTTP handlers that delegate to PersonaService.

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};

use super::{internal_error, parse_body, ApiError};
use crate::models::{
    CreatePersonaRequest, DeletePersonaQuery, MessageResponse, PersonaListEnvelope,
    PersonaResponse,
};
use crate::AppState;

/// Create or overwrite a persona
#[utoipa::path(
    post,
    path = "/persona",
    request_body = CreatePersonaRequest,
    responses(
        (status = 200, description = "Persona created successfully", body = MessageResponse),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Persona"
)]
pub async fn create_persona(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload: CreatePersonaRequest = parse_body(&body)?;

    state
        .persona_service
        .create(payload.name, payload.persona)
        .await
        .map_err(internal_error)?;

    Ok(Json(MessageResponse::new("Persona created successfully")))
}

/// Delete a persona by path
#[utoipa::path(
    delete,
    path = "/persona/{name}",
    params(("name" = String, Path, description = "Persona name")),
    responses(
        (status = 200, description = "Persona deleted successfully", body = MessageResponse),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Persona"
)]
pub async fn delete_persona(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(name) = path.map_err(internal_error)?;
    remove(&state, &name).await
}

/// Delete a persona by query string
#[utoipa::path(
    delete,
    path = "/persona",
    params(DeletePersonaQuery),
    responses(
        (status = 200, description = "Persona deleted successfully", body = MessageResponse),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Persona"
)]
pub async fn delete_persona_by_query(
    State(state): State<AppState>,
    query: Result<Query<DeletePersonaQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(query) = query.map_err(internal_error)?;
    let name = query
        .name
        .ok_or_else(|| internal_error(relay::DomainError::missing_field("name")))?;
    remove(&state, &name).await
}

async fn remove(state: &AppState, name: &str) -> Result<Json<MessageResponse>, ApiError> {
    state
        .persona_service
        .delete(name)
        .await
        .map_err(internal_error)?;

    Ok(Json(MessageResponse::new("Persona deleted successfully")))
}

/// List all personas
#[utoipa::path(
    get,
    path = "/personas",
    responses(
        (status = 200, description = "All personas in a nested envelope", body = PersonaListEnvelope),
        (status = 500, description = "Error processing message", body = MessageResponse)
    ),
    tag = "Persona"
)]
pub async fn list_personas(
    State(state): State<AppState>,
) -> Result<Json<PersonaListEnvelope>, ApiError> {
    let personas = state
        .persona_service
        .list_all()
        .await
        .map_err(internal_error)?;

    Ok(Json(PersonaListEnvelope {
        status_code: 200,
        body: personas.into_iter().map(PersonaResponse::from).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/persona",
            post(create_persona).delete(delete_persona_by_query),
        )
        .route("/persona/:name", delete(delete_persona))
        .route("/personas", get(list_personas))
}
