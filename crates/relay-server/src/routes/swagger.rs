//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AskRequest, CreatePersonaRequest, MessageResponse, PersonaListEnvelope, PersonaResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Persona endpoints
        super::persona::create_persona,
        super::persona::delete_persona,
        super::persona::delete_persona_by_query,
        super::persona::list_personas,
        // Ask endpoints
        super::ask::ask_persona,
        // Slack endpoints
        super::slack::slack_event,
    ),
    info(
        title = "Persona Relay API",
        version = "0.1.0",
        description = "Persona management and Slack-to-LLM relay.\n\nPersonas are named system prompts; Slack messages are answered asynchronously through a durable queue.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Persona", description = "Persona - Named system prompt management"),
        (name = "Ask", description = "Ask - Synchronous completion as a persona"),
        (name = "Slack", description = "Slack - Events API webhook"),
    ),
    components(
        schemas(
            CreatePersonaRequest,
            AskRequest,
            PersonaResponse,
            PersonaListEnvelope,
            MessageResponse,
        )
    ),
)]
pub struct ApiDoc;
