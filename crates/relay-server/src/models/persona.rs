//! Persona DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Create (or overwrite) persona request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePersonaRequest {
    pub name: String,
    /// System prompt text
    pub persona: String,
}

/// Delete persona by query string
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeletePersonaQuery {
    pub name: Option<String>,
}

/// Ask a persona a question
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    pub name: String,
    pub question: String,
}

/// Persona as listed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonaResponse {
    pub name: String,
    pub persona: String,
}

impl From<relay::Persona> for PersonaResponse {
    fn from(persona: relay::Persona) -> Self {
        Self {
            name: persona.name,
            persona: persona.prompt_text,
        }
    }
}

/// Nested list envelope, kept for existing clients of `GET /personas`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonaListEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Vec<PersonaResponse>,
}

/// `{"message": ...}` body used by every other route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
