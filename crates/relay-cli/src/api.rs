//! Persona Relay API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// API Client for Persona Relay
pub struct RelayClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct PersonaResponse {
    pub name: String,
    pub persona: String,
}

/// `GET /personas` wraps the list in a status envelope
#[derive(Debug, Deserialize)]
struct PersonaListEnvelope {
    body: Vec<PersonaResponse>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
struct CreatePersonaRequest<'a> {
    name: &'a str,
    persona: &'a str,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    name: &'a str,
    question: &'a str,
}

impl RelayClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .context("Failed to connect to Persona Relay API")?;

        let resp = check_status(resp).await?;
        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check that the key is accepted by a protected route
    pub async fn verify_key(&self) -> Result<()> {
        self.list_personas().await.map(|_| ())
    }

    /// Create or overwrite a persona
    pub async fn create_persona(&self, name: &str, prompt: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("/persona"))
            .json(&CreatePersonaRequest { name, persona: prompt });

        let resp: MessageResponse = self.send(request).await?;
        Ok(resp.message)
    }

    /// Delete a persona
    pub async fn delete_persona(&self, name: &str) -> Result<String> {
        let request = self.client.delete(self.url(&delete_path(name)));

        let resp: MessageResponse = self.send(request).await?;
        Ok(resp.message)
    }

    /// List all personas
    pub async fn list_personas(&self) -> Result<Vec<PersonaResponse>> {
        let request = self.client.get(self.url("/personas"));

        let envelope: PersonaListEnvelope = self.send(request).await?;
        Ok(envelope.body)
    }

    /// Ask a persona a question
    pub async fn ask(&self, name: &str, question: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("/persona/ask"))
            .json(&AskRequest { name, question });

        let resp: MessageResponse = self.send(request).await?;
        Ok(resp.message)
    }
}

/// `/persona/ask` shadows the path form, so the name goes in the query
fn delete_path(name: &str) -> String {
    format!("/persona?name={}", urlencoding::encode(name))
}

async fn check_status(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    bail!("API error ({}): {}", status, body);
}
