//! In-memory port implementations for tests

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

use relay::{
    ChatIntegration, ChatMessage, CompletionOptions, CompletionResponse, DomainError,
    IntegrationEvent, LlmProvider, Persona, PersonaRepository, QueueMessage, TokenUsage,
    WorkQueue,
};
use relay_integration_slack::SlackWebhookHandler;
use tower::ServiceExt;

use crate::application::{CompletionService, InboundEventService, PersonaService};
use crate::AppState;

#[derive(Default)]
pub struct InMemoryPersonaRepository {
    personas: Mutex<HashMap<String, Persona>>,
    unavailable: bool,
}

impl InMemoryPersonaRepository {
    pub fn with(personas: &[Persona]) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.personas.lock().unwrap();
            for p in personas {
                map.insert(p.name.clone(), p.clone());
            }
        }
        repo
    }

    /// Every call fails as if the store were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable {
            Err(DomainError::Repository("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersonaRepository for InMemoryPersonaRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Persona>, DomainError> {
        self.check()?;
        Ok(self.personas.lock().unwrap().get(name).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Persona>, DomainError> {
        self.check()?;
        Ok(self.personas.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, persona: &Persona) -> Result<(), DomainError> {
        self.check()?;
        self.personas
            .lock()
            .unwrap()
            .insert(persona.name.clone(), persona.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        self.check()?;
        Ok(self.personas.lock().unwrap().remove(name).is_some())
    }
}

struct Entry {
    message: QueueMessage,
    visible_at: Instant,
    dead: bool,
}

/// Queue with visibility timeout and dead-lettering, kept in memory
pub struct InMemoryWorkQueue {
    entries: Mutex<Vec<Entry>>,
    max_receive_count: i32,
}

impl Default for InMemoryWorkQueue {
    fn default() -> Self {
        Self::with_max_receive_count(3)
    }
}

impl InMemoryWorkQueue {
    pub fn with_max_receive_count(max_receive_count: i32) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_receive_count,
        }
    }

    /// Bodies of all live (not dead-lettered) messages
    pub fn bodies(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| !e.dead)
            .map(|e| e.message.body.clone())
            .collect()
    }

    pub fn dead_letters(&self) -> usize {
        self.entries.lock().unwrap().iter().filter(|e| e.dead).count()
    }

    /// Make every hidden message visible again
    pub fn expire_visibility(&self) {
        let now = Instant::now();
        for entry in self.entries.lock().unwrap().iter_mut() {
            entry.visible_at = now;
        }
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn send(&self, body: &str) -> Result<Uuid, DomainError> {
        let message = QueueMessage::new(body);
        let id = message.id;
        self.entries.lock().unwrap().push(Entry {
            message,
            visible_at: Instant::now(),
            dead: false,
        });
        Ok(id)
    }

    async fn receive(
        &self,
        max_messages: u32,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        let mut claimed = Vec::new();

        for entry in entries.iter_mut() {
            if entry.dead || entry.visible_at > now {
                continue;
            }
            if entry.message.receive_count >= self.max_receive_count {
                entry.dead = true;
                continue;
            }
            if claimed.len() as u32 >= max_messages {
                break;
            }
            entry.message.receive_count += 1;
            entry.visible_at = now + visibility_timeout;
            claimed.push(entry.message.clone());
        }

        Ok(claimed)
    }

    async fn ack(&self, message_id: Uuid) -> Result<(), DomainError> {
        self.entries
            .lock()
            .unwrap()
            .retain(|e| e.message.id != message_id);
        Ok(())
    }
}

/// LLM that answers with a fixed reply and records every request
pub struct ScriptedLlm {
    reply: Option<String>,
    calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), options.clone()));

        let content = self
            .reply
            .clone()
            .ok_or_else(|| DomainError::ExternalService("LLM unavailable".into()))?;

        Ok(CompletionResponse {
            content,
            model: "scripted".to_string(),
            usage: TokenUsage::default(),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

/// Chat integration that parses Slack payloads and records outbound posts
#[derive(Default)]
pub struct RecordingChat {
    webhook: SlackWebhookHandler,
    sent: Mutex<Vec<(String, String)>>,
    fail_posts: bool,
}

impl RecordingChat {
    pub fn failing() -> Self {
        Self {
            fail_posts: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatIntegration for RecordingChat {
    fn name(&self) -> &str {
        "recording"
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DomainError> {
        if self.fail_posts {
            return Err(DomainError::ExternalService("channel_not_found".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    fn parse_event(&self, payload: &[u8]) -> Result<IntegrationEvent, DomainError> {
        self.webhook.parse_event(payload)
    }
}

// ============================================
// Router helpers
// ============================================

/// Application state over in-memory ports
pub fn app_state(
    repo: Arc<InMemoryPersonaRepository>,
    llm: Arc<ScriptedLlm>,
    queue: Arc<InMemoryWorkQueue>,
) -> AppState {
    let repo: Arc<dyn PersonaRepository> = repo;
    let llm: Arc<dyn LlmProvider> = llm;
    let queue: Arc<dyn WorkQueue> = queue;
    let chat: Arc<dyn ChatIntegration> = Arc::new(RecordingChat::default());

    AppState {
        persona_service: Arc::new(PersonaService::new(repo.clone())),
        completion_service: Arc::new(CompletionService::new(repo, llm)),
        inbound_service: Arc::new(InboundEventService::new(queue)),
        chat,
    }
}

pub fn state_with(repo: Arc<InMemoryPersonaRepository>) -> AppState {
    app_state(
        repo,
        Arc::new(ScriptedLlm::replying("ok")),
        Arc::new(InMemoryWorkQueue::default()),
    )
}

pub async fn send(app: Router, method: Method, uri: &str, body: &str) -> Response {
    send_with_headers(app, method, uri, body, &[]).await
}

pub async fn send_with_headers(
    app: Router,
    method: Method,
    uri: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> Response {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    app.oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
