//! Persona Relay Domain Library
//!
//! Core domain types and interfaces for bridging chat platform messages
//! to an LLM through named personas.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Persona, WorkItem, QueueMessage
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Persona persistence
//!   - `services/`: LLM provider and durable work queue
//!   - `integration`: Chat platform (events in, messages out)
//!
//! # Usage
//!
//! ```rust,ignore
//! use relay::domain::{Persona, WorkItem};
//! use relay::ports::{PersonaRepository, WorkQueue};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{DomainError, Persona, QueueMessage, WorkItem};
pub use ports::{
    ChatIntegration, ChatMessage, CompletionOptions, CompletionResponse, IntegrationEvent,
    LlmProvider, MessageRole, PersonaRepository, RequestSignature, TokenUsage, WorkQueue,
};
