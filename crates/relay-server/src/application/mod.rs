//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod completion_service;
mod inbound_service;
mod persona_service;
mod reply_service;

pub use completion_service::{CompletionService, ASK_MAX_TOKENS};
pub use inbound_service::{InboundEventService, InboundOutcome};
pub use persona_service::PersonaService;
pub use reply_service::ReplyService;
