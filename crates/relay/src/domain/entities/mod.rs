//! Domain Entities
//!
//! - Persona: Named system prompt
//! - WorkItem: A pending question awaiting an asynchronous reply
//! - QueueMessage: Envelope handed out by a durable queue

mod persona;
mod queue_message;
mod work_item;

pub use persona::*;
pub use queue_message::*;
pub use work_item::*;
