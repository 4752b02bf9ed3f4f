//! Service Ports
//!
//! Abstract interfaces for external services.

pub mod llm_provider;
pub mod work_queue;

pub use llm_provider::*;
pub use work_queue::*;
