//! Request/Response DTOs
//!
//! - Persona management
//! - Ask
//! - Generic `{message}` envelope

mod persona;

pub use persona::*;
