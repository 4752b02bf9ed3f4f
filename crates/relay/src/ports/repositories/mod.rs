//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod persona_repository;

pub use persona_repository::*;
