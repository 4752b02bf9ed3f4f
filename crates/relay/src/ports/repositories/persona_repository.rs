//! Persona Repository Port
//!
//! Key-value access to personas, keyed by name.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Persona};

/// Repository interface for Persona entities
#[async_trait]
pub trait PersonaRepository: Send + Sync {
    /// Find a Persona by name
    async fn find_by_name(&self, name: &str) -> Result<Option<Persona>, DomainError>;

    /// Find all Personas (no ordering guarantee)
    async fn find_all(&self) -> Result<Vec<Persona>, DomainError>;

    /// Save a Persona (insert or overwrite)
    async fn save(&self, persona: &Persona) -> Result<(), DomainError>;

    /// Delete a Persona by name, returns whether a record was removed
    async fn delete(&self, name: &str) -> Result<bool, DomainError>;
}
