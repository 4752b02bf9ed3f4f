//! Persona Application Service (Use Case)
//!
//! Orchestrates domain operations for persona management.

use std::sync::Arc;

use relay::{DomainError, Persona, PersonaRepository};

/// Application service for Persona operations
pub struct PersonaService<R: PersonaRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: PersonaRepository + ?Sized> PersonaService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create or overwrite a persona
    pub async fn create(&self, name: String, prompt_text: String) -> Result<Persona, DomainError> {
        let persona = Persona::new(name, prompt_text);
        self.repo.save(&persona).await?;

        tracing::info!("Saved persona: {}", persona.name);

        Ok(persona)
    }

    /// Delete a persona, absent names are not an error
    pub async fn delete(&self, name: &str) -> Result<(), DomainError> {
        if self.repo.delete(name).await? {
            tracing::info!("Deleted persona: {}", name);
        } else {
            tracing::debug!("Delete of unknown persona: {}", name);
        }
        Ok(())
    }

    /// Get a persona by name
    pub async fn get(&self, name: &str) -> Result<Persona, DomainError> {
        self.repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found("Persona", name))
    }

    /// Get all personas
    pub async fn list_all(&self) -> Result<Vec<Persona>, DomainError> {
        self.repo.find_all().await
    }
}
