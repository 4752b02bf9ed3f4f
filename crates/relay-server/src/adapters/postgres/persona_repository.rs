//! PostgreSQL implementation of PersonaRepository

use async_trait::async_trait;
use sqlx::PgPool;

use relay::{DomainError, Persona, PersonaRepository};

/// PostgreSQL implementation of PersonaRepository
pub struct PgPersonaRepository {
    pool: PgPool,
}

impl PgPersonaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct PersonaRow {
    name: String,
    persona: String,
}

impl From<PersonaRow> for Persona {
    fn from(row: PersonaRow) -> Self {
        Self {
            name: row.name,
            prompt_text: row.persona,
        }
    }
}

#[async_trait]
impl PersonaRepository for PgPersonaRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Persona>, DomainError> {
        let row =
            sqlx::query_as::<_, PersonaRow>("SELECT name, persona FROM personas WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Persona>, DomainError> {
        let rows = sqlx::query_as::<_, PersonaRow>("SELECT name, persona FROM personas")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save(&self, persona: &Persona) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO personas (name, persona)
            VALUES ($1, $2)
            ON CONFLICT (name)
            DO UPDATE SET persona = EXCLUDED.persona, updated_at = NOW()
            "#,
        )
        .bind(&persona.name)
        .bind(&persona.prompt_text)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM personas WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
