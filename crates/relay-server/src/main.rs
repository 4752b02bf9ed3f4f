use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod testing;

use adapters::{OpenAiProvider, PgPersonaRepository, PgWorkQueue};
use application::{CompletionService, InboundEventService, PersonaService, ReplyService};
use config::AppConfig;
use relay::{ChatIntegration, LlmProvider, PersonaRepository, WorkQueue};
use relay_integration_slack::SlackIntegration;
use services::queue_poller::QueuePoller;

/// Application services over trait objects, so adapters can be swapped
pub type AppPersonaService = PersonaService<dyn PersonaRepository>;
pub type AppCompletionService = CompletionService<dyn PersonaRepository, dyn LlmProvider>;
pub type AppInboundService = InboundEventService<dyn WorkQueue>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub persona_service: Arc<AppPersonaService>,
    pub completion_service: Arc<AppCompletionService>,
    pub inbound_service: Arc<AppInboundService>,
    pub chat: Arc<dyn ChatIntegration>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the full router: public health/docs/webhook, protected admin routes
fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(routes::persona::router())
        .merge(routes::ask::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::slack::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Persona Relay initializing...");

    let config = AppConfig::from_secrets(&secrets)?;

    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No RELAY_API_KEY set - authentication disabled");
    }

    if config.slack.signing_secret.is_none() {
        tracing::warn!("⚠️  No SLACK_SIGNING_SECRET set - Slack requests are not verified");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {e}"))?;

    tracing::info!("✅ Database migrations completed");

    // Adapters
    let repo: Arc<dyn PersonaRepository> = Arc::new(PgPersonaRepository::new(pool.clone()));
    let queue: Arc<dyn WorkQueue> = Arc::new(PgWorkQueue::new(pool, config.queue.clone()));
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(config.openai.clone()));
    let chat: Arc<dyn ChatIntegration> = Arc::new(
        SlackIntegration::new(config.slack.clone())
            .map_err(|e| anyhow::anyhow!("Failed to build Slack client: {e}"))?,
    );

    tracing::info!("🤖 LLM provider: {} ({})", llm.provider_name(), llm.model_id());

    // Application services
    let persona_service = Arc::new(PersonaService::new(repo.clone()));
    let completion_service = Arc::new(CompletionService::new(repo, llm));
    let inbound_service = Arc::new(InboundEventService::new(queue.clone()));
    let reply_service = Arc::new(ReplyService::new(
        completion_service.clone(),
        chat.clone(),
        config.max_reply_tokens,
    ));

    // Background queue worker
    let _handles = QueuePoller::new(queue, reply_service, config.poller.clone()).start();

    let state = AppState {
        persona_service,
        completion_service,
        inbound_service,
        chat,
    };

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Persona Relay ready");

    Ok(app(state).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{body_json, send, state_with, InMemoryPersonaRepository};
    use axum::http::{Method, StatusCode};
    use relay::Persona;

    #[tokio::test]
    async fn test_health() {
        let app = app(state_with(Arc::new(InMemoryPersonaRepository::default())));
        let resp = send(app, Method::GET, "/health", "").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_router_serves_every_surface() {
        let app = app(state_with(Arc::new(InMemoryPersonaRepository::default())));

        let resp = send(app.clone(), Method::GET, "/personas", "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(
            app,
            Method::POST,
            "/slack/Einstein",
            r#"{"challenge":"abc"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_persona_named_ask_deletes_by_query() {
        let repo = Arc::new(InMemoryPersonaRepository::with(&[Persona::new("ask", "p")]));
        let app = app(state_with(repo.clone()));

        let resp = send(app, Method::DELETE, "/persona?name=ask", "").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(repo.find_by_name("ask").await.unwrap().is_none());
    }
}
