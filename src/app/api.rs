use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::session::{Session, SessionStore, ViewState};
use crate::content::{ContentRequest, GeneratedContent};
use crate::environment::Config;
use crate::llm::{self, GenerationClient};
use crate::prompt;
use crate::providers::{images, markets, news, profile, NewsProvider};
use crate::science;

const NEWS_PANEL_LIMIT: usize = 5;

const SHORT_CONTENT_ADVISORY: &str =
    "El contenido generado es demasiado corto. Intenta aumentar el límite de tokens.";

/// Shared state injected into every handler. The session store owns all view
/// state; handlers receive it explicitly rather than reading anything global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub llm: GenerationClient,
    pub news: Option<Arc<dyn NewsProvider>>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let llm = GenerationClient::new(
            http.clone(),
            config.generation_endpoint.clone(),
            config.hf_token.clone(),
        );
        let news: Option<Arc<dyn NewsProvider>> =
            news::provider_from_config(&config, http.clone()).map(Arc::from);
        AppState {
            config: Arc::new(config),
            http,
            llm,
            news,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Envelope returned by every session endpoint: the rendered view plus any
/// user-facing advisories (short content, empty results, missing keys).
#[derive(Serialize)]
pub struct ViewResponse {
    pub session_id: Uuid,
    pub view: ViewState,
    pub data: Value,
    pub advisories: Vec<String>,
}

#[derive(Deserialize)]
struct ViewRequest {
    view: ViewState,
}

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(flatten)]
    request: ContentRequest,
    #[serde(default)]
    image_query: Option<String>,
}

#[derive(Deserialize)]
struct ProfileRequest {
    symbol: String,
}

#[derive(Deserialize)]
struct ScienceRequest {
    area: String,
    #[serde(default)]
    personalization_info: Option<String>,
}

/// Sets up and runs the API server.
pub async fn app_api_loop(config: Config) -> Result<()> {
    let port = config.port;
    let state = AppState::new(config);

    let app = Router::new()
        .route("/status", get(status_check))
        .route("/session", post(create_session))
        .route("/session/{id}", get(render_session).delete(delete_session))
        .route("/session/{id}/view", post(select_view))
        .route("/session/{id}/generate", post(generate_content))
        .route("/session/{id}/profile", post(show_profile))
        .route("/session/{id}/science", post(generate_science))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn status_check() -> &'static str {
    "OK"
}

async fn create_session(State(state): State<AppState>) -> Json<ViewResponse> {
    let session = state.sessions.create();
    info!("Created session {}", session.id);
    Json(render(&state, &session).await)
}

async fn render_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewResponse>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(render(&state, &session).await))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    match state.sessions.remove(&id) {
        Some(_) => {
            info!("Removed session {}", id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn select_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ViewRequest>,
) -> Result<Json<ViewResponse>, StatusCode> {
    let session = state
        .sessions
        .set_view(&id, payload.view)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(render(&state, &session).await))
}

/// Renders the session's current view. Fetch-driven views (news, indices)
/// load fresh data on every render; input-driven views replay their last
/// result until a new action replaces it.
async fn render(state: &AppState, session: &Session) -> ViewResponse {
    let mut advisories = Vec::new();
    let data = match session.view {
        ViewState::Idle => json!({
            "title": "Brillo 🚀",
            "menu": [
                "Genere contenidos para su Blog, Twitter(X), LinkedIn e Instagram.",
                "Lea noticias financieras.",
                "Obtenga información financiera de la empresa de su preferencia.",
                "Consulte los índices bursátiles más importantes.",
                "Genere contenido científico divulgativo.",
            ],
        }),
        ViewState::News => match &state.news {
            Some(provider) => {
                let mut articles = provider.fetch("").await;
                articles.truncate(NEWS_PANEL_LIMIT);
                if articles.is_empty() {
                    advisories.push("No se encontraron noticias.".to_string());
                }
                json!({ "provider": provider.name(), "articles": articles })
            }
            None => {
                advisories.push("El proveedor de noticias no está configurado.".to_string());
                json!({ "articles": [] })
            }
        },
        ViewState::Indices => {
            let quotes = markets::fetch_market_indices(&state.http).await;
            json!({ "indices": quotes })
        }
        ViewState::Content | ViewState::Profile | ViewState::Science => session
            .last_result
            .clone()
            .unwrap_or_else(|| json!({ "awaiting_input": true })),
    };

    ViewResponse {
        session_id: session.id,
        view: session.view,
        data,
        advisories,
    }
}

async fn generate_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<ViewResponse>, StatusCode> {
    state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let request = &payload.request;
    if request.topic.trim().is_empty() || request.audience.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let mut advisories = Vec::new();

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.config.default_model.clone());
    let composed = prompt::compose(request);

    let content = match state
        .llm
        .generate(&model, &composed, state.config.max_new_tokens)
        .await
    {
        Ok(text) => {
            let short = llm::is_suspiciously_short(&text);
            if short {
                advisories.push(SHORT_CONTENT_ADVISORY.to_string());
            }
            Some(GeneratedContent {
                text,
                model,
                short,
                source_request: request.clone(),
            })
        }
        Err(e) => {
            warn!("Content generation for session {} failed: {}", id, e);
            advisories.push(format!("Error al generar contenido: {}", e));
            None
        }
    };

    let mut image_urls: Vec<String> = Vec::new();
    if let Some(query) = payload.image_query.as_deref().filter(|q| !q.trim().is_empty()) {
        match state.config.pixabay_api_key.as_deref() {
            Some(api_key) => {
                image_urls = images::fetch_images(&state.http, api_key, query).await;
                if image_urls.is_empty() {
                    advisories.push("No se encontraron imágenes en Pixabay.".to_string());
                }
            }
            None => {
                advisories.push(
                    "La búsqueda de imágenes no está configurada (PIXABAY_API_KEY).".to_string(),
                );
            }
        }
    }

    let data = json!({ "content": content, "images": image_urls });
    let session = state
        .sessions
        .record_result(&id, ViewState::Content, data.clone())
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ViewResponse {
        session_id: session.id,
        view: session.view,
        data,
        advisories,
    }))
}

async fn show_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ViewResponse>, StatusCode> {
    state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let symbol = payload.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let mut advisories = Vec::new();
    let record = match state.config.fmp_api_key.as_deref() {
        Some(api_key) => {
            let record = profile::fetch_company_profile(&state.http, api_key, &symbol).await;
            if record.is_none() {
                advisories.push("No se encontró información para el símbolo ingresado.".to_string());
            }
            record
        }
        None => {
            advisories
                .push("El perfil de empresa no está configurado (FMP_API_KEY).".to_string());
            None
        }
    };

    let data = json!({ "symbol": symbol, "profile": record });
    let session = state
        .sessions
        .record_result(&id, ViewState::Profile, data.clone())
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ViewResponse {
        session_id: session.id,
        view: session.view,
        data,
        advisories,
    }))
}

async fn generate_science(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScienceRequest>,
) -> Result<Json<ViewResponse>, StatusCode> {
    state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let area = payload.area.trim().to_string();
    if area.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let personalization = payload.personalization_info.unwrap_or_default();

    let mut advisories = Vec::new();
    let data = match science::generate_science_content(&state.llm, &state.http, &area, &personalization)
        .await
    {
        Ok(Some(content)) => {
            if content.short {
                advisories.push(SHORT_CONTENT_ADVISORY.to_string());
            }
            json!({ "area": area, "content": content })
        }
        Ok(None) => {
            advisories.push("No se encontraron artículos relevantes en arXiv.".to_string());
            json!({ "area": area, "content": null })
        }
        Err(e) => {
            warn!("Science generation for session {} failed: {}", id, e);
            advisories.push(format!("Error al generar contenido científico: {}", e));
            json!({ "area": area, "content": null })
        }
    };

    let session = state
        .sessions
        .record_result(&id, ViewState::Science, data.clone())
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ViewResponse {
        session_id: session.id,
        view: session.view,
        data,
        advisories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::NewsProviderKind;

    fn test_state() -> AppState {
        AppState::new(Config {
            hf_token: "test-token".to_string(),
            generation_endpoint: "http://localhost:9/models".to_string(),
            default_model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            max_new_tokens: 2000,
            pixabay_api_key: None,
            news_provider: NewsProviderKind::NewsApi,
            news_api_key: None,
            fmp_api_key: None,
            port: 0,
        })
    }

    #[tokio::test]
    async fn test_idle_render_shows_menu() {
        let state = test_state();
        let session = state.sessions.create();
        let response = render(&state, &session).await;
        assert_eq!(response.view, ViewState::Idle);
        assert!(response.advisories.is_empty());
        assert_eq!(response.data["menu"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_news_render_without_provider_is_advisory() {
        let state = test_state();
        let session = state.sessions.create();
        let session = state.sessions.set_view(&session.id, ViewState::News).unwrap();
        let response = render(&state, &session).await;
        assert_eq!(response.view, ViewState::News);
        assert_eq!(response.data["articles"], json!([]));
        assert_eq!(
            response.advisories,
            vec!["El proveedor de noticias no está configurado.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_input_views_replay_last_result() {
        let state = test_state();
        let session = state.sessions.create();

        // Nothing generated yet: renders the prompt-for-input descriptor.
        let session = state
            .sessions
            .set_view(&session.id, ViewState::Content)
            .unwrap();
        assert_eq!(
            render(&state, &session).await.data,
            json!({ "awaiting_input": true })
        );

        let stored = json!({ "content": { "text": "hola mundo" }, "images": [] });
        let session = state
            .sessions
            .record_result(&session.id, ViewState::Content, stored.clone())
            .unwrap();
        assert_eq!(render(&state, &session).await.data, stored);
    }

    #[tokio::test]
    async fn test_deleted_session_no_longer_renders() {
        let state = test_state();
        let session = state.sessions.create();

        let status = delete_session(State(state.clone()), Path(session.id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = render_session(State(state.clone()), Path(session.id)).await;
        assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));

        // Deleting again finds nothing.
        let status = delete_session(State(state), Path(session.id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_generate_request_flattens_content_fields() {
        let payload: GenerateRequest = serde_json::from_value(json!({
            "topic": "productividad remota",
            "audience": "gerentes de IT",
            "platform": "Twitter",
            "tone": "Informal",
            "language": "Inglés",
            "image_query": "remote work"
        }))
        .unwrap();
        assert_eq!(payload.request.topic, "productividad remota");
        assert_eq!(payload.image_query.as_deref(), Some("remote work"));
    }
}
