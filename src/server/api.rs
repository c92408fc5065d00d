use crate::agent::AIAgent;
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
    Json,
};
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;
use log::{ info, error };

pub const CHAT_ROUTE: &str = "/api/chat";
pub const APOLOGY_MESSAGE: &str = "Aurora had a small issue — try again!";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Clone)]
pub struct AppState {
    agent: Arc<AIAgent>,
}

impl AppState {
    pub fn new(agent: Arc<AIAgent>) -> Self {
        Self { agent }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(CHAT_ROUTE, post(chat_handler).fallback(method_not_allowed))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

pub struct TlsPaths<'a> {
    pub cert_path: &'a str,
    pub key_path: &'a str,
}

pub async fn start_http_server(
    addr: SocketAddr,
    state: AppState,
    tls: Option<TlsPaths<'_>>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(state);

    if let Some(tls) = tls {
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            tls.cert_path,
            tls.key_path
        ).await?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;
        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let request = ChatRequest::from_body(&body);
    info!(
        "[{}] chat request: mode={}, messages={}",
        request_id,
        request.mode,
        request.messages.len()
    );

    match state.agent.respond(&request).await {
        Ok(text) => {
            info!("[{}] replied with {} chars", request_id, text.len());
            (StatusCode::OK, Json(ChatResponse { text })).into_response()
        }
        Err(e) => {
            error!("[{}] generation failed: {}", request_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: APOLOGY_MESSAGE.to_string() }),
            ).into_response()
        }
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse { error: METHOD_NOT_ALLOWED_MESSAGE.to_string() }),
    ).into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
