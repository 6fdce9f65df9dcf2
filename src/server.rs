use crate::app::PostbackUseCase;
use crate::config::RelayConfig;
use crate::pipeline::PostbackParams;
use anyhow::Context;
use axum::{
    body::Body,
    extract::{Form, FromRequest, Multipart, Query, State},
    http::{header, Method, Request},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use hyper::Server;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<PostbackUseCase>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "postback-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Inbound postback. Accepts query parameters plus urlencoded or multipart
/// form bodies and always answers 200 with a plain-text report.
async fn postback(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
    req: Request<Body>,
) -> impl IntoResponse {
    let form = read_form(req, &state).await;
    let params = PostbackParams::new(into_map(query.map(|Query(q)| q)), into_map(Some(form)));
    let outcome = state.use_case.handle(&params).await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        outcome.body(),
    )
}

/// Form fields of the body. An unreadable body yields no fields.
async fn read_form(req: Request<Body>, state: &AppState) -> Vec<(String, String)> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.trim_start().starts_with("multipart/form-data"));

    if !is_multipart {
        return match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(fields)) => fields,
            Err(_) => Vec::new(),
        };
    }

    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::debug!("Ignoring multipart body: {}", e);
            return Vec::new();
        }
    };

    let mut fields = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                // File uploads are not postback fields.
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => fields.push((name, value)),
                    Err(e) => {
                        tracing::debug!("Skipping multipart field {}: {}", name, e);
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Stopped reading multipart body: {}", e);
                break;
            }
        }
    }
    fields
}

/// Later duplicates of a key overwrite earlier ones.
fn into_map(pairs: Option<Vec<(String, String)>>) -> HashMap<String, String> {
    pairs.unwrap_or_default().into_iter().collect()
}

/// Create the HTTP router with the postback endpoint and health check
pub fn create_server(config: &RelayConfig, use_case: Arc<PostbackUseCase>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let path = config.server.path.as_str();
    let mut router = Router::new()
        .route("/health", get(health))
        .route(path, get(postback).post(postback));
    if path != "/" {
        router = router.route("/", get(postback).post(postback));
    }

    router
        .with_state(AppState { use_case })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: &RelayConfig, use_case: Arc<PostbackUseCase>) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!("invalid listen address {}:{}", config.server.host, config.server.port)
        })?;
    let app = create_server(config, use_case);

    tracing::info!("Postback relay listening on http://{}{}", addr, config.server.path);
    tracing::info!("Health check: http://{}/health", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
