//! # covers-chat HTTP Server Implementation
//!
//! File: server/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! The Axum application behind `covers-chat serve`:
//! - `POST /chat` runs the reply pipeline
//! - `GET /` serves the chat page
//! - every other path is served from the static directory
//! - permissive CORS (unless disabled) and request tracing on everything
//!
//! ## Architecture
//!
//! 1. Build the `ReplyResolver` once and share it through router state
//! 2. Set up the router with middleware
//! 3. Bind the listener and print the startup banner
//! 4. Serve until Ctrl+C or SIGTERM
//!
use super::config::ServerConfig;
use crate::chat::{build_provider, extract_message, ReplyResolver};
use crate::core::error::{InputError, Result};
use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, Level};

/// # Run HTTP Server (`run_server`)
///
/// Builds the reply pipeline from `config`, binds the listener and serves
/// until a shutdown signal arrives.
///
/// ## Errors
///
/// - The HTTP client for the provider cannot be built.
/// - Binding the listener fails (port in use, permissions).
/// - The server itself fails while running.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let provider = build_provider(&config.provider)?;
    let resolver = Arc::new(ReplyResolver::builtin(provider)?);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
    let bound = listener
        .local_addr()
        .context("Failed to read listener address")?;

    let provider_state = if resolver.provider_enabled() {
        resolver.provider_label()
    } else {
        "disabled (knowledge base + fallback replies only)".to_string()
    };

    let app = create_app(&config, resolver);

    println!("\n=================================================================");
    println!("📂 Serving files from: {}", config.directory.display());
    println!("🌐 Local URL:         http://localhost:{}", bound.port());
    println!("⚙️  Binding to address: {}", bound);
    println!("❓ Chat page:         {}", config.index_file);
    println!("🤖 Answer provider:   {}", provider_state);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!(
        "Starting chat server on {} for directory {}",
        bound,
        config.directory.display()
    );
    println!("Server starting! Press Ctrl+C to stop.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves on Ctrl+C or, on Unix, SIGTERM. If a handler cannot be
/// installed, that branch stays pending and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Create Axum Application (`create_app`)
///
/// Wires the chat endpoint, the chat page and the static directory together
/// with tracing and CORS middleware.
fn create_app(config: &ServerConfig, resolver: Arc<ReplyResolver>) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/chat", post(handle_chat))
        .route_service("/", ServeFile::new(config.index_path()))
        .fallback_service(ServeDir::new(&config.directory))
        .with_state(resolver)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}

/// # Chat Endpoint (`handle_chat`)
///
/// `POST /chat` with `{ "message": string }`.
///
/// - 400 `{ "reply": "أرسل رسالة صحيحة!" }` for a body that is not JSON or has
///   no string `message`
/// - 400 `{ "reply": "الرسالة فارغة!" }` for a blank message
/// - 200 with the resolved `ChatResponse` otherwise
async fn handle_chat(
    State(resolver): State<Arc<ReplyResolver>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            debug!("Rejected chat body: {}", rejection);
            return reject(InputError::Missing);
        }
    };

    let message = match extract_message(&body) {
        Ok(message) => message,
        Err(e) => return reject(e),
    };

    match resolver.resolve(message).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => reject(e),
    }
}

fn reject(err: InputError) -> Response {
    debug!("Chat input rejected: {}", err);
    (StatusCode::BAD_REQUEST, Json(json!({ "reply": err.reply() }))).into_response()
}

// --- Unit Tests ---
