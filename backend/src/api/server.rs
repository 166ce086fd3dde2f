//! HTTP server for the draw API.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/health`     | Health check                             |
//! | GET    | `/api/games`  | Games from the configured sheet range    |
//! | GET    | `/exec`       | Same as `/api/games` (web-app path)      |
//! | GET    | `/api/logs`   | SSE stream for real-time logs            |
//!
//! `/api/games` answers 200 in every case, including failures.

use axum::{
    extract::State,
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{RequestLog, LOG_BROADCASTER};
use super::types::DrawResponse;
use crate::config::Config;
use crate::error::ServerResult;
use crate::extract::pipeline::{draw_games_logged, panic_message};
use crate::extract::DrawSettings;
use crate::source::{open_workbook, GridSource};

/// Shared, read-only per-process state. Nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn GridSource>,
    pub settings: Arc<DrawSettings>,
}

impl AppState {
    pub fn new(source: Arc<dyn GridSource>, settings: DrawSettings) -> Self {
        Self { source, settings: Arc::new(settings) }
    }
}

/// Build the router around `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/games", get(games))
        .route("/exec", get(games))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: &Config) -> ServerResult<()> {
    let source: Arc<dyn GridSource> = Arc::from(open_workbook(&config.workbook));
    let app = router(AppState::new(source, config.draw.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 Lottosheet server running on http://localhost:{}", config.port);
    println!("   Workbook: {}", config.workbook.display());
    println!("   Sheet:    {} ({})", config.draw.sheet, config.draw.range);
    println!("   GET /api/games - Games from the sheet");
    println!("   GET /api/logs  - SSE log stream");
    println!("   GET /health    - Health check");
    if config.draw.options.reject_duplicates {
        println!("   ⚠️  Strict mode: games with repeated numbers are dropped");
    }
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lottosheet",
        "version": env!("CARGO_PKG_VERSION"),
        "sheet": state.settings.sheet,
        "range": state.settings.range.to_string(),
        "endpoints": {
            "games": "GET /api/games",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Games endpoint. Reading the sheet may touch the disk, so it runs on the
/// blocking pool.
async fn games(State(state): State<AppState>) -> DrawResponse {
    let log = RequestLog::new();
    log.info("🎯 GET games");

    let task_log = log.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        draw_games_logged(state.source.as_ref(), &state.settings, &task_log)
    })
    .await;

    match outcome {
        Ok(response) => response,
        Err(e) => {
            let message = if e.is_panic() {
                panic_message(e.into_panic().as_ref())
            } else {
                e.to_string()
            };
            log.error(format!("Request aborted: {}", message));
            DrawResponse::from_error(message)
        }
    }
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
