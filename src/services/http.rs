use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::wire::{ChatRequest, ChatResponse, ErrorBody, HealthResponse};
use crate::config::ChatConfig;
use crate::error::Result;
use crate::kernel::event::Language;
use crate::kernel::intent::IntentResolver;
use crate::kernel::telemetry::event::{ResolutionKind, TelemetryEvent};
use crate::kernel::telemetry::recorder::TelemetryRecorder;

pub const CHAT_ROUTE: &str = "/api/chat";
pub const HEALTH_ROUTE: &str = "/healthz";

pub struct AppState {
    pub resolver: IntentResolver,
    pub default_language: Language,
    pub processing_delay: Duration,
    pub telemetry: Mutex<TelemetryRecorder>,
}

impl AppState {
    pub fn new(resolver: IntentResolver, default_language: Language, processing_delay: Duration) -> Self {
        Self {
            resolver,
            default_language,
            processing_delay,
            telemetry: Mutex::new(TelemetryRecorder::new()),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            IntentResolver::new(),
            config.default_language,
            config.processing_delay(),
        )
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(chat))
        .route(HEALTH_ROUTE, get(healthz))
        .with_state(state)
}

/// Serves until ctrl-c.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "chat endpoint listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("chat endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn chat(State(state): State<Arc<AppState>>, payload: std::result::Result<Json<ChatRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejecting malformed chat request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let language = request.language_or(state.default_language);

    // Simulated thinking time. The resolver itself never waits.
    tokio::time::sleep(state.processing_delay).await;

    let resolution = state.resolver.resolve_detailed(request.message_text(), language);
    info!(%language, matched = ?resolution.matched, "chat request resolved");

    if let Ok(mut telemetry) = state.telemetry.lock() {
        telemetry.record(TelemetryEvent::Resolution {
            language,
            kind: ResolutionKind::from(&resolution.matched),
        });
    }

    (StatusCode::OK, Json(ChatResponse::from(resolution.reply))).into_response()
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = match state.telemetry.lock() {
        Ok(telemetry) => telemetry.snapshot(),
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error".to_string(),
                    resolutions: 0,
                    fallbacks: 0,
                }),
            );
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            resolutions: snapshot.resolution_stats.total,
            fallbacks: snapshot.resolution_stats.fallback,
        }),
    )
}
