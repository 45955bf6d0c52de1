//! `leadpost gateway`: HTTP front door for the dispatcher.
//!
//! Routes:
//! - `POST /send-notification`: body is a `NotificationRequest`, answers
//!   with the delivery report
//! - `GET /health`: liveness probe
//!
//! CORS preflight (`OPTIONS`) is answered by the CORS layer for every path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use leadpost_channels::dispatch;
use leadpost_core::config::{Config, NotifyConfig};
use leadpost_core::types::{DeliveryReport, MissingFields, NotificationRequest};

use crate::helpers;

/// Preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

// ─────────────────────────────────────────────
// State & errors
// ─────────────────────────────────────────────

/// Shared, read-only gateway state.
#[derive(Clone)]
pub struct AppState {
    pub notify: Arc<NotifyConfig>,
}

impl AppState {
    pub fn new(notify: NotifyConfig) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid JSON body")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Missing required fields")]
    MissingFields(#[from] MissingFields),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidJson(_) | GatewayError::MissingFields(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Successful `POST /send-notification` reply.
#[derive(Debug, Serialize)]
pub struct SendNotificationResponse {
    pub success: bool,
    pub email_sent: bool,
    pub sms_sent: bool,
    pub telegram_sent: bool,
    /// `null` when every attempted channel delivered.
    pub errors: Option<Vec<String>>,
}

impl From<DeliveryReport> for SendNotificationResponse {
    fn from(report: DeliveryReport) -> Self {
        Self {
            success: true,
            email_sent: report.email_sent,
            sms_sent: report.sms_sent,
            telegram_sent: report.telegram_sent,
            errors: (!report.errors.is_empty()).then_some(report.errors),
        }
    }
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

/// Build the gateway router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/send-notification",
            post(send_notification).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "leadpost",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendNotificationResponse>, GatewayError> {
    let request: NotificationRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting notification request with invalid JSON");
        GatewayError::InvalidJson(e)
    })?;

    let lead = request.into_lead().map_err(|e| {
        warn!(error = %e, "rejecting incomplete notification request");
        GatewayError::from(e)
    })?;

    let report = dispatch(&lead, &state.notify).await;
    Ok(Json(report.into()))
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Run the gateway until Ctrl+C.
///
/// `host`/`port` override the values from `config.gateway`.
pub async fn run(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.gateway.host.clone());
    let port = port.unwrap_or(config.gateway.port);

    helpers::print_banner();
    println!("  Mode: Gateway");

    let channels = config.notify.configured_channels();
    if channels.is_empty() {
        warn!("no notification channels configured; every request will be a no-op");
        println!("  Channels: none configured (run `leadpost status`)");
    } else {
        let names: Vec<&str> = channels.iter().map(|c| c.name()).collect();
        println!("  Channels: {}", names.join(", "));
    }

    let app = create_router(AppState::new(config.notify));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("failed to read local address")?;

    println!("  Listening on http://{addr}");
    println!();
    info!(%addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server error")?;

    println!("  Shutting down...");
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
