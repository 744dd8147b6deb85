use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

pub const WELCOME_MESSAGE: &str = "Bem-vindo à API de Questões!";

/// GET / - welcome message plus database status.
///
/// Never fails: a broken database is reported in `statusBD` as the error text.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    info!("Rota GET / solicitada");

    let status_bd = match state.health.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => e.to_string(),
    };

    Json(json!({
        "message": WELCOME_MESSAGE,
        "author": &*state.author,
        "statusBD": status_bd,
    }))
}

/// GET /health - 503 when the database cannot be reached
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Rota não encontrada")
}

/// Known path, unsupported verb
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!(
        "Método {} não permitido em {}",
        method,
        uri.path()
    ))
}
