// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": "City and point of interest API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "authentication": "POST /api/authentication/authenticate (public - token acquisition)",
                "cities": "/api/cities[/:city_id] (protected)",
                "points_of_interest": "/api/cities/:city_id/pointsofinterest[/:point_of_interest_id] (protected - city claim must match)"
            }
        }
    }))
}

/// Reports whether the repository answers a trivial probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "error",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
