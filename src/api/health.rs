use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: bool,
}

/// GET /
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: true })
}
