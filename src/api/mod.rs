pub mod health;
pub mod prices;
pub mod purchase;

use axum::http::StatusCode;

use crate::config::Config;
use crate::integrations::SteamClient;

#[derive(Clone)]
pub struct AppState {
    pub steam: SteamClient,
    pub config: Config,
}

/// Unmatched routes return 404 with an empty body, regardless of method.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
