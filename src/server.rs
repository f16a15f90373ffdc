use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyValue, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::error;

pub fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);
    let include_stack = !state.config.is_production();

    Router::new()
        // Health check
        .route("/", get(api::health::health_check))
        // Partner relays
        .route(
            "/GetReliableUserInfo",
            post(api::purchase::get_reliable_user_info),
        )
        .route(
            "/CheckAppOwnership",
            post(api::purchase::check_app_ownership),
        )
        .route("/InitPurchase", post(api::purchase::init_purchase))
        .route("/FinalizePurchase", post(api::purchase::finalize_purchase))
        .route(
            "/CheckPurchaseStatus",
            post(api::purchase::check_purchase_status),
        )
        // Pricing
        .route("/GetItemPrices", get(api::prices::get_item_prices))
        .route("/GetAssetPrices", get(api::prices::get_asset_prices))
        // Method misses on known paths fall through to the same empty 404
        // as unknown paths.
        .method_not_allowed_fallback(api::not_found)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| handle_panic(err, include_stack),
        ))
        .with_state(state)
}

// Last-resort handler: panics become the documented 500 envelope instead of
// a dropped connection. The stack is only attached outside production,
// decided once from config when the router is built.
fn handle_panic(err: Box<dyn Any + Send + 'static>, include_stack: bool) -> axum::response::Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    tracing::error!("request handler panicked: {}", message);
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(error::internal_error_body(&message, include_stack)),
    )
        .into_response()
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AnyValue)
        .allow_headers(AnyValue)
}
