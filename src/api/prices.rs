use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::catalog;
use crate::error::{AppError, Result};
use crate::integrations::steam::relay_envelope;

#[derive(Debug, Deserialize)]
pub struct ItemPricesQuery {
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssetPricesQuery {
    pub currency: Option<String>,
}

/// GET /GetItemPrices
///
/// Without an itemId filter the whole catalog is returned; with one, exactly
/// the matching record or 404.
pub async fn get_item_prices(
    State(state): State<AppState>,
    Query(query): Query<ItemPricesQuery>,
) -> Result<Json<Value>> {
    match query.item_id {
        None => {
            let products = catalog::load(&state.config.catalog_path)?;
            Ok(Json(json!({ "success": true, "products": products })))
        }
        Some(raw) => {
            let item_id: i64 = raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("itemId must be an integer: {}", raw)))?;
            let product = catalog::find(&state.config.catalog_path, item_id)?;
            Ok(Json(json!({ "success": true, "product": product })))
        }
    }
}

/// GET /GetAssetPrices
pub async fn get_asset_prices(
    State(state): State<AppState>,
    Query(query): Query<AssetPricesQuery>,
) -> Result<Json<Value>> {
    let currency = match query.currency.as_deref() {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => return Err(AppError::MissingField("currency".to_string())),
    };
    let payload = state.steam.get_asset_prices(&currency).await?;
    Ok(Json(relay_envelope(payload)))
}
