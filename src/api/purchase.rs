use axum::{extract::State, Json};
use serde_json::Value;

use super::AppState;
use crate::constants::{
    FIELDS_CHECK_APP_OWNERSHIP, FIELDS_CHECK_PURCHASE_STATUS, FIELDS_FINALIZE_PURCHASE,
    FIELDS_GET_RELIABLE_USER_INFO, FIELDS_INIT_PURCHASE,
};
use crate::error::Result;
use crate::integrations::steam::relay_envelope;
use crate::models::PurchaseOrder;
use crate::validate::{field_str, require_fields};

// Every handler follows the same relay shape: validate the fixed field set
// for the operation, make exactly one partner call, wrap the reply. The
// partner is authoritative for all business rules (ownership, authorization,
// transaction state); nothing is checked twice here.

/// POST /GetReliableUserInfo
pub async fn get_reliable_user_info(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    require_fields(&body, FIELDS_GET_RELIABLE_USER_INFO)?;
    let steam_id = field_str(&body, "steamId")?;
    let payload = state.steam.get_reliable_user_info(&steam_id).await?;
    Ok(Json(relay_envelope(payload)))
}

/// POST /CheckAppOwnership
pub async fn check_app_ownership(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    require_fields(&body, FIELDS_CHECK_APP_OWNERSHIP)?;
    let steam_id = field_str(&body, "steamId")?;
    let app_id = field_str(&body, "appId")?;
    let payload = state.steam.check_app_ownership(&steam_id, &app_id).await?;
    Ok(Json(relay_envelope(payload)))
}

/// POST /InitPurchase
pub async fn init_purchase(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    require_fields(&body, FIELDS_INIT_PURCHASE)?;
    // Fields are read one by one so ids may arrive quoted or bare, same as
    // every other operation; presence is the only check made here.
    let order = PurchaseOrder {
        app_id: field_str(&body, "appId")?,
        category: field_str(&body, "category")?,
        item_description: field_str(&body, "itemDescription")?,
        item_id: field_str(&body, "itemId")?,
        order_id: field_str(&body, "orderId")?,
        steam_id: field_str(&body, "steamId")?,
        currency_amount: field_amount(&body, "currencyAmount"),
    };
    let payload = state.steam.init_purchase(&order).await?;
    Ok(Json(relay_envelope(payload)))
}

// currencyAmount is optional and may be a bare number or a quoted one;
// anything unusable becomes zero and the partner rejects it on its side.
fn field_amount(body: &Value, name: &str) -> u64 {
    match body.get(name) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// POST /FinalizePurchase
pub async fn finalize_purchase(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    require_fields(&body, FIELDS_FINALIZE_PURCHASE)?;
    let app_id = field_str(&body, "appId")?;
    let order_id = field_str(&body, "orderId")?;
    let payload = state.steam.finalize_purchase(&app_id, &order_id).await?;
    Ok(Json(relay_envelope(payload)))
}

/// POST /CheckPurchaseStatus
pub async fn check_purchase_status(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    require_fields(&body, FIELDS_CHECK_PURCHASE_STATUS)?;
    let app_id = field_str(&body, "appId")?;
    let order_id = field_str(&body, "orderId")?;
    let trans_id = field_str(&body, "transId")?;
    let payload = state
        .steam
        .check_purchase_status(&app_id, &order_id, &trans_id)
        .await?;
    Ok(Json(relay_envelope(payload)))
}
