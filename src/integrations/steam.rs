use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::constants::{
    INTERFACE_ECONOMY, INTERFACE_MICROTXN, INTERFACE_MICROTXN_SANDBOX, INTERFACE_USER,
    PARTNER_CONNECT_TIMEOUT_SECS, PARTNER_REQUEST_TIMEOUT_SECS,
};
use crate::error::{AppError, Result};
use crate::models::PurchaseOrder;

/// Client for the Steam partner web API. Every operation is the same
/// call-and-relay shape: build the endpoint URL, attach the publisher key
/// and app id as query parameters, perform one HTTP call, parse JSON.
/// Failures are never retried here.
#[derive(Debug, Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    api_key: String,
    app_id: String,
    api_url: String,
    sandbox: bool,
    currency: String,
    language: String,
}

impl SteamClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(PARTNER_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(PARTNER_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("partner HTTP client init failed: {}", e)))?;
        Ok(Self {
            http,
            api_key: config.steam_api_key.trim().to_string(),
            app_id: config.steam_app_id.trim().to_string(),
            api_url: config.steam_api_url.trim_end_matches('/').to_string(),
            sandbox: config.steam_use_sandbox,
            currency: config.steam_currency.clone(),
            language: config.steam_language.clone(),
        })
    }

    // Sandbox flips only the microtransaction interface; user/economy
    // lookups have no sandbox counterpart.
    fn microtxn_interface(&self) -> &'static str {
        if self.sandbox {
            INTERFACE_MICROTXN_SANDBOX
        } else {
            INTERFACE_MICROTXN
        }
    }

    fn endpoint(&self, interface: &str, method: &str, version: &str) -> Result<Url> {
        let raw = format!("{}/{}/{}/{}/", self.api_url, interface, method, version);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::Internal(format!("invalid partner URL {}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    pub async fn get_reliable_user_info(&self, steam_id: &str) -> Result<Value> {
        let mut url = self.endpoint(self.microtxn_interface(), "GetUserInfo", "v2")?;
        url.query_pairs_mut()
            .append_pair("appid", &self.app_id)
            .append_pair("steamid", steam_id);
        self.get(url).await
    }

    pub async fn check_app_ownership(&self, steam_id: &str, app_id: &str) -> Result<Value> {
        let mut url = self.endpoint(INTERFACE_USER, "CheckAppOwnership", "v2")?;
        url.query_pairs_mut()
            .append_pair("steamid", steam_id)
            .append_pair("appid", app_id);
        self.get(url).await
    }

    pub async fn init_purchase(&self, order: &PurchaseOrder) -> Result<Value> {
        let url = self.init_purchase_url(order)?;
        self.post(url).await
    }

    fn init_purchase_url(&self, order: &PurchaseOrder) -> Result<Url> {
        let mut url = self.endpoint(self.microtxn_interface(), "InitTxn", "v3")?;
        url.query_pairs_mut()
            .append_pair("orderid", &order.order_id)
            .append_pair("steamid", &order.steam_id)
            .append_pair("appid", &order.app_id)
            .append_pair("itemcount", "1")
            .append_pair("language", &self.language)
            .append_pair("currency", &self.currency)
            .append_pair("itemid[0]", &order.item_id)
            .append_pair("qty[0]", "1")
            .append_pair("amount[0]", &order.currency_amount.to_string())
            .append_pair("description[0]", &order.item_description)
            .append_pair("category[0]", &order.category);
        Ok(url)
    }

    pub async fn finalize_purchase(&self, app_id: &str, order_id: &str) -> Result<Value> {
        let mut url = self.endpoint(self.microtxn_interface(), "FinalizeTxn", "v2")?;
        url.query_pairs_mut()
            .append_pair("orderid", order_id)
            .append_pair("appid", app_id);
        self.post(url).await
    }

    pub async fn check_purchase_status(
        &self,
        app_id: &str,
        order_id: &str,
        trans_id: &str,
    ) -> Result<Value> {
        let mut url = self.endpoint(self.microtxn_interface(), "QueryTxn", "v2")?;
        url.query_pairs_mut()
            .append_pair("appid", app_id)
            .append_pair("orderid", order_id)
            .append_pair("transid", trans_id);
        self.get(url).await
    }

    pub async fn get_asset_prices(&self, currency: &str) -> Result<Value> {
        let url = self.asset_prices_url(currency)?;
        self.get(url).await
    }

    // GetAssetPrices has no appId in the inbound body; the fixed app id from
    // config is used instead.
    fn asset_prices_url(&self, currency: &str) -> Result<Url> {
        let mut url = self.endpoint(INTERFACE_ECONOMY, "GetAssetPrices", "v1")?;
        url.query_pairs_mut()
            .append_pair("appid", &self.app_id)
            .append_pair("currency", currency);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("partner request failed: {}", e)))?;
        parse_partner_response(response).await
    }

    async fn post(&self, url: Url) -> Result<Value> {
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("partner request failed: {}", e)))?;
        parse_partner_response(response).await
    }
}

async fn parse_partner_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "partner returned {}: {}",
            status, body
        )));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("partner reply parse failed: {}", e)))
}

/// Merges a partner reply into the relay's success envelope:
/// `{"success": true, ...partner fields}`. Non-object replies are carried
/// under a `response` key.
pub fn relay_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => {
            map.insert("success".to_string(), Value::Bool(true));
            Value::Object(map)
        }
        other => serde_json::json!({ "success": true, "response": other }),
    }
}

/// Looks up the first string (or stringifiable number) at any of the given
/// paths. Partner replies nest the interesting fields differently per
/// interface version.
pub fn pick_str(body: &Value, paths: &[&[&str]]) -> Option<String> {
    for path in paths {
        let mut cursor = body;
        let mut found = true;
        for key in *path {
            match cursor.get(key) {
                Some(next) => cursor = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if !found {
            continue;
        }
        match cursor {
            Value::String(s) if !s.is_empty() => return Some(s.clone()),
            Value::Number(n) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}
