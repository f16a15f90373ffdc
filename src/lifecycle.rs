use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::integrations::steam::pick_str;
use crate::models::{AuthorizationEvent, InitReply, PurchaseOrder};

/// Purchase lifecycle states. Idle is represented by the absence of an
/// entry; Abandoned, Completed and FailedFinalize are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseState {
    PendingAuthorization,
    Authorized,
    Completed,
    Abandoned,
    FailedFinalize,
}

/// The purchase operations a coordinator drives. The production
/// implementation speaks HTTP to the relay; tests substitute a mock.
#[async_trait]
pub trait PurchaseApi: Send + Sync {
    async fn init_purchase(&self, order: &PurchaseOrder) -> Result<InitReply>;
    async fn finalize_purchase(&self, app_id: &str, order_id: &str) -> Result<Value>;
    async fn check_purchase_status(
        &self,
        app_id: &str,
        order_id: &str,
        trans_id: &str,
    ) -> Result<Value>;
}

#[derive(Debug)]
struct Purchase {
    trans_id: String,
    state: PurchaseState,
}

/// Client-side coordinator for the init -> authorize -> finalize sequence.
///
/// Purchases are keyed by (appId, orderId) so authorization events can be
/// correlated when several orders are in flight. All state is in memory
/// only: a process restart between init and finalize loses the transaction
/// handle, and the authorization wait is unbounded. Both are properties of
/// the platform contract, not accidents; see DESIGN.md.
pub struct LifecycleCoordinator<A: PurchaseApi> {
    api: A,
    purchases: HashMap<(String, String), Purchase>,
}

impl<A: PurchaseApi> LifecycleCoordinator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            purchases: HashMap::new(),
        }
    }

    /// Starts a purchase. On success the partner-issued transaction id is
    /// stored and the purchase enters PendingAuthorization. On any failure
    /// no state is recorded; the caller must pick a fresh orderId before
    /// retrying, since reuse is never validated against the partner.
    pub async fn init_purchase(&mut self, order: &PurchaseOrder) -> Result<String> {
        let reply = self.api.init_purchase(order).await?;
        let key = (order.app_id.clone(), order.order_id.clone());
        tracing::info!(
            order_id = %order.order_id,
            trans_id = %reply.trans_id,
            "purchase initialized, waiting for user authorization"
        );
        self.purchases.insert(
            key,
            Purchase {
                trans_id: reply.trans_id.clone(),
                state: PurchaseState::PendingAuthorization,
            },
        );
        Ok(reply.trans_id)
    }

    /// Handler for the platform's authorization callback. Events are
    /// correlated by (appId, orderId); anything that matches no pending
    /// purchase is logged and dropped. Returns the state the purchase
    /// moved to, if any.
    pub fn handle_authorization(&mut self, event: &AuthorizationEvent) -> Option<PurchaseState> {
        let key = (event.app_id.clone(), event.order_id.clone());
        match self.purchases.get_mut(&key) {
            Some(purchase) if purchase.state == PurchaseState::PendingAuthorization => {
                purchase.state = if event.authorized {
                    PurchaseState::Authorized
                } else {
                    PurchaseState::Abandoned
                };
                tracing::info!(
                    order_id = %event.order_id,
                    authorized = event.authorized,
                    "authorization event applied"
                );
                Some(purchase.state)
            }
            Some(purchase) => {
                tracing::warn!(
                    order_id = %event.order_id,
                    state = ?purchase.state,
                    "authorization event ignored: purchase is not pending"
                );
                None
            }
            None => {
                tracing::warn!(
                    app_id = %event.app_id,
                    order_id = %event.order_id,
                    "authorization event ignored: no matching purchase"
                );
                None
            }
        }
    }

    /// Completes an authorized purchase. Calling this before the
    /// authorization event arrives is a caller-protocol violation and is
    /// refused locally without touching the partner; the partner remains
    /// authoritative either way. A partner failure is terminal for the
    /// purchase: no automatic retry.
    pub async fn finalize_purchase(&mut self, app_id: &str, order_id: &str) -> Result<Value> {
        let key = (app_id.to_string(), order_id.to_string());
        let purchase = self
            .purchases
            .get_mut(&key)
            .ok_or_else(|| AppError::NotFound(format!("no purchase for order {}", order_id)))?;

        match purchase.state {
            PurchaseState::Authorized => {}
            PurchaseState::PendingAuthorization => {
                return Err(AppError::ProtocolViolation(format!(
                    "order {} has not been authorized by the user yet",
                    order_id
                )));
            }
            other => {
                return Err(AppError::ProtocolViolation(format!(
                    "order {} is already {:?}",
                    order_id, other
                )));
            }
        }

        match self.api.finalize_purchase(app_id, order_id).await {
            Ok(payload) => {
                purchase.state = PurchaseState::Completed;
                tracing::info!(order_id = %order_id, "purchase completed");
                Ok(payload)
            }
            Err(e) => {
                purchase.state = PurchaseState::FailedFinalize;
                tracing::error!(order_id = %order_id, "finalize failed: {}", e);
                Err(e)
            }
        }
    }

    /// Pure read: queries the partner for the current status of an order,
    /// carrying the transaction id stored at init. Allowed from any
    /// non-Idle state and never mutates the machine.
    pub async fn check_status(&self, app_id: &str, order_id: &str) -> Result<Value> {
        let key = (app_id.to_string(), order_id.to_string());
        let purchase = self
            .purchases
            .get(&key)
            .ok_or_else(|| AppError::NotFound(format!("no purchase for order {}", order_id)))?;
        self.api
            .check_purchase_status(app_id, order_id, &purchase.trans_id)
            .await
    }

    pub fn state(&self, app_id: &str, order_id: &str) -> Option<PurchaseState> {
        self.purchases
            .get(&(app_id.to_string(), order_id.to_string()))
            .map(|p| p.state)
    }
}

/// `PurchaseApi` implementation that talks to a running relay over HTTP.
#[derive(Debug, Clone)]
pub struct RelayApi {
    http: reqwest::Client,
    base_url: String,
}

impl RelayApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("relay HTTP client init failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("relay request to {} failed: {}", url, e)))?;
        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("relay reply parse failed: {}", e)))?;
        if !status.is_success() || payload["success"] != Value::Bool(true) {
            return Err(AppError::Upstream(format!(
                "relay returned {}: {}",
                status, payload
            )));
        }
        Ok(payload)
    }
}

#[async_trait]
impl PurchaseApi for RelayApi {
    async fn init_purchase(&self, order: &PurchaseOrder) -> Result<InitReply> {
        let body = serde_json::to_value(order)
            .map_err(|e| AppError::Internal(format!("order serialization failed: {}", e)))?;
        let payload = self.post_json("InitPurchase", &body).await?;
        // The transaction id nests differently across partner interface
        // versions; try the known spots.
        let trans_id = pick_str(
            &payload,
            &[
                &["transid"],
                &["transId"],
                &["response", "params", "transid"],
                &["params", "transid"],
            ],
        )
        .ok_or_else(|| {
            AppError::Upstream("init reply contained no transaction id".to_string())
        })?;
        Ok(InitReply { trans_id })
    }

    async fn finalize_purchase(&self, app_id: &str, order_id: &str) -> Result<Value> {
        self.post_json(
            "FinalizePurchase",
            &json!({ "appId": app_id, "orderId": order_id }),
        )
        .await
    }

    async fn check_purchase_status(
        &self,
        app_id: &str,
        order_id: &str,
        trans_id: &str,
    ) -> Result<Value> {
        self.post_json(
            "CheckPurchaseStatus",
            &json!({ "appId": app_id, "orderId": order_id, "transId": trans_id }),
        )
        .await
    }
}
