use serde::{Deserialize, Serialize};

/// One purchase attempt, identified by a client-generated orderId.
///
/// orderId uniqueness across concurrent purchases for the same user is the
/// caller's responsibility; nothing here or in the partner relay enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub order_id: String,
    pub app_id: String,
    pub item_id: String,
    pub item_description: String,
    pub category: String,
    /// Price in the smallest currency unit (e.g. cents). Optional on the
    /// wire; the partner rejects a zero amount on its side.
    #[serde(default)]
    pub currency_amount: u64,
    pub steam_id: String,
}

/// Partner reply to InitPurchase; the transaction id must be carried to
/// FinalizePurchase/CheckPurchaseStatus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReply {
    pub trans_id: String,
}

/// Platform-delivered confirmation that the user approved or declined the
/// purchase. Consumed, never produced, by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationEvent {
    pub app_id: String,
    pub order_id: String,
    pub authorized: bool,
}

/// Static catalog record, read from the price list file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: i64,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_order_uses_camel_case_on_the_wire() {
        let order = PurchaseOrder {
            order_id: "1000".to_string(),
            app_id: "480".to_string(),
            item_id: "item_id_1".to_string(),
            item_description: "1000 Coins".to_string(),
            category: "gold".to_string(),
            currency_amount: 199,
            steam_id: "76561197960287930".to_string(),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["orderId"], "1000");
        assert_eq!(value["itemDescription"], "1000 Coins");
        assert_eq!(value["currencyAmount"], 199);
    }

    #[test]
    fn authorization_event_round_trips() {
        let event: AuthorizationEvent =
            serde_json::from_str(r#"{"appId":"480","orderId":"1000","authorized":true}"#).unwrap();
        assert_eq!(event.app_id, "480");
        assert!(event.authorized);
    }
}
