use serde_json::Value;

use crate::error::{AppError, Result};

/// Presence check over an inbound JSON body against an ordered required-field
/// list. The first absent field is reported and evaluation stops; no type or
/// range validation happens here.
pub fn require_fields(body: &Value, required: &[&str]) -> Result<()> {
    for name in required {
        let present = body.get(name).map(is_present).unwrap_or(false);
        if !present {
            return Err(AppError::MissingField(name.to_string()));
        }
    }
    Ok(())
}

// Empty/falsy values count as missing, matching the loose check the game
// clients rely on.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Extracts a required field as a string. Numbers are stringified so clients
/// may send ids either quoted or bare.
pub fn field_str(body: &Value, name: &str) -> Result<String> {
    match body.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AppError::MissingField(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIELDS_CHECK_PURCHASE_STATUS, FIELDS_INIT_PURCHASE};
    use serde_json::json;

    fn missing_field(result: Result<()>) -> String {
        match result {
            Err(AppError::MissingField(name)) => name,
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn complete_body_passes() {
        let body = json!({
            "appId": "480",
            "category": "gold",
            "itemDescription": "1000 Coins",
            "itemId": "item_id_1",
            "orderId": "1000",
            "steamId": "76561197960287930"
        });
        assert!(require_fields(&body, FIELDS_INIT_PURCHASE).is_ok());
    }

    #[test]
    fn each_omitted_field_is_reported_by_name() {
        for omitted in FIELDS_INIT_PURCHASE {
            let mut body = json!({
                "appId": "480",
                "category": "gold",
                "itemDescription": "1000 Coins",
                "itemId": "item_id_1",
                "orderId": "1000",
                "steamId": "76561197960287930"
            });
            body.as_object_mut().unwrap().remove(*omitted);
            assert_eq!(missing_field(require_fields(&body, FIELDS_INIT_PURCHASE)), *omitted);
        }
    }

    #[test]
    fn first_missing_field_wins() {
        // Both appId and transId absent: appId comes first in the set.
        let body = json!({ "orderId": "1000" });
        assert_eq!(
            missing_field(require_fields(&body, FIELDS_CHECK_PURCHASE_STATUS)),
            "appId"
        );
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for falsy in [json!(null), json!(""), json!(false), json!(0)] {
            let body = json!({ "steamId": falsy });
            assert_eq!(missing_field(require_fields(&body, &["steamId"])), "steamId");
        }
    }

    #[test]
    fn field_str_accepts_bare_numbers() {
        let body = json!({ "orderId": 1000 });
        assert_eq!(field_str(&body, "orderId").unwrap(), "1000");
    }
}
