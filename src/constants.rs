/// Application constants

// Partner interfaces
pub const INTERFACE_MICROTXN: &str = "ISteamMicroTxn";
pub const INTERFACE_MICROTXN_SANDBOX: &str = "ISteamMicroTxnSandbox";
pub const INTERFACE_USER: &str = "ISteamUser";
pub const INTERFACE_ECONOMY: &str = "ISteamEconomy";

// Required-field sets, in reporting order
pub const FIELDS_GET_RELIABLE_USER_INFO: &[&str] = &["steamId"];
pub const FIELDS_CHECK_APP_OWNERSHIP: &[&str] = &["steamId", "appId"];
pub const FIELDS_INIT_PURCHASE: &[&str] = &[
    "appId",
    "category",
    "itemDescription",
    "itemId",
    "orderId",
    "steamId",
];
pub const FIELDS_FINALIZE_PURCHASE: &[&str] = &["appId", "orderId"];
pub const FIELDS_CHECK_PURCHASE_STATUS: &[&str] = &["appId", "orderId", "transId"];

// Outbound HTTP timeouts
pub const PARTNER_CONNECT_TIMEOUT_SECS: u64 = 4;
pub const PARTNER_REQUEST_TIMEOUT_SECS: u64 = 15;

// API version
pub const API_VERSION: &str = "v1";
