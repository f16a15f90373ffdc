pub mod purchase;

pub use purchase::{AuthorizationEvent, InitReply, PriceEntry, PurchaseOrder};
