//! Drives one complete purchase lifecycle against a running relay:
//! init -> user authorization (read from stdin, standing in for the
//! platform callback) -> finalize -> status query.
//!
//! Usage: purchase_flow <relay_url> <app_id> <steam_id> [item_id] [amount_cents]

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steam_mtx_relay::lifecycle::{LifecycleCoordinator, PurchaseState, RelayApi};
use steam_mtx_relay::models::{AuthorizationEvent, PurchaseOrder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steam_mtx_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "usage: {} <relay_url> <app_id> <steam_id> [item_id] [amount_cents]",
            args[0]
        );
        std::process::exit(2);
    }
    let relay_url = &args[1];
    let app_id = args[2].clone();
    let steam_id = args[3].clone();
    let item_id = args.get(4).cloned().unwrap_or_else(|| "item_id_1".to_string());
    let currency_amount: u64 = args
        .get(5)
        .map(|raw| raw.parse())
        .transpose()?
        .unwrap_or(199);

    // Fresh orderId per run; the relay never validates reuse, the partner does.
    let order_id = format!(
        "{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis()
    );

    let order = PurchaseOrder {
        order_id: order_id.clone(),
        app_id: app_id.clone(),
        item_id: item_id.clone(),
        item_description: format!("Item {}", item_id),
        category: "default".to_string(),
        currency_amount,
        steam_id,
    };

    let mut coordinator = LifecycleCoordinator::new(RelayApi::new(relay_url)?);

    let trans_id = coordinator.init_purchase(&order).await?;
    println!("order {} initialized, transaction id {}", order_id, trans_id);
    println!("approve the purchase in the Steam overlay, then answer below");

    // Stand-in for the platform authorization callback. There is no timeout
    // on the real wait either; the purchase stays pending until an event
    // arrives.
    print!("did the user authorize the purchase? [y/n] ");
    use std::io::Write as _;
    std::io::stdout().flush()?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    let authorized = matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes");

    let event = AuthorizationEvent {
        app_id: app_id.clone(),
        order_id: order_id.clone(),
        authorized,
    };
    match coordinator.handle_authorization(&event) {
        Some(PurchaseState::Authorized) => {
            let reply = coordinator.finalize_purchase(&app_id, &order_id).await?;
            println!("purchase finalized: {}", reply);
            let status = coordinator.check_status(&app_id, &order_id).await?;
            println!("partner status: {}", status);
        }
        Some(PurchaseState::Abandoned) => {
            println!("purchase declined, order {} abandoned", order_id);
        }
        other => {
            println!("unexpected lifecycle state: {:?}", other);
        }
    }

    Ok(())
}
