use std::sync::Arc;

use skincare_storefront::{
    config::AppConfig,
    events::StoreEvents,
    seed,
    services::product_service::Catalog,
    store::{CART_KEY, FileStore, KeyValueStore, ORDERS_KEY, SESSION_KEY},
};

/// Resets the file-backed profile: built-in catalog, no session, empty cart.
/// Pass `--keep-orders` to leave order history alone.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let path = config
        .store_path
        .ok_or_else(|| anyhow::anyhow!("STORE_PATH must point at the profile file to seed"))?;
    let keep_orders = std::env::args().any(|arg| arg == "--keep-orders");

    let store = Arc::new(FileStore::open(&path)?);
    Catalog::new(store.clone(), StoreEvents::default()).reset()?;
    store.delete(SESSION_KEY)?;
    store.delete(CART_KEY)?;
    if !keep_orders {
        store.delete(ORDERS_KEY)?;
    }

    println!(
        "Seed completed at {}: {} products, {} known accounts",
        store.path().display(),
        seed::products().len(),
        seed::accounts().len()
    );
    for account in seed::accounts() {
        println!("  {} / {} ({})", account.email, account.password, account.role);
    }
    Ok(())
}
