use std::sync::Arc;

use crate::{
    events::StoreEvents,
    seed,
    services::{
        auth_service::AccountManager, cart_service::CartManager, order_service::OrderManager,
        product_service::Catalog,
    },
    store::{MemoryStore, SharedStore, StoreError},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountManager,
    pub cart: CartManager,
    pub orders: OrderManager,
    pub catalog: Catalog,
    pub events: StoreEvents,
}

impl AppState {
    /// Wires every store to one profile and seeds the catalog if it is empty.
    pub fn new(store: SharedStore) -> Result<Self, StoreError> {
        let events = StoreEvents::default();
        let state = Self {
            accounts: AccountManager::new(store.clone(), seed::accounts(), events.clone()),
            cart: CartManager::new(store.clone(), events.clone()),
            orders: OrderManager::new(store.clone(), events.clone()),
            catalog: Catalog::new(store, events.clone()),
            events,
        };
        state.catalog.ensure_seeded()?;
        Ok(state)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
