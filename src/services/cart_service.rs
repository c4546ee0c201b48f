use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartCount, CartItemDto, CartView, UpdateCartItemRequest},
    error::{AppError, AppResult},
    events::{StoreEvent, StoreEvents},
    models::CartLine,
    response::{ApiResponse, Meta},
    state::AppState,
    store::{CART_KEY, Record, SharedStore, StoreError},
};

/// Largest quantity a single request may add or set.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// The profile's cart. Shared by whoever is signed in, not per account.
///
/// Quantities are taken as given; callers reject anything below 1.
/// Line quantities saturate instead of wrapping.
#[derive(Clone)]
pub struct CartManager {
    lines: Record<Vec<CartLine>>,
    events: StoreEvents,
}

impl CartManager {
    pub fn new(store: SharedStore, events: StoreEvents) -> Self {
        Self {
            lines: Record::new(store, CART_KEY),
            events,
        }
    }

    pub fn get_cart(&self) -> Result<Vec<CartLine>, StoreError> {
        self.lines.list()
    }

    pub fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<(), StoreError> {
        let _guard = self.lines.lock()?;
        let mut cart = self.get_cart()?;
        match cart.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => cart.push(CartLine {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
        self.save(cart)
    }

    /// Returns whether a line was found.
    pub fn update_quantity(&self, product_id: &str, quantity: u32) -> Result<bool, StoreError> {
        let _guard = self.lines.lock()?;
        let mut cart = self.get_cart()?;
        let Some(line) = cart.iter_mut().find(|line| line.product_id == product_id) else {
            return Ok(false);
        };
        line.quantity = quantity;
        self.save(cart)?;
        Ok(true)
    }

    pub fn remove_from_cart(&self, product_id: &str) -> Result<(), StoreError> {
        let _guard = self.lines.lock()?;
        let mut cart = self.get_cart()?;
        cart.retain(|line| line.product_id != product_id);
        self.save(cart)
    }

    pub fn clear_cart(&self) -> Result<(), StoreError> {
        let _guard = self.lines.lock()?;
        self.delete()
    }

    /// Hands the current lines to `place` and empties the cart if it
    /// succeeds. Other cart writers wait until this returns.
    pub fn checkout_with<T, E>(
        &self,
        place: impl FnOnce(Vec<CartLine>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lines.lock()?;
        let placed = place(self.get_cart()?)?;
        self.delete()?;
        Ok(placed)
    }

    pub fn cart_count(&self) -> Result<u64, StoreError> {
        Ok(count_units(&self.get_cart()?))
    }

    fn delete(&self) -> Result<(), StoreError> {
        self.lines.delete()?;
        self.events.emit(StoreEvent::CartUpdated);
        Ok(())
    }

    fn save(&self, cart: Vec<CartLine>) -> Result<(), StoreError> {
        self.lines.put(&cart)?;
        self.events.emit(StoreEvent::CartUpdated);
        Ok(())
    }
}

fn count_units(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

fn positive_quantity(quantity: i32) -> AppResult<u32> {
    match u32::try_from(quantity) {
        Ok(q) if (1..=MAX_LINE_QUANTITY).contains(&q) => Ok(q),
        _ => Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_LINE_QUANTITY}"
        ))),
    }
}

/// Cart lines joined with the catalog. Lines whose product is gone are
/// left out of the listing and the subtotal but still count for the badge.
pub fn list_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let lines = state.cart.get_cart()?;
    let products = state.catalog.all()?;

    let items: Vec<CartItemDto> = lines
        .iter()
        .filter_map(|line| {
            let product = products.iter().find(|p| p.id == line.product_id)?;
            Some(CartItemDto {
                line_total: product.price * f64::from(line.quantity),
                product: product.clone(),
                quantity: line.quantity,
            })
        })
        .collect();

    let subtotal = items.iter().fold(0.0, |sum, item| sum + item.line_total);
    let count = count_units(&lines);

    Ok(ApiResponse::success(
        "OK",
        CartView {
            items,
            subtotal,
            count,
        },
        Some(Meta::empty()),
    ))
}

pub fn add_to_cart(state: &AppState, payload: AddToCartRequest) -> AppResult<ApiResponse<CartCount>> {
    let quantity = positive_quantity(payload.quantity)?;
    if state.catalog.get(&payload.product_id)?.is_none() {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    state.cart.add_to_cart(&payload.product_id, quantity)?;

    log_audit(
        None,
        "cart_add",
        Some("cart"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": quantity })),
    );

    let count = state.cart.cart_count()?;
    Ok(ApiResponse::success("Added to cart", CartCount { count }, None))
}

pub fn update_cart_item(
    state: &AppState,
    product_id: &str,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartCount>> {
    let quantity = positive_quantity(payload.quantity)?;
    if !state.cart.update_quantity(product_id, quantity)? {
        return Err(AppError::NotFound);
    }

    log_audit(
        None,
        "cart_update",
        Some("cart"),
        Some(serde_json::json!({ "product_id": product_id, "quantity": quantity })),
    );

    let count = state.cart.cart_count()?;
    Ok(ApiResponse::success("Cart updated", CartCount { count }, Some(Meta::empty())))
}

pub fn remove_from_cart(state: &AppState, product_id: &str) -> AppResult<ApiResponse<CartCount>> {
    state.cart.remove_from_cart(product_id)?;

    log_audit(
        None,
        "cart_remove",
        Some("cart"),
        Some(serde_json::json!({ "product_id": product_id })),
    );

    let count = state.cart.cart_count()?;
    Ok(ApiResponse::success(
        "Removed from cart",
        CartCount { count },
        Some(Meta::empty()),
    ))
}

pub fn clear_cart(state: &AppState) -> AppResult<ApiResponse<CartCount>> {
    state.cart.clear_cart()?;
    log_audit(None, "cart_clear", Some("cart"), None);
    Ok(ApiResponse::success("Cart cleared", CartCount { count: 0 }, Some(Meta::empty())))
}

pub fn cart_count(state: &AppState) -> AppResult<ApiResponse<CartCount>> {
    let count = state.cart.cart_count()?;
    Ok(ApiResponse::success("OK", CartCount { count }, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn cart() -> (SharedStore, CartManager) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cart = CartManager::new(store.clone(), StoreEvents::default());
        (store, cart)
    }

    fn line(product_id: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: product_id.into(),
            quantity,
        }
    }

    #[test]
    fn add_increment_remove_scenario() {
        let (_, cart) = cart();
        assert!(cart.get_cart().unwrap().is_empty());

        cart.add_to_cart("prod-1", 2).unwrap();
        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-1", 2)]);

        cart.add_to_cart("prod-1", 1).unwrap();
        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-1", 3)]);

        cart.remove_from_cart("prod-1").unwrap();
        assert!(cart.get_cart().unwrap().is_empty());
    }

    #[test]
    fn lines_keep_insertion_order_and_count_sums_quantities() {
        let (_, cart) = cart();
        cart.add_to_cart("prod-2", 1).unwrap();
        cart.add_to_cart("prod-1", 4).unwrap();
        cart.add_to_cart("prod-2", 2).unwrap();

        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-2", 3), line("prod-1", 4)]);
        assert_eq!(cart.cart_count().unwrap(), 7);
    }

    #[test]
    fn update_quantity_only_touches_existing_lines() {
        let (_, cart) = cart();
        cart.add_to_cart("prod-1", 1).unwrap();

        assert!(cart.update_quantity("prod-1", 5).unwrap());
        assert!(!cart.update_quantity("prod-9", 5).unwrap());
        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-1", 5)]);
    }

    #[test]
    fn removing_unknown_product_leaves_cart_unchanged() {
        let (_, cart) = cart();
        cart.add_to_cart("prod-1", 2).unwrap();
        cart.add_to_cart("prod-3", 1).unwrap();
        let before = cart.get_cart().unwrap();

        cart.remove_from_cart("prod-404").unwrap();
        assert_eq!(cart.get_cart().unwrap(), before);
    }

    #[test]
    fn clear_deletes_the_record() {
        let (store, cart) = cart();
        cart.add_to_cart("prod-1", 2).unwrap();
        cart.add_to_cart("prod-2", 1).unwrap();

        cart.clear_cart().unwrap();
        assert!(cart.get_cart().unwrap().is_empty());
        assert!(store.get(CART_KEY).unwrap().is_none());
        assert_eq!(cart.cart_count().unwrap(), 0);
    }

    #[test]
    fn corrupt_cart_reads_empty_and_is_overwritten() {
        let (store, cart) = cart();
        store.put(CART_KEY, "[{\"productId\":1}]").unwrap();
        assert!(cart.get_cart().unwrap().is_empty());

        cart.add_to_cart("prod-1", 1).unwrap();
        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-1", 1)]);
    }

    #[test]
    fn mutations_emit_cart_events() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let events = StoreEvents::default();
        let mut rx = events.subscribe();
        let cart = CartManager::new(store, events);

        cart.add_to_cart("prod-1", 1).unwrap();
        cart.clear_cart().unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartUpdated);
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartUpdated);
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        let (_, cart) = cart();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cart = cart.clone();
                scope.spawn(move || {
                    for _ in 0..200 {
                        cart.add_to_cart("prod-1", 1).unwrap();
                    }
                });
            }
        });
        assert_eq!(cart.get_cart().unwrap(), vec![line("prod-1", 1600)]);
        assert_eq!(cart.cart_count().unwrap(), 1600);
    }

    #[test]
    fn huge_quantities_saturate_instead_of_wrapping() {
        let (_, cart) = cart();
        cart.add_to_cart("prod-1", u32::MAX).unwrap();
        cart.add_to_cart("prod-1", u32::MAX).unwrap();
        cart.add_to_cart("prod-2", u32::MAX).unwrap();

        assert_eq!(cart.get_cart().unwrap()[0].quantity, u32::MAX);
        assert_eq!(cart.cart_count().unwrap(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn request_quantity_is_bounded() {
        assert_eq!(positive_quantity(1).unwrap(), 1);
        assert_eq!(positive_quantity(999).unwrap(), MAX_LINE_QUANTITY);
        for bad in [0, -1, 1000, i32::MAX] {
            assert!(matches!(positive_quantity(bad), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn failed_checkout_keeps_the_cart() {
        let (_, cart) = cart();
        cart.add_to_cart("prod-1", 2).unwrap();

        let failed: Result<(), AppError> =
            cart.checkout_with(|_| Err(AppError::BadRequest("no".into())));
        assert!(failed.is_err());
        assert_eq!(cart.cart_count().unwrap(), 2);

        let placed: Result<usize, AppError> = cart.checkout_with(|lines| Ok(lines.len()));
        assert_eq!(placed.unwrap(), 1);
        assert!(cart.get_cart().unwrap().is_empty());
    }
}
