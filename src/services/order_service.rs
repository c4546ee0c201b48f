use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, OrderList},
    error::{AppError, AppResult},
    events::{StoreEvent, StoreEvents},
    middleware::auth::AuthUser,
    models::{Order, OrderDraft, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    store::{ORDERS_KEY, Record, SharedStore, StoreError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Transition(err) => AppError::InvalidTransition(err),
            OrderError::Store(err) => AppError::Store(err),
        }
    }
}

/// Append-only list of every order placed in this profile.
#[derive(Clone)]
pub struct OrderManager {
    orders: Record<Vec<Order>>,
    events: StoreEvents,
}

impl OrderManager {
    pub fn new(store: SharedStore, events: StoreEvents) -> Self {
        Self {
            orders: Record::new(store, ORDERS_KEY),
            events,
        }
    }

    pub fn all_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.orders.list()
    }

    /// Items and total are stored exactly as drafted; nothing is repriced.
    pub fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let _guard = self.orders.lock()?;
        let mut orders = self.all_orders()?;

        let mut id = new_order_id();
        while orders.iter().any(|o| o.id == id) {
            id = new_order_id();
        }

        let order = Order {
            id,
            user_id: draft.user_id,
            items: draft.items,
            total: draft.total,
            status: OrderStatus::Pending,
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            created_at: Utc::now(),
        };

        orders.push(order.clone());
        self.orders.put(&orders)?;
        self.events.emit(StoreEvent::OrdersUpdated);
        Ok(order)
    }

    /// `Ok(None)` when no order has this id; the list is left untouched.
    pub fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError> {
        let _guard = self.orders.lock()?;
        let mut orders = self.all_orders()?;
        let Some(order) = orders.iter_mut().find(|o| o.id == order_id) else {
            return Ok(None);
        };

        if !order.status.can_transition_to(status) {
            return Err(TransitionError {
                from: order.status,
                to: status,
            }
            .into());
        }

        order.status = status;
        let updated = order.clone();
        self.orders.put(&orders)?;
        self.events.emit(StoreEvent::OrdersUpdated);
        Ok(Some(updated))
    }

    pub fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .all_orders()?
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .collect())
    }
}

fn new_order_id() -> String {
    format!("order-{}", Uuid::new_v4().simple())
}

/// Status filter and creation-time ordering shared by customer and admin listings.
pub fn apply_order_query(mut orders: Vec<Order>, query: &OrderListQuery) -> Vec<Order> {
    if let Some(status) = query.status {
        orders.retain(|o| o.status == status);
    }
    orders.sort_by_key(|o| o.created_at);
    if matches!(query.sort_order.as_ref().unwrap_or(&SortOrder::Desc), SortOrder::Desc) {
        orders.reverse();
    }
    orders
}

pub fn paginate_orders(orders: Vec<Order>, query: &OrderListQuery) -> (Vec<Order>, Meta) {
    let (page, limit, offset) = query.pagination().normalize();
    let total = orders.len() as i64;
    let items = orders
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    (items, Meta::new(page, limit, total))
}

pub fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let orders = apply_order_query(state.orders.orders_for_user(&user.user_id)?, &query);
    let (items, meta) = paginate_orders(orders, &query);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub fn get_order(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = state
        .orders
        .orders_for_user(&user.user_id)?
        .into_iter()
        .find(|o| o.id == id);
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// Turns the cart into a pending order at current catalog prices, then
/// empties the cart. Lines for products no longer in the catalog are dropped.
/// The cart stays locked from read to clear, so concurrent additions land
/// either in this order or in the next cart.
pub fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    if let Some(field) = payload.shipping_address.first_blank_field() {
        return Err(AppError::BadRequest(format!(
            "shipping address {field} is required"
        )));
    }

    let products = state.catalog.all()?;

    let order = state.cart.checkout_with(|lines| -> AppResult<Order> {
        let items: Vec<OrderItem> = lines
            .iter()
            .filter_map(|line| {
                let product = products.iter().find(|p| p.id == line.product_id)?;
                Some(OrderItem {
                    product_id: product.id.clone(),
                    quantity: line.quantity,
                    price: product.price,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".into()));
        }
        if items.len() < lines.len() {
            tracing::warn!(
                skipped = lines.len() - items.len(),
                "checkout dropped cart lines for unknown products"
            );
        }

        let total = items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum();

        Ok(state.orders.create_order(OrderDraft {
            user_id: user.user_id.clone(),
            items,
            total,
            shipping_address: payload.shipping_address,
            payment_method: payload.payment_method,
        })?)
    })?;

    log_audit(
        Some(&user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total })),
    );

    Ok(ApiResponse::success(
        "Checkout success",
        order,
        Some(Meta::empty()),
    ))
}
