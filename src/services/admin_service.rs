use crate::{
    audit::log_audit,
    dto::{
        admin::{AdminStats, StatusCount, UserList, VendorStats},
        orders::{OrderList, UpdateOrderStatusRequest},
        products::ProductList,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_vendor},
    models::{Order, OrderStatus, Product, Role, SessionUser},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{apply_order_query, paginate_orders},
    state::AppState,
};

pub fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let orders = apply_order_query(state.orders.all_orders()?, &query);
    let (items, meta) = paginate_orders(orders, &query);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub fn get_order_admin(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = state.orders.all_orders()?.into_iter().find(|o| o.id == id);
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

pub fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let order = match state.orders.update_order_status(id, payload.status)? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    log_audit(
        Some(&user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    );

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub fn admin_stats(orders: &[Order], products: &[Product], accounts: &[SessionUser]) -> AdminStats {
    let orders_by_status = OrderStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.to_string(),
            count: orders.iter().filter(|o| o.status == *status).count(),
        })
        .collect();

    AdminStats {
        total_products: products.len(),
        total_orders: orders.len(),
        total_customers: accounts.iter().filter(|a| a.role == Role::Customer).count(),
        revenue: orders.iter().fold(0.0, |sum, o| sum + o.total),
        orders_by_status,
    }
}

pub fn dashboard_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(user)?;
    let accounts: Vec<SessionUser> = state.accounts.accounts()?.iter().map(SessionUser::from).collect();
    let stats = admin_stats(&state.orders.all_orders()?, &state.catalog.all()?, &accounts);
    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}

pub fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let items: Vec<SessionUser> = state.accounts.accounts()?.iter().map(SessionUser::from).collect();
    let meta = Meta::whole(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

/// Vendor figures are estimates: review counts stand in for units sold.
pub fn vendor_stats_for(brand: &str, products: &[Product]) -> VendorStats {
    let own: Vec<&Product> = products.iter().filter(|p| p.brand == brand).collect();
    VendorStats {
        brand: brand.to_string(),
        total_products: own.len(),
        total_sales: own.iter().map(|p| u64::from(p.reviews)).sum(),
        estimated_revenue: own
            .iter()
            .fold(0.0, |sum, p| sum + p.price * f64::from(p.reviews)),
    }
}

fn brand_of(user: &AuthUser) -> AppResult<&str> {
    ensure_vendor(user)?;
    user.vendor_brand.as_deref().ok_or(AppError::Forbidden)
}

pub fn vendor_products(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ProductList>> {
    let brand = brand_of(user)?;
    let items: Vec<Product> = state
        .catalog
        .all()?
        .into_iter()
        .filter(|p| p.brand == brand)
        .collect();
    let meta = Meta::whole(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub fn vendor_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<VendorStats>> {
    let brand = brand_of(user)?;
    let stats = vendor_stats_for(brand, &state.catalog.all()?);
    Ok(ApiResponse::success("Vendor dashboard", stats, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn vendor_stats_only_count_own_brand() {
        let stats = vendor_stats_for("Mamaearth", &seed::products());
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.total_sales, 2453);
        assert_eq!(stats.estimated_revenue, 249.0 * 2453.0);

        let none = vendor_stats_for("Nobody", &seed::products());
        assert_eq!(none.total_products, 0);
        assert_eq!(none.estimated_revenue, 0.0);
    }

    #[test]
    fn admin_stats_count_customers_and_revenue() {
        let accounts: Vec<SessionUser> = seed::accounts().iter().map(SessionUser::from).collect();
        let stats = admin_stats(&[], &seed::products(), &accounts);
        assert_eq!(stats.total_products, 5);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.revenue, 0.0);
        assert_eq!(stats.orders_by_status.len(), 5);
        assert!(stats.orders_by_status.iter().all(|s| s.count == 0));
    }

    #[test]
    fn customers_cannot_see_vendor_dashboard() {
        let customer = AuthUser {
            user_id: "customer-1".into(),
            role: Role::Customer,
            vendor_brand: None,
        };
        assert!(matches!(brand_of(&customer), Err(AppError::Forbidden)));
    }
}
