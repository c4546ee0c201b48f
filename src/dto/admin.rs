use serde::Serialize;
use utoipa::ToSchema;

use crate::models::SessionUser;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_customers: usize,
    pub revenue: f64,
    pub orders_by_status: Vec<StatusCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    pub brand: String,
    pub total_products: usize,
    /// Review count stands in for units sold.
    pub total_sales: u64,
    pub estimated_revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<SessionUser>,
}
