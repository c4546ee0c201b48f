use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{admin::VendorStats, products::ProductList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(vendor_products))
        .route("/stats", get(vendor_stats))
}

#[utoipa::path(
    get,
    path = "/api/vendor/products",
    responses(
        (status = 200, description = "Products of the vendor's brand", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden")
    ),
    tag = "Vendor"
)]
pub async fn vendor_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = admin_service::vendor_products(&state, &user)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/stats",
    responses(
        (status = 200, description = "Vendor dashboard estimates", body = ApiResponse<VendorStats>),
        (status = 403, description = "Forbidden")
    ),
    tag = "Vendor"
)]
pub async fn vendor_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<VendorStats>>> {
    let resp = admin_service::vendor_stats(&state, &user)?;
    Ok(Json(resp))
}
