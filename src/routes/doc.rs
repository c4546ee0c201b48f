use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{AdminStats, StatusCount, UserList, VendorStats},
        auth::{LoginRequest, LoginResponse, SignupRequest},
        cart::{AddToCartRequest, CartCount, CartItemDto, CartView, UpdateCartItemRequest},
        orders::{CheckoutRequest, OrderList, UpdateOrderStatusRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{
        CartLine, Order, OrderItem, OrderStatus, PaymentMethod, Product, Role, SessionUser,
        ShippingAddress,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, products, vendor},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::login,
        auth::logout,
        auth::session,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::cart_count,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::dashboard_stats,
        admin::list_users,
        vendor::vendor_products,
        vendor::vendor_stats
    ),
    components(
        schemas(
            Role,
            SessionUser,
            Product,
            CartLine,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            ShippingAddress,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartView,
            CartItemDto,
            CartCount,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            AdminStats,
            StatusCount,
            VendorStats,
            UserList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartView>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Session endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Admin", description = "Admin dashboard endpoints"),
        (name = "Vendor", description = "Vendor dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
