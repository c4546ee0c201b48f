use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    events::{StoreEvent, StoreEvents},
    middleware::auth::AuthUser,
    models::{Product, Role},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    seed,
    state::AppState,
    store::{PRODUCTS_KEY, Record, SharedStore, StoreError},
};

/// The product catalog record, seeded from the built-in list on first use.
#[derive(Clone)]
pub struct Catalog {
    products: Record<Vec<Product>>,
    events: StoreEvents,
}

impl Catalog {
    pub fn new(store: SharedStore, events: StoreEvents) -> Self {
        Self {
            products: Record::new(store, PRODUCTS_KEY),
            events,
        }
    }

    /// Writes the built-in catalog if the record is absent or unreadable.
    /// Returns whether it did.
    pub fn ensure_seeded(&self) -> Result<bool, StoreError> {
        let _guard = self.products.lock()?;
        if self.products.get()?.is_some() {
            return Ok(false);
        }
        self.products.put(&seed::products())?;
        tracing::info!("seeded product catalog");
        Ok(true)
    }

    /// Unconditionally replaces the catalog with the built-in list.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.products.lock()?;
        self.save(seed::products())
    }

    pub fn all(&self) -> Result<Vec<Product>, StoreError> {
        self.products.list()
    }

    pub fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.all()?.into_iter().find(|p| p.id == id))
    }

    pub fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let _guard = self.products.lock()?;
        let mut products = self.all()?;
        products.push(product.clone());
        self.save(products)?;
        Ok(product)
    }

    /// Replaces the product with the same id; `None` if there is none.
    pub fn replace(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let _guard = self.products.lock()?;
        let mut products = self.all()?;
        let Some(slot) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(None);
        };
        *slot = product.clone();
        self.save(products)?;
        Ok(Some(product))
    }

    /// Returns whether a product was removed.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.products.lock()?;
        let mut products = self.all()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Ok(false);
        }
        self.save(products)?;
        Ok(true)
    }

    fn save(&self, products: Vec<Product>) -> Result<(), StoreError> {
        self.products.put(&products)?;
        self.events.emit(StoreEvent::CatalogUpdated);
        Ok(())
    }
}

/// Case-insensitive match on name or brand, plus exact category.
pub fn matches_query(product: &Product, query: &ProductQuery) -> bool {
    if let Some(term) = query.q.as_ref().map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) {
        if !product.name.to_lowercase().contains(&term) && !product.brand.to_lowercase().contains(&term) {
            return false;
        }
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty() && *c != "all") {
        if product.category != category {
            return false;
        }
    }
    if let Some(in_stock) = query.in_stock {
        if product.in_stock != in_stock {
            return false;
        }
    }
    true
}

fn sort_products(products: &mut [Product], sort_by: &ProductSortBy, order: &SortOrder) {
    match sort_by {
        ProductSortBy::Catalog => {}
        ProductSortBy::Name => products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        ProductSortBy::Price => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        ProductSortBy::Rating => products.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
    }
    if matches!(order, SortOrder::Desc) {
        products.reverse();
    }
}

fn validate_product(product: &Product) -> AppResult<()> {
    for (field, value) in [
        ("name", &product.name),
        ("brand", &product.brand),
        ("category", &product.category),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} must not be empty")));
        }
    }
    let valid_price = |p: f64| p.is_finite() && p >= 0.0;
    if !valid_price(product.price) || product.original_price.is_some_and(|p| !valid_price(p)) {
        return Err(AppError::BadRequest("price must be a non-negative number".into()));
    }
    if !(0.0..=5.0).contains(&product.rating) {
        return Err(AppError::BadRequest("rating must be between 0 and 5".into()));
    }
    if product.discount.is_some_and(|d| d > 100) {
        return Err(AppError::BadRequest("discount must be between 0 and 100".into()));
    }
    Ok(())
}

/// Admins may touch any product; vendors only their own brand.
fn ensure_can_manage(user: &AuthUser, product: &Product) -> AppResult<()> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Vendor if user.vendor_brand.as_deref() == Some(product.brand.as_str()) => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

fn vendor_brand(user: &AuthUser) -> AppResult<Option<String>> {
    match user.role {
        Role::Admin => Ok(None),
        Role::Vendor => user
            .vendor_brand
            .clone()
            .map(Some)
            .ok_or(AppError::Forbidden),
        Role::Customer => Err(AppError::Forbidden),
    }
}

fn placeholder_image(name: &str) -> String {
    format!("/placeholder.svg?height=400&width=400&query={name}")
}

pub fn list_products(state: &AppState, query: ProductQuery) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut items: Vec<Product> = state
        .catalog
        .all()?
        .into_iter()
        .filter(|p| matches_query(p, &query))
        .collect();

    let sort_by = query.sort_by.as_ref().unwrap_or(&ProductSortBy::Catalog);
    let sort_order = query.sort_order.as_ref().unwrap_or(&SortOrder::Asc);
    sort_products(&mut items, sort_by, sort_order);

    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Product>> {
    let product = match state.catalog.get(id)? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", product, None))
}

pub fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let forced_brand = vendor_brand(user)?;

    let id = payload
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("prod-{}", Uuid::new_v4().simple()));
    if state.catalog.get(&id)?.is_some() {
        return Err(AppError::BadRequest(format!("product {id} already exists")));
    }

    let image = payload
        .image
        .filter(|img| !img.trim().is_empty())
        .unwrap_or_else(|| placeholder_image(&payload.name));

    let vendor_id = forced_brand.as_ref().map(|_| user.user_id.clone());
    let product = Product {
        id,
        brand: forced_brand.unwrap_or(payload.brand),
        name: payload.name,
        category: payload.category,
        price: payload.price,
        original_price: payload.original_price,
        discount: payload.discount,
        rating: payload.rating,
        reviews: payload.reviews,
        image,
        description: payload.description,
        ingredients: payload.ingredients,
        how_to_use: payload.how_to_use,
        vendor_id,
        in_stock: payload.in_stock,
    };
    validate_product(&product)?;

    let product = state.catalog.insert(product)?;

    log_audit(
        Some(&user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "brand": product.brand })),
    );

    Ok(ApiResponse::success("Product created", product, Some(Meta::empty())))
}

pub fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let forced_brand = vendor_brand(user)?;
    let existing = match state.catalog.get(id)? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    ensure_can_manage(user, &existing)?;

    let product = Product {
        id: existing.id,
        name: payload.name.unwrap_or(existing.name),
        brand: forced_brand.unwrap_or(payload.brand.unwrap_or(existing.brand)),
        category: payload.category.unwrap_or(existing.category),
        price: payload.price.unwrap_or(existing.price),
        original_price: payload.original_price.unwrap_or(existing.original_price),
        discount: payload.discount.unwrap_or(existing.discount),
        rating: payload.rating.unwrap_or(existing.rating),
        reviews: payload.reviews.unwrap_or(existing.reviews),
        image: payload.image.unwrap_or(existing.image),
        description: payload.description.unwrap_or(existing.description),
        ingredients: payload.ingredients.unwrap_or(existing.ingredients),
        how_to_use: payload.how_to_use.unwrap_or(existing.how_to_use),
        vendor_id: existing.vendor_id,
        in_stock: payload.in_stock.unwrap_or(existing.in_stock),
    };
    validate_product(&product)?;

    let product = match state.catalog.replace(product)? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    log_audit(
        Some(&user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    );

    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    vendor_brand(user)?;
    let existing = match state.catalog.get(id)? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    ensure_can_manage(user, &existing)?;

    if !state.catalog.remove(id)? {
        return Err(AppError::NotFound);
    }

    log_audit(
        Some(&user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    );

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn catalog() -> (SharedStore, Catalog) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store.clone(), StoreEvents::default());
        (store, catalog)
    }

    fn query(q: Option<&str>, category: Option<&str>) -> ProductQuery {
        ProductQuery {
            page: None,
            per_page: None,
            q: q.map(Into::into),
            category: category.map(Into::into),
            in_stock: None,
            sort_by: None,
            sort_order: None,
        }
    }

    #[test]
    fn seeds_once() {
        let (_, catalog) = catalog();
        assert!(catalog.ensure_seeded().unwrap());
        catalog.remove("prod-1").unwrap();
        assert!(!catalog.ensure_seeded().unwrap());
        assert_eq!(catalog.all().unwrap().len(), 4);
    }

    #[test]
    fn corrupt_catalog_is_reseeded() {
        let (store, catalog) = catalog();
        store.put(PRODUCTS_KEY, "[oops").unwrap();
        assert!(catalog.ensure_seeded().unwrap());
        assert_eq!(catalog.all().unwrap().len(), 5);
    }

    #[test]
    fn search_matches_name_or_brand_case_insensitively() {
        let products = seed::products();
        let hits: Vec<_> = products
            .iter()
            .filter(|p| matches_query(p, &query(Some("vitamin c"), None)))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(hits, vec!["prod-1", "prod-5"]);

        let hits: Vec<_> = products
            .iter()
            .filter(|p| matches_query(p, &query(Some("MINIMAL"), None)))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(hits, vec!["prod-2"]);
    }

    #[test]
    fn category_all_disables_the_filter() {
        let products = seed::products();
        let face = products
            .iter()
            .filter(|p| matches_query(p, &query(None, Some("Face Care"))))
            .count();
        let all = products
            .iter()
            .filter(|p| matches_query(p, &query(None, Some("all"))))
            .count();
        assert_eq!(face, 2);
        assert_eq!(all, 5);
    }

    #[test]
    fn sorting_by_price_descending() {
        let mut products = seed::products();
        sort_products(&mut products, &ProductSortBy::Price, &SortOrder::Desc);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![599.0, 499.0, 470.0, 399.0, 249.0]);
    }

    #[test]
    fn replace_and_remove_report_missing_ids() {
        let (_, catalog) = catalog();
        catalog.ensure_seeded().unwrap();

        let mut ghost = seed::products().remove(0);
        ghost.id = "prod-404".into();
        assert!(catalog.replace(ghost).unwrap().is_none());
        assert!(!catalog.remove("prod-404").unwrap());
        assert_eq!(catalog.all().unwrap(), seed::products());
    }

    #[test]
    fn vendors_manage_only_their_brand() {
        let vendor = AuthUser {
            user_id: "vendor-1".into(),
            role: Role::Vendor,
            vendor_brand: Some("Mamaearth".into()),
        };
        let products = seed::products();
        assert!(ensure_can_manage(&vendor, &products[0]).is_ok());
        assert!(matches!(
            ensure_can_manage(&vendor, &products[1]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn fractional_prices_survive_a_restart() {
        let (store, catalog) = catalog();
        let raw = serde_json::to_string(&seed::products())
            .unwrap()
            .replacen("\"price\":249.0", "\"price\":249.5", 1);
        store.put(PRODUCTS_KEY, &raw).unwrap();

        assert!(!catalog.ensure_seeded().unwrap());
        assert_eq!(catalog.get("prod-1").unwrap().map(|p| p.price), Some(249.5));
        assert!(store.get(PRODUCTS_KEY).unwrap().unwrap().contains("\"price\":249.5"));
    }

    #[test]
    fn concurrent_inserts_are_all_kept() {
        let (_, catalog) = catalog();
        catalog.ensure_seeded().unwrap();
        let template = seed::products().remove(0);

        std::thread::scope(|scope| {
            for t in 0..8 {
                let catalog = catalog.clone();
                let template = template.clone();
                scope.spawn(move || {
                    for i in 0..25 {
                        let mut product = template.clone();
                        product.id = format!("prod-t{t}-{i}");
                        catalog.insert(product).unwrap();
                    }
                });
            }
        });
        assert_eq!(catalog.all().unwrap().len(), 5 + 8 * 25);
    }

    #[test]
    fn explicit_null_clears_discount_and_missing_field_keeps_it() {
        let state = AppState::in_memory().unwrap();
        let admin = AuthUser {
            user_id: "admin-1".into(),
            role: Role::Admin,
            vendor_brand: None,
        };

        let keep: UpdateProductRequest = serde_json::from_str(r#"{"price": 259.99}"#).unwrap();
        let kept = update_product(&state, &admin, "prod-1", keep).unwrap().data.unwrap();
        assert_eq!(kept.price, 259.99);
        assert_eq!(kept.original_price, Some(299.0));
        assert!(kept.discount.is_some());

        let clear: UpdateProductRequest =
            serde_json::from_str(r#"{"originalPrice": null, "discount": null}"#).unwrap();
        let cleared = update_product(&state, &admin, "prod-1", clear).unwrap().data.unwrap();
        assert_eq!(cleared.original_price, None);
        assert_eq!(cleared.discount, None);
        assert_eq!(cleared.price, 259.99);
    }
}
