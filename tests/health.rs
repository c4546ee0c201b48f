use axum::extract::State;
use skincare_storefront::{routes::health::health_check, state::AppState};

#[tokio::test]
async fn health_check_reports_seeded_catalog() {
    let state = AppState::in_memory().expect("state");
    let response = health_check(State(state)).await.expect("health");
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.catalog_size, 5);
}
