//! Integration tests for the cart panel and its HTMX endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bottega_core::AggregationPolicy;
use bottega_integration_tests::TestClient;

#[tokio::test]
async fn test_home_page_lists_products_with_closed_empty_cart() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Widget"));
    assert!(resp.body.contains("€ 9.99"));
    assert!(resp.body.contains("Gadget"));
    assert!(resp.body.contains("€ 5.00"));
    assert!(resp.body.contains(r#"id="cart-panel""#));
    assert!(!resp.body.contains("cart-panel open"));
    assert!(resp.body.contains("€ 0.00"));
    // Two cards seed the strip the browser script animates.
    assert!(resp.body.contains(r#"data-speed="1.00" data-max-offset="480""#));

    let csp = resp.header("content-security-policy").unwrap();
    assert!(csp.contains("'nonce-"));
    assert!(resp.body.contains("nonce=\""));
}

#[tokio::test]
async fn test_merge_policy_increments_quantity() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    client.post("/cart/add", "id=p1").await;
    let resp = client.post("/cart/add", "id=p1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("cart-panel open"));
    assert!(resp.body.contains("2 x € 9.99"));
    assert_eq!(resp.body.matches("cart-item-name").count(), 1);
    assert!(resp.body.contains("€ 19.98"));

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">2</span>"));
}

#[tokio::test]
async fn test_append_policy_keeps_separate_lines() {
    let mut client = TestClient::new(AggregationPolicy::Append);
    client.post("/cart/add", "id=p1").await;
    client.post("/cart/add", "id=p2").await;
    let resp = client.post("/cart/add", "id=p1").await;

    assert_eq!(resp.body.matches("1 x € 9.99").count(), 2);
    assert_eq!(resp.body.matches("cart-item-name").count(), 3);
    assert!(resp.body.contains("€ 24.98"));

    // Removing under append drops every line for the product.
    let resp = client.post("/cart/remove", "id=p1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(!resp.body.contains("Widget"));
    assert!(resp.body.contains("1 x € 5.00"));

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_merge_remove_decrements_then_drops_line() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    client.post("/cart/add", "id=p1").await;
    client.post("/cart/add", "id=p1").await;

    let resp = client.post("/cart/remove", "id=p1").await;
    assert!(resp.body.contains("1 x € 9.99"));

    let resp = client.post("/cart/remove", "id=p1").await;
    assert!(!resp.body.contains("Widget"));
    assert!(resp.body.contains("€ 0.00"));

    // Removing something that is not there is a no-op, not an error.
    let resp = client.post("/cart/remove", "id=p1").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.post("/cart/add", "id=nope").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">0</span>"));
}

#[tokio::test]
async fn test_blank_product_id_is_bad_request() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.post("/cart/add", "id=+").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_on_empty_cart_shows_notice() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.post("/cart/checkout", "").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.cart_notice(), Some("Your cart is empty!"));
    assert!(resp.cart_panel().unwrap().contains("disabled"));
}

#[tokio::test]
async fn test_checkout_reports_total_and_clears_cart() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    client.post("/cart/add", "id=p1").await;
    client.post("/cart/add", "id=p1").await;

    let resp = client.post("/cart/checkout", "").await;
    assert_eq!(resp.status, StatusCode::OK);

    // The panel closes, so the total is reported in the notice region
    // swapped in out of band, not inside the panel.
    let panel = resp.cart_panel().unwrap();
    assert!(!panel.contains("cart-panel open"));
    assert!(!panel.contains("Proceeding to checkout"));
    assert!(!panel.contains("Widget"));
    assert_eq!(
        resp.cart_notice(),
        Some("Proceeding to checkout! Total to pay: € 19.98")
    );
    assert!(resp.body.contains(r#"hx-swap-oob="true""#));

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">0</span>"));

    // The notice is shown once; the next render clears the region.
    let next = client.get("/cart").await;
    assert_eq!(next.cart_notice(), None);
    assert!(next.body.contains(r#"id="cart-notice""#));
}

#[tokio::test]
async fn test_home_page_has_hidden_notice_region() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.get("/").await;

    assert!(resp.body.contains(r#"id="cart-notice" class="cart-notice""#));
    assert_eq!(resp.cart_notice(), None);
    assert!(!resp.body.contains("hx-swap-oob"));
}

#[tokio::test]
async fn test_add_rejects_total_overflow() {
    const HUGE_CATALOG: &str = r#"{
        "products": [
            { "id": "yacht", "name": "Yacht", "price": "40000000000000000000000000000" }
        ]
    }"#;

    for policy in [AggregationPolicy::Merge, AggregationPolicy::Append] {
        let mut client = TestClient::with_catalog(policy, HUGE_CATALOG);
        let resp = client.post("/cart/add", "id=yacht").await;
        assert_eq!(resp.status, StatusCode::OK);

        let resp = client.post("/cart/add", "id=yacht").await;
        assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

        // The rejected add left the cart as it was, and it still renders.
        let count = client.get("/cart/count").await;
        assert!(count.body.contains(">1</span>"));
        let panel = client.get("/cart").await;
        assert_eq!(panel.status, StatusCode::OK);
        assert_eq!(panel.body.matches("cart-item-name").count(), 1);
    }
}

#[tokio::test]
async fn test_toggle_opens_and_closes_panel() {
    let mut client = TestClient::new(AggregationPolicy::Merge);

    let resp = client.post("/cart/toggle", "").await;
    assert!(resp.body.contains("cart-panel open"));

    let resp = client.post("/cart/toggle", "").await;
    assert!(!resp.body.contains("cart-panel open"));
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let mut alice = TestClient::new(AggregationPolicy::Merge);
    alice.post("/cart/add", "id=p1").await;

    let mut bob = alice.stranger();
    let count = bob.get("/cart/count").await;
    assert!(count.body.contains(">0</span>"));

    let count = alice.get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_cart_fragments_are_not_cached() {
    let mut client = TestClient::new(AggregationPolicy::Merge);
    let resp = client.get("/cart").await;
    assert_eq!(resp.header("cache-control"), Some("no-store, max-age=0"));
    assert!(resp.header("x-request-id").is_some());
}
