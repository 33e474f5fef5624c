//! In-process tests for the storefront router.
//!
//! These drive the real router (middleware, session layer, templates) with an
//! in-memory session store and a temporary data directory. Nothing here
//! touches the database: customer login and catalog queries are covered by
//! `storefront_live.rs`.

use axum::http::StatusCode;
use serde_json::{Value, json};

use toiletpro_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp};

fn assert_envelope(body: &Value, success: bool, message: &str) {
    assert_eq!(body["success"], json!(success), "body: {body}");
    assert_eq!(body["message"], json!(message), "body: {body}");
}

async fn admin_login(app: &mut TestApp) {
    let resp = app
        .action(&[
            ("action", "admin_login"),
            ("username", ADMIN_USERNAME),
            ("password", ADMIN_PASSWORD),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_envelope(&resp.json(), true, "Admin login successful");
}

const THRONE: &[(&str, &str)] = &[
    ("action", "admin_add_product"),
    ("name", "Throne 3000"),
    ("description", "Heated seat, soft close lid"),
    ("price", "499.99"),
    ("category", "Smart"),
    ("badge", "New"),
    ("stock", "4"),
];

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

// =============================================================================
// Action Dispatch
// =============================================================================

#[tokio::test]
async fn test_unknown_action_is_invalid_request() {
    let mut app = TestApp::new();
    let resp = app.action(&[("action", "drop_tables")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Invalid request");
}

#[tokio::test]
async fn test_missing_action_is_invalid_request() {
    let mut app = TestApp::new();
    let resp = app.action(&[("email", "a@b.com")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Invalid request");
}

#[tokio::test]
async fn test_customer_actions_require_login() {
    let mut app = TestApp::new();
    let cases: &[&[(&str, &str)]] = &[
        &[("action", "add_to_cart"), ("product_id", "1")],
        &[("action", "update_cart"), ("product_id", "1"), ("quantity", "2")],
        &[("action", "remove_from_cart"), ("product_id", "1")],
        &[("action", "place_order")],
        &[
            ("action", "create_forum_topic"),
            ("title", "Low flow"),
            ("content", "Any tips?"),
        ],
        &[
            ("action", "add_forum_reply"),
            ("topic_id", "abc"),
            ("content", "Same here"),
        ],
    ];

    for fields in cases {
        let resp = app.action(fields).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{fields:?}");
        assert_envelope(&resp.json(), false, "Please login first");
    }
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let mut app = TestApp::new();
    let resp = app.action(&[("action", "logout")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_envelope(&resp.json(), true, "Logged out successfully");
}

// =============================================================================
// Admin Console
// =============================================================================

#[tokio::test]
async fn test_admin_actions_require_admin_login() {
    let mut app = TestApp::new();
    let resp = app.action(THRONE).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_envelope(&resp.json(), false, "Admin authentication required");

    let resp = app
        .action(&[("action", "admin_delete_product"), ("id", "1")])
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_login_rejects_wrong_password() {
    let mut app = TestApp::new();
    let resp = app
        .action(&[
            ("action", "admin_login"),
            ("username", ADMIN_USERNAME),
            ("password", "not-the-password"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_envelope(&resp.json(), false, "Invalid admin credentials");

    let page = app.get("/?page=admin").await;
    assert!(page.body.contains("Admin Access Required"));
}

#[tokio::test]
async fn test_admin_product_lifecycle() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let resp = app.action(THRONE).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_envelope(&body, true, "Product added successfully");
    assert_eq!(body["product_id"], json!(1));

    let page = app.get("/?page=admin").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Admin Dashboard"));
    assert!(page.body.contains("Throne 3000"));

    let resp = app
        .action(&[
            ("action", "admin_update_product"),
            ("id", "1"),
            ("name", "Throne 3000 Pro"),
            ("description", "Heated seat, soft close lid, night light"),
            ("price", "549.00"),
            ("category", "Smart"),
            ("stock", "2"),
        ])
        .await;
    assert_envelope(&resp.json(), true, "Product updated successfully");

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(app.data_file("products.json")).unwrap())
            .unwrap();
    assert_eq!(stored[0]["name"], json!("Throne 3000 Pro"));
    assert_eq!(stored[0]["stock"], json!(2));
    assert_eq!(stored[0]["badge"], json!(""));

    let resp = app
        .action(&[("action", "admin_delete_product"), ("id", "1")])
        .await;
    assert_envelope(&resp.json(), true, "Product deleted successfully");

    let resp = app
        .action(&[("action", "admin_delete_product"), ("id", "1")])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_envelope(&resp.json(), false, "Product not found");
}

#[tokio::test]
async fn test_admin_add_requires_fields() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let resp = app
        .action(&[
            ("action", "admin_add_product"),
            ("name", "Nameless"),
            ("description", "No price given"),
            ("price", "free"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Please fill all required fields");
    assert!(!app.data_file("products.json").exists());
}

#[tokio::test]
async fn test_admin_price_limit_keeps_catalog_usable() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let resp = app
        .action(&[
            ("action", "admin_add_product"),
            ("name", "Gold Throne"),
            ("description", "Solid gold bowl"),
            ("price", "79228162514264337593543950335"),
            ("stock", "2000000000"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Price cannot exceed $99,999,999.99");
    assert!(!app.data_file("products.json").exists());

    let resp = app
        .action(&[
            ("action", "admin_add_product"),
            ("name", "Platinum Throne"),
            ("description", "Priced at the limit"),
            ("price", "99999999.99"),
            ("stock", "2000000000"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let page = app.get("/?page=admin").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Platinum Throne"));
    assert!(page.body.contains("$99,999,999.99"));

    let resp = app.action(THRONE).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["product_id"], 2);
}

#[tokio::test]
async fn test_admin_update_rejects_bad_id() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let resp = app
        .action(&[
            ("action", "admin_update_product"),
            ("id", "0"),
            ("name", "X"),
            ("description", "Y"),
            ("price", "1.00"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Invalid product ID");

    let resp = app
        .action(&[
            ("action", "admin_update_product"),
            ("id", "42"),
            ("name", "X"),
            ("description", "Y"),
            ("price", "1.00"),
        ])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_logout_ends_admin_session() {
    let mut app = TestApp::new();
    admin_login(&mut app).await;

    let resp = app.action(&[("action", "admin_logout")]).await;
    assert_envelope(&resp.json(), true, "Admin logged out successfully");

    let resp = app.action(THRONE).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Preferences
// =============================================================================

#[tokio::test]
async fn test_preferences_apply_to_pages() {
    let mut app = TestApp::new();
    let resp = app
        .action(&[
            ("action", "update_preferences"),
            ("font_size", "large"),
            ("theme", "dark"),
        ])
        .await;
    assert_envelope(&resp.json(), true, "Preferences updated");

    let page = app.get("/?page=support").await;
    assert!(page.body.contains(r#"<body class="theme-dark font-large">"#));

    // Only the supplied field changes
    app.action(&[("action", "update_preferences"), ("theme", "blue")])
        .await;
    let page = app.get("/").await;
    assert!(page.body.contains(r#"<body class="theme-blue font-large">"#));
}

#[tokio::test]
async fn test_invalid_preference_is_rejected() {
    let mut app = TestApp::new();
    let resp = app
        .action(&[("action", "update_preferences"), ("theme", "neon")])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_envelope(&resp.json(), false, "Invalid preference value");
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_is_default_page() {
    let mut app = TestApp::new();
    let resp = app.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.body
            .contains("<title>ToiletPro - Premium Toilets &amp; Accessories</title>")
    );
    assert!(resp.body.contains(r#"<body class="theme-default font-medium">"#));
}

#[tokio::test]
async fn test_static_pages_render() {
    let mut app = TestApp::new();
    let cases = [
        ("contact-list", "James"),
        ("learn-more", "Secure Shopping"),
        ("shipping-info", "Shipping Information"),
        ("contact-us", "Contact Us"),
        ("support", "Customer Support"),
        ("careers", "Careers at ToiletPro"),
        ("order-confirmation", "N/A"),
    ];

    for (page, needle) in cases {
        let resp = app.get(&format!("/?page={page}")).await;
        assert_eq!(resp.status, StatusCode::OK, "{page}");
        assert!(resp.body.contains(needle), "{page} missing {needle}");
    }
}

#[tokio::test]
async fn test_guest_cart_is_empty() {
    let mut app = TestApp::new();
    let resp = app.get("/?page=cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let mut app = TestApp::new();
    let resp = app.get("/?page=wp-admin").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_empty_forum() {
    let mut app = TestApp::new();
    let resp = app.get("/?page=forum").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("No topics yet"));
}

#[tokio::test]
async fn test_forum_topic_page() {
    let mut app = TestApp::new();
    let topics = json!([{
        "id": "0192f3a4b5c67d8e9f0a1b2c3d4e5f60",
        "user_id": 7,
        "user_name": "Dana",
        "title": "Best bidet attachment?",
        "content": "Looking for something that fits a round bowl.",
        "category": "Products",
        "created_at": "2026-03-04T15:07:00Z",
        "views": 0,
        "replies": [{
            "id": "0192f3a4b5c67d8e9f0a1b2c3d4e5f61",
            "user_id": 8,
            "user_name": "Lee",
            "content": "The slim one in the catalog works for me.",
            "created_at": "2026-03-05T09:00:00Z"
        }],
        "last_reply": "2026-03-05T09:00:00Z"
    }]);
    std::fs::write(app.data_file("forum_topics.json"), topics.to_string()).unwrap();

    let listing = app.get("/?page=forum").await;
    assert!(listing.body.contains("Best bidet attachment?"));

    let resp = app
        .get("/?page=forum-topic&id=0192f3a4b5c67d8e9f0a1b2c3d4e5f60")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.body
            .contains("<title>Best bidet attachment? - ToiletPro Forum</title>")
    );
    assert!(resp.body.contains("The slim one in the catalog works for me."));

    let missing = app.get("/?page=forum-topic&id=nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body.contains("Topic Not Found"));

    let no_id = app.get("/?page=forum-topic").await;
    assert_eq!(no_id.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_summary_hidden_from_guests() {
    let mut app = TestApp::new();
    let orders = json!([{
        "order_number": "TP20260305090000123",
        "user_id": 7,
        "user_name": "Sarah",
        "user_email": "sarah@example.com",
        "items": [{
            "product_id": 1,
            "name": "Comfort Height Toilet",
            "price": 299.99,
            "category": "Toilet",
            "image": "",
            "quantity": 1
        }],
        "subtotal": 299.99,
        "shipping": 0,
        "tax": 24.0,
        "total": 323.99,
        "status": "pending",
        "order_date": "2026-03-05T09:00:00Z",
        "shipping_address": "123 Main St, City, State 12345"
    }]);
    std::fs::write(app.data_file("orders.json"), orders.to_string()).unwrap();

    let resp = app.get("/?page=order-confirmation&order=TP20260305090000123").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("TP20260305090000123"));
    assert!(!resp.body.contains("Order Summary"));
    assert!(!resp.body.contains("$323.99"));
}

#[tokio::test]
async fn test_response_headers() {
    let mut app = TestApp::new();
    let resp = app.get("/").await;
    assert_eq!(resp.headers["x-frame-options"], "DENY");
    assert_eq!(resp.headers["x-content-type-options"], "nosniff");
    assert!(resp.headers.contains_key("content-security-policy"));
    assert!(resp.headers.contains_key("x-request-id"));

    let action = app.action(&[("action", "logout")]).await;
    assert!(
        action.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );
}
