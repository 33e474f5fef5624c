//! Integration tests against a running storefront.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p toiletpro-cli -- migrate`)
//! - The storefront running (`cargo run -p toiletpro-storefront`)
//! - `TOILETPRO_DATABASE_URL` pointing at the same database
//!
//! Run with: cargo test -p toiletpro-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use toiletpro_core::OrderStatus;
use toiletpro_integration_tests::storefront_base_url;

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn database() -> PgPool {
    let url = std::env::var("TOILETPRO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TOILETPRO_DATABASE_URL must be set");
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

async fn action(client: &Client, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}/", storefront_base_url()))
        .form(fields)
        .send()
        .await
        .expect("Failed to send action");
    let status = resp.status();
    let body = resp.json().await.expect("Action response is JSON");
    (status, body)
}

/// Register a fresh customer on `client` and return their email.
async fn register(client: &Client) -> String {
    let email = format!("it-{}@example.com", Uuid::new_v4().simple());
    let (status, body) = action(
        client,
        &[
            ("action", "register"),
            ("name", "Integration Tester"),
            ("email", &email),
            ("password", "flush-twice-2026"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Registration successful");
    email
}

async fn insert_product(pool: &PgPool, name: &str, price: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO products (name, description, price, category, stock) \
         VALUES ($1, 'Integration test product', $2::numeric, 'Toilet', 10) RETURNING id",
    )
    .bind(name)
    .bind(price)
    .fetch_one(pool)
    .await
    .expect("Failed to insert product")
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_register_then_login() {
    let client = client();
    let email = register(&client).await;

    let (_, body) = action(&client, &[("action", "logout")]).await;
    assert_eq!(body["success"], true);

    let (status, body) = action(
        &client,
        &[
            ("action", "login"),
            ("email", &email),
            ("password", "wrong-password-1"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = action(
        &client,
        &[
            ("action", "login"),
            ("email", &email),
            ("password", "flush-twice-2026"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let home = client
        .get(format!("{}/", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get home")
        .text()
        .await
        .expect("Failed to read home");
    assert!(home.contains("Integration Tester"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_registration_conflicts() {
    let client = client();
    let email = register(&client).await;

    let (status, body) = action(
        &self::client(),
        &[
            ("action", "register"),
            ("name", "Someone Else"),
            ("email", &email),
            ("password", "another-pass-99"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

// ============================================================================
// Cart & Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_cart_and_checkout() {
    let pool = database().await;
    let product_id = insert_product(&pool, "IT Comfort Height", "60.00").await;
    let product_id = product_id.to_string();

    let client = client();
    register(&client).await;

    let (status, body) = action(&client, &[("action", "place_order")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Your cart is empty");

    let (_, body) = action(
        &client,
        &[
            ("action", "add_to_cart"),
            ("product_id", &product_id),
            ("quantity", "1"),
        ],
    )
    .await;
    assert_eq!(body["success"], true, "{body}");
    assert_eq!(body["cart_count"], 1);

    let (_, body) = action(
        &client,
        &[
            ("action", "update_cart"),
            ("product_id", &product_id),
            ("quantity", "2"),
        ],
    )
    .await;
    assert_eq!(body["cart_count"], 2);

    let (status, body) = action(&client, &[("action", "place_order")]).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["cart_count"], 0);
    let order_number = body["order_number"]
        .as_str()
        .expect("order_number present")
        .to_string();
    assert!(order_number.starts_with("TP"));

    let (status, body) = action(
        &client,
        &[
            ("action", "update_cart"),
            ("product_id", &product_id),
            ("quantity", "0"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["cart_count"], 0);

    // 2 x 60.00 = 120.00, free shipping, 8% tax
    let (total, status): (String, String) = sqlx::query_as(
        "SELECT total::text, status FROM orders WHERE order_number = $1",
    )
    .bind(&order_number)
    .fetch_one(&pool)
    .await
    .expect("Order row exists");
    assert_eq!(total, "129.60");
    assert_eq!(status, OrderStatus::Pending.as_str());

    let page = client
        .get(format!(
            "{}/?page=order-confirmation&order={order_number}",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to get confirmation");
    assert_eq!(page.status(), StatusCode::OK);
    let page = page.text().await.expect("body");
    assert!(page.contains(&order_number));
    assert!(page.contains("$129.60"));

    let stranger = self::client()
        .get(format!(
            "{}/?page=order-confirmation&order={order_number}",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to get confirmation")
        .text()
        .await
        .expect("body");
    assert!(stranger.contains(&order_number));
    assert!(!stranger.contains("$129.60"));
}

// ============================================================================
// Search & Forum
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_search_products() {
    let pool = database().await;
    let marker = format!("IT-Search-{}", Uuid::new_v4().simple());
    insert_product(&pool, &marker, "199.00").await;

    let (status, body) = action(
        &client(),
        &[("action", "search_products"), ("search_term", &marker)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "1 products found");
    assert_eq!(body["results"][0]["name"], marker.as_str());
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_forum_topic_and_reply() {
    let client = client();
    register(&client).await;

    let title = format!("IT topic {}", Uuid::new_v4().simple());
    let (_, body) = action(
        &client,
        &[
            ("action", "create_forum_topic"),
            ("title", &title),
            ("content", "Does anyone descale their tank?"),
            ("category", "Maintenance"),
        ],
    )
    .await;
    assert_eq!(body["message"], "Topic created successfully");

    let listing = client
        .get(format!("{}/?page=forum", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get forum")
        .text()
        .await
        .expect("body");
    assert!(listing.contains(&title));

    let (status, body) = action(
        &client,
        &[
            ("action", "add_forum_reply"),
            ("topic_id", "does-not-exist"),
            ("content", "Hello"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Topic not found");
}
