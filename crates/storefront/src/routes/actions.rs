//! `POST /` action dispatcher.
//!
//! Every mutation goes through one endpoint. The `action` form field selects
//! the operation and the remaining fields are its arguments. Each action
//! answers with the JSON envelope `{"success": bool, "message": ...}` plus
//! optional action-specific fields.

use std::str::FromStr;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{Span, instrument};

use toiletpro_core::{Price, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{require_admin, require_user, set_admin, set_current_user};
use crate::models::{
    AdminSession, CurrentUser, FontSize, Product, ProductDraft, Theme, forum, product,
    session_keys,
};
use crate::services::{AuthService, CheckoutService};
use crate::state::AppState;
use crate::store::NewTopic;

use super::{load_cart, load_preferences};

const INVALID_REQUEST: &str = "Invalid request";
const MISSING_FIELDS: &str = "Please fill all required fields";

// =============================================================================
// Request
// =============================================================================

/// Raw `POST /` form. Which fields matter depends on `action`.
#[derive(Default, Deserialize)]
pub struct ActionForm {
    pub action: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub badge: Option<String>,
    pub stock: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub topic_id: Option<String>,
    pub font_size: Option<String>,
    pub theme: Option<String>,
    pub search_term: Option<String>,
}

/// A parsed action with its arguments.
#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        name: String,
        email: String,
        password: SecretString,
    },
    Logout,
    AddToCart {
        product_id: ProductId,
        quantity: i32,
    },
    UpdateCart {
        product_id: ProductId,
        quantity: i32,
    },
    RemoveFromCart {
        product_id: ProductId,
    },
    PlaceOrder,
    CreateForumTopic {
        title: String,
        content: String,
        category: String,
    },
    AddForumReply {
        topic_id: String,
        content: String,
    },
    AdminLogin {
        username: String,
        password: SecretString,
    },
    AdminLogout,
    AdminAddProduct(ProductDraft),
    AdminUpdateProduct {
        id: i32,
        draft: ProductDraft,
    },
    AdminDeleteProduct {
        id: i32,
    },
    UpdatePreferences {
        font_size: Option<String>,
        theme: Option<String>,
    },
    SearchProducts {
        search_term: String,
    },
}

impl Action {
    /// The `action` field value this variant was parsed from.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::AddToCart { .. } => "add_to_cart",
            Self::UpdateCart { .. } => "update_cart",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::PlaceOrder => "place_order",
            Self::CreateForumTopic { .. } => "create_forum_topic",
            Self::AddForumReply { .. } => "add_forum_reply",
            Self::AdminLogin { .. } => "admin_login",
            Self::AdminLogout => "admin_logout",
            Self::AdminAddProduct(_) => "admin_add_product",
            Self::AdminUpdateProduct { .. } => "admin_update_product",
            Self::AdminDeleteProduct { .. } => "admin_delete_product",
            Self::UpdatePreferences { .. } => "update_preferences",
            Self::SearchProducts { .. } => "search_products",
        }
    }
}

impl TryFrom<ActionForm> for Action {
    type Error = AppError;

    fn try_from(form: ActionForm) -> Result<Self> {
        let action = form.action.as_deref().map(str::trim).unwrap_or_default();

        let parsed = match action {
            "login" => Self::Login {
                email: form.email.unwrap_or_default(),
                password: secret(form.password),
            },
            "register" => Self::Register {
                name: form.name.unwrap_or_default(),
                email: form.email.unwrap_or_default(),
                password: secret(form.password),
            },
            "logout" => Self::Logout,
            "add_to_cart" => Self::AddToCart {
                product_id: required_id(form.product_id.as_deref())?,
                quantity: match form.quantity.as_deref() {
                    Some(q) if !q.trim().is_empty() => parse_int(q)?,
                    _ => 1,
                },
            },
            "update_cart" => Self::UpdateCart {
                product_id: required_id(form.product_id.as_deref())?,
                quantity: parse_int(form.quantity.as_deref().unwrap_or_default())?,
            },
            "remove_from_cart" => Self::RemoveFromCart {
                product_id: required_id(form.product_id.as_deref())?,
            },
            "place_order" => Self::PlaceOrder,
            "create_forum_topic" => Self::CreateForumTopic {
                title: form.title.unwrap_or_default(),
                content: form.content.unwrap_or_default(),
                category: non_blank_or(form.category, forum::DEFAULT_CATEGORY),
            },
            "add_forum_reply" => Self::AddForumReply {
                topic_id: form.topic_id.unwrap_or_default(),
                content: form.content.unwrap_or_default(),
            },
            "admin_login" => Self::AdminLogin {
                username: form.username.unwrap_or_default(),
                password: secret(form.password),
            },
            "admin_logout" => Self::AdminLogout,
            "admin_add_product" => Self::AdminAddProduct(product_draft(form)),
            "admin_update_product" => Self::AdminUpdateProduct {
                id: lenient_int(form.id.as_deref()),
                draft: product_draft(form),
            },
            "admin_delete_product" => Self::AdminDeleteProduct {
                id: lenient_int(form.id.as_deref()),
            },
            "update_preferences" => Self::UpdatePreferences {
                font_size: form.font_size,
                theme: form.theme,
            },
            "search_products" => Self::SearchProducts {
                search_term: form.search_term.unwrap_or_default(),
            },
            _ => return Err(invalid_request()),
        };

        Ok(parsed)
    }
}

fn invalid_request() -> AppError {
    AppError::BadRequest(INVALID_REQUEST.to_string())
}

fn secret(value: Option<String>) -> SecretString {
    SecretString::from(value.unwrap_or_default())
}

fn parse_int(value: &str) -> Result<i32> {
    value.trim().parse().map_err(|_| invalid_request())
}

fn required_id(value: Option<&str>) -> Result<ProductId> {
    value
        .map(parse_int)
        .transpose()?
        .map(ProductId::new)
        .ok_or_else(invalid_request)
}

/// Integer form field where anything unparsable reads as 0.
fn lenient_int(value: Option<&str>) -> i32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Admin product form. An unparsable price reads as 0 and so fails the
/// completeness check; an unparsable stock reads as 0.
fn product_draft(form: ActionForm) -> ProductDraft {
    let price = form
        .price
        .as_deref()
        .and_then(|p| Decimal::from_str(p.trim()).ok())
        .map_or(Price::ZERO, |amount| Price::new(amount).round_cents());

    ProductDraft {
        name: form.name.unwrap_or_default().trim().to_string(),
        description: form.description.unwrap_or_default().trim().to_string(),
        price,
        category: non_blank_or(form.category, product::DEFAULT_CATEGORY),
        image: form.image.unwrap_or_default().trim().to_string(),
        badge: form.badge.unwrap_or_default().trim().to_string(),
        stock: lenient_int(form.stock.as_deref()),
    }
}

// =============================================================================
// Response
// =============================================================================

/// Successful action envelope.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<i64>,
}

impl ActionResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            order_number: None,
            product_id: None,
            results: None,
            cart_count: None,
        }
    }

    #[must_use]
    pub const fn with_cart_count(mut self, count: i64) -> Self {
        self.cart_count = Some(count);
        self
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Parse the form and run the selected action.
///
/// # Errors
///
/// Returns 400 `Invalid request` for a missing, unknown or malformed action,
/// otherwise whatever the action itself fails with.
#[instrument(skip_all, fields(action = tracing::field::Empty))]
pub async fn dispatch(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<ActionForm>, FormRejection>,
) -> Result<ActionResponse> {
    let Form(form) = form.map_err(|_| invalid_request())?;
    let action = Action::try_from(form)?;
    Span::current().record("action", action.name());

    match action {
        Action::Login { email, password } => login(&state, &session, &email, &password).await,
        Action::Register {
            name,
            email,
            password,
        } => register(&state, &session, &name, &email, &password).await,
        Action::Logout => logout(&session).await,
        Action::AddToCart {
            product_id,
            quantity,
        } => add_to_cart(&state, &session, product_id, quantity).await,
        Action::UpdateCart {
            product_id,
            quantity,
        } => update_cart(&session, product_id, quantity).await,
        Action::RemoveFromCart { product_id } => remove_from_cart(&session, product_id).await,
        Action::PlaceOrder => place_order(&state, &session).await,
        Action::CreateForumTopic {
            title,
            content,
            category,
        } => create_forum_topic(&state, &session, title, content, category).await,
        Action::AddForumReply { topic_id, content } => {
            add_forum_reply(&state, &session, &topic_id, content).await
        }
        Action::AdminLogin { username, password } => {
            admin_login(&state, &session, username, &password).await
        }
        Action::AdminLogout => admin_logout(&session).await,
        Action::AdminAddProduct(draft) => admin_add_product(&state, &session, draft).await,
        Action::AdminUpdateProduct { id, draft } => {
            admin_update_product(&state, &session, id, draft).await
        }
        Action::AdminDeleteProduct { id } => admin_delete_product(&state, &session, id).await,
        Action::UpdatePreferences { font_size, theme } => {
            update_preferences(&session, font_size.as_deref(), theme.as_deref()).await
        }
        Action::SearchProducts { search_term } => search_products(&state, &search_term).await,
    }
}

// =============================================================================
// Customer Accounts
// =============================================================================

async fn login(
    state: &AppState,
    session: &Session,
    email: &str,
    password: &SecretString,
) -> Result<ActionResponse> {
    let user = AuthService::new(state.pool())
        .login(email, password.expose_secret())
        .await?;
    let current = CurrentUser::from(&user);

    session.cycle_id().await?;
    set_current_user(session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    add_breadcrumb("auth", "Logged in", None);

    Ok(ActionResponse::ok("Login successful"))
}

async fn register(
    state: &AppState,
    session: &Session,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<ActionResponse> {
    let user = AuthService::new(state.pool())
        .register(name, email, password.expose_secret())
        .await?;
    let current = CurrentUser::from(&user);

    session.cycle_id().await?;
    set_current_user(session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    add_breadcrumb("auth", "Registered", None);

    Ok(ActionResponse::ok("Registration successful"))
}

async fn logout(session: &Session) -> Result<ActionResponse> {
    session.flush().await?;
    clear_sentry_user();

    Ok(ActionResponse::ok("Logged out successfully"))
}

// =============================================================================
// Cart & Checkout
// =============================================================================

async fn add_to_cart(
    state: &AppState,
    session: &Session,
    product_id: ProductId,
    quantity: i32,
) -> Result<ActionResponse> {
    require_user(session).await?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let mut cart = load_cart(session).await?;
    cart.add(&product, quantity)?;
    session.insert(session_keys::CART, &cart).await?;

    let id = product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    Ok(ActionResponse::ok("Product added to cart").with_cart_count(cart.count()))
}

async fn update_cart(
    session: &Session,
    product_id: ProductId,
    quantity: i32,
) -> Result<ActionResponse> {
    require_user(session).await?;

    let mut cart = load_cart(session).await?;
    cart.set_quantity(product_id, quantity)?;
    session.insert(session_keys::CART, &cart).await?;

    Ok(ActionResponse::ok("Cart updated").with_cart_count(cart.count()))
}

async fn remove_from_cart(session: &Session, product_id: ProductId) -> Result<ActionResponse> {
    require_user(session).await?;

    let mut cart = load_cart(session).await?;
    if cart.remove(product_id) {
        session.insert(session_keys::CART, &cart).await?;
    }

    Ok(ActionResponse::ok("Item removed from cart").with_cart_count(cart.count()))
}

async fn place_order(state: &AppState, session: &Session) -> Result<ActionResponse> {
    let user = require_user(session).await?;
    let cart = load_cart(session).await?;

    let placed = CheckoutService::new(state.pool(), state.orders())
        .place_order(&user, &cart)
        .await?;

    session.remove_value(session_keys::CART).await?;
    let total = placed.totals.total.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[
            ("order_number", placed.order_number.as_str()),
            ("total", total.as_str()),
        ]),
    );

    let mut response = ActionResponse::ok(format!(
        "Order placed successfully! Your order number is: {}",
        placed.order_number
    ))
    .with_cart_count(0);
    response.order_number = Some(placed.order_number);
    Ok(response)
}

// =============================================================================
// Forum
// =============================================================================

async fn create_forum_topic(
    state: &AppState,
    session: &Session,
    title: String,
    content: String,
    category: String,
) -> Result<ActionResponse> {
    let user = require_user(session).await?;

    let title = title.trim().to_string();
    let content = content.trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    }

    state
        .forum()
        .create_topic(NewTopic {
            user_id: user.id,
            user_name: user.name,
            title,
            content,
            category,
        })
        .await?;

    Ok(ActionResponse::ok("Topic created successfully"))
}

async fn add_forum_reply(
    state: &AppState,
    session: &Session,
    topic_id: &str,
    content: String,
) -> Result<ActionResponse> {
    let user = require_user(session).await?;

    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    }

    state
        .forum()
        .add_reply(topic_id.trim(), user.id, user.name, content)
        .await?
        .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

    Ok(ActionResponse::ok("Reply added successfully"))
}

// =============================================================================
// Admin Console
// =============================================================================

async fn admin_login(
    state: &AppState,
    session: &Session,
    username: String,
    password: &SecretString,
) -> Result<ActionResponse> {
    if !state
        .config()
        .admin
        .matches(&username, password.expose_secret())
    {
        tracing::warn!("Rejected admin login");
        return Err(AppError::Unauthorized(
            "Invalid admin credentials".to_string(),
        ));
    }

    session.cycle_id().await?;
    set_admin(session, &AdminSession { username }).await?;
    add_breadcrumb("admin", "Admin logged in", None);

    Ok(ActionResponse::ok("Admin login successful"))
}

async fn admin_logout(session: &Session) -> Result<ActionResponse> {
    session.flush().await?;
    clear_sentry_user();

    Ok(ActionResponse::ok("Admin logged out successfully"))
}

/// Reject drafts with missing fields or a price the catalog cannot hold.
fn check_draft(draft: &ProductDraft) -> Result<()> {
    if !draft.is_complete() {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    }
    if !draft.price_in_range() {
        return Err(AppError::BadRequest(format!(
            "Price cannot exceed {}",
            Price::MAX
        )));
    }
    Ok(())
}

async fn admin_add_product(
    state: &AppState,
    session: &Session,
    draft: ProductDraft,
) -> Result<ActionResponse> {
    require_admin(session).await?;
    check_draft(&draft)?;

    let id = state.catalog().add(draft).await?;
    tracing::info!(product_id = %id, "Admin added product");

    let mut response = ActionResponse::ok("Product added successfully");
    response.product_id = Some(id);
    Ok(response)
}

async fn admin_update_product(
    state: &AppState,
    session: &Session,
    id: i32,
    draft: ProductDraft,
) -> Result<ActionResponse> {
    require_admin(session).await?;
    let id = admin_product_id(id)?;
    check_draft(&draft)?;

    if !state.catalog().update(id, draft).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    tracing::info!(product_id = %id, "Admin updated product");

    Ok(ActionResponse::ok("Product updated successfully"))
}

async fn admin_delete_product(
    state: &AppState,
    session: &Session,
    id: i32,
) -> Result<ActionResponse> {
    require_admin(session).await?;
    let id = admin_product_id(id)?;

    if !state.catalog().delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    tracing::info!(product_id = %id, "Admin deleted product");

    Ok(ActionResponse::ok("Product deleted successfully"))
}

fn admin_product_id(id: i32) -> Result<ProductId> {
    let id = ProductId::new(id);
    if id.is_valid() {
        Ok(id)
    } else {
        Err(AppError::BadRequest("Invalid product ID".to_string()))
    }
}

// =============================================================================
// Preferences & Search
// =============================================================================

async fn update_preferences(
    session: &Session,
    font_size: Option<&str>,
    theme: Option<&str>,
) -> Result<ActionResponse> {
    let invalid = |_| AppError::BadRequest("Invalid preference value".to_string());

    let mut preferences = load_preferences(session).await?;
    if let Some(size) = font_size.map(str::trim).filter(|s| !s.is_empty()) {
        preferences.font_size = FontSize::from_str(size).map_err(invalid)?;
    }
    if let Some(theme) = theme.map(str::trim).filter(|s| !s.is_empty()) {
        preferences.theme = Theme::from_str(theme).map_err(invalid)?;
    }
    session
        .insert(session_keys::PREFERENCES, &preferences)
        .await?;

    Ok(ActionResponse::ok("Preferences updated"))
}

async fn search_products(state: &AppState, search_term: &str) -> Result<ActionResponse> {
    let results = ProductRepository::new(state.pool())
        .search(search_term.trim())
        .await?;

    let mut response = ActionResponse::ok(format!("{} products found", results.len()));
    response.results = Some(results);
    Ok(response)
}
