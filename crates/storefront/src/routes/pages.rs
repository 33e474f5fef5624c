//! `GET /` page renderer.
//!
//! The `page` query parameter selects one template. Every template extends
//! `base.html` and carries a [`Layout`] with the navigation state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::content::{self, Contact, Job, ShippingOption};
use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalUser, is_admin};
use crate::models::{Cart, CurrentUser, ForumTopic, OrderRecord, Preferences, Product};
use crate::services::OrderTotals;
use crate::state::AppState;
use crate::store::CatalogStats;

use super::{load_cart, load_preferences};

const SITE_TITLE: &str = "ToiletPro - Premium Toilets & Accessories";

/// Query parameters of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    /// Forum topic id for `page=forum-topic`.
    pub id: Option<String>,
    /// Order number for `page=order-confirmation`.
    pub order: Option<String>,
}

/// A page selectable through `?page=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Products,
    Cart,
    OrderConfirmation,
    ContactList,
    LearnMore,
    ShippingInfo,
    ContactUs,
    Support,
    Forum,
    ForumTopic,
    Careers,
    Admin,
}

impl Page {
    /// Resolve the `page` parameter. A missing or blank value is the home
    /// page; an unknown value is `None`.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        let page = match param.map(str::trim).unwrap_or_default() {
            "" | "home" => Self::Home,
            "products" => Self::Products,
            "cart" => Self::Cart,
            "order-confirmation" => Self::OrderConfirmation,
            "contact-list" => Self::ContactList,
            "learn-more" => Self::LearnMore,
            "shipping-info" => Self::ShippingInfo,
            "contact-us" => Self::ContactUs,
            "support" => Self::Support,
            "forum" => Self::Forum,
            "forum-topic" => Self::ForumTopic,
            "careers" => Self::Careers,
            "admin" => Self::Admin,
            _ => return None,
        };
        Some(page)
    }

    /// The `page` parameter value.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Products => "products",
            Self::Cart => "cart",
            Self::OrderConfirmation => "order-confirmation",
            Self::ContactList => "contact-list",
            Self::LearnMore => "learn-more",
            Self::ShippingInfo => "shipping-info",
            Self::ContactUs => "contact-us",
            Self::Support => "support",
            Self::Forum => "forum",
            Self::ForumTopic => "forum-topic",
            Self::Careers => "careers",
            Self::Admin => "admin",
        }
    }

    /// Document title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home | Self::Cart | Self::OrderConfirmation => SITE_TITLE,
            Self::Products => "Products - ToiletPro",
            Self::ContactList => "Contact List - ToiletPro",
            Self::LearnMore => "Learn More - ToiletPro",
            Self::ShippingInfo => "Shipping Information - ToiletPro",
            Self::ContactUs => "Contact Us - ToiletPro",
            Self::Support => "Customer Support - ToiletPro",
            Self::Forum | Self::ForumTopic => "Forum - ToiletPro",
            Self::Careers => "Careers - ToiletPro",
            Self::Admin => "Admin Dashboard - ToiletPro",
        }
    }
}

/// State shared by every page: navigation, header and body classes.
pub struct Layout {
    pub title: String,
    /// Slug of the active page, empty for error pages.
    pub active: &'static str,
    pub user: Option<CurrentUser>,
    pub cart_count: i64,
    pub preferences: Preferences,
    pub is_admin: bool,
}

impl Layout {
    /// Build the layout from the session. Unreadable session values fall back
    /// to a guest view with defaults.
    async fn load(session: &Session, user: Option<CurrentUser>, page: Option<Page>) -> Self {
        let cart_count = load_cart(session).await.map_or(0, |cart| cart.count());
        let preferences = load_preferences(session).await.unwrap_or_default();

        Self {
            title: page.map_or(SITE_TITLE, Page::title).to_string(),
            active: page.map_or("", Page::slug),
            user,
            cart_count,
            preferences,
            is_admin: is_admin(session).await,
        }
    }

    fn is_active(&self, slug: &str) -> bool {
        self.active == slug
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/products.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/cart.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub cart: Cart,
    pub totals: OrderTotals,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/order_confirmation.html")]
pub struct OrderConfirmationTemplate {
    pub layout: Layout,
    pub order_number: String,
    /// Archived summary, shown only to the customer who placed the order.
    pub order: Option<OrderRecord>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/contact_list.html")]
pub struct ContactListTemplate {
    pub layout: Layout,
    pub contacts: &'static [Contact],
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/learn_more.html")]
pub struct LearnMoreTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/shipping_info.html")]
pub struct ShippingInfoTemplate {
    pub layout: Layout,
    pub options: &'static [ShippingOption],
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/contact_us.html")]
pub struct ContactUsTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/support.html")]
pub struct SupportTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/forum.html")]
pub struct ForumTemplate {
    pub layout: Layout,
    pub topics: Vec<ForumTopic>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/forum_topic.html")]
pub struct ForumTopicTemplate {
    pub layout: Layout,
    pub topic: ForumTopic,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/topic_not_found.html")]
pub struct TopicNotFoundTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/careers.html")]
pub struct CareersTemplate {
    pub layout: Layout,
    pub jobs: &'static [Job],
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/admin.html")]
pub struct AdminTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
    /// Present only for a logged-in admin.
    pub stats: Option<CatalogStats>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}

// =============================================================================
// Handler
// =============================================================================

/// Render the page selected by `?page=`.
#[instrument(skip(state, session, user))]
pub async fn render(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = Page::from_param(query.page.as_deref());
    let layout = Layout::load(&session, user.clone(), page).await;

    let Some(page) = page else {
        return (StatusCode::NOT_FOUND, NotFoundTemplate { layout }).into_response();
    };

    // Page loaders consume the layout, so error pages rebuild it.
    match render_page(&state, &session, layout, page, query).await {
        Ok(response) => response,
        Err(err) => {
            err.report();
            let mut layout = Layout::load(&session, user, None).await;
            layout.title = "Error - ToiletPro".to_string();
            let status = err.status();
            (
                status,
                ErrorTemplate {
                    layout,
                    status: status.as_u16(),
                    message: err.public_message(),
                },
            )
                .into_response()
        }
    }
}

/// The archived copy of `order_number` if it belongs to `user`. An unreadable
/// archive only costs the summary.
async fn archived_order(
    state: &AppState,
    user: &CurrentUser,
    order_number: &str,
) -> Option<OrderRecord> {
    match state.orders().find(order_number).await {
        Ok(order) => order.filter(|order| order.user_id == user.id),
        Err(e) => {
            tracing::warn!(order_number, error = %e, "Failed to read order archive");
            None
        }
    }
}

async fn render_page(
    state: &AppState,
    session: &Session,
    mut layout: Layout,
    page: Page,
    query: PageQuery,
) -> Result<Response, AppError> {
    let response = match page {
        Page::Home => HomeTemplate { layout }.into_response(),
        Page::Products => {
            let products = ProductRepository::new(state.pool()).list_all().await?;
            ProductsTemplate { layout, products }.into_response()
        }
        Page::Cart => {
            let cart = load_cart(session).await?;
            let totals = OrderTotals::for_cart(&cart);
            CartTemplate {
                layout,
                cart,
                totals,
            }
            .into_response()
        }
        Page::OrderConfirmation => {
            let order_number = query
                .order
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            let order = match &layout.user {
                Some(user) => archived_order(state, user, &order_number).await,
                None => None,
            };
            OrderConfirmationTemplate {
                layout,
                order_number,
                order,
            }
            .into_response()
        }
        Page::ContactList => ContactListTemplate {
            layout,
            contacts: content::CONTACTS,
        }
        .into_response(),
        Page::LearnMore => LearnMoreTemplate { layout }.into_response(),
        Page::ShippingInfo => ShippingInfoTemplate {
            layout,
            options: content::SHIPPING_OPTIONS,
        }
        .into_response(),
        Page::ContactUs => ContactUsTemplate { layout }.into_response(),
        Page::Support => SupportTemplate { layout }.into_response(),
        Page::Forum => {
            let topics = state.forum().list_recent().await?;
            ForumTemplate { layout, topics }.into_response()
        }
        Page::ForumTopic => {
            let topic = match query.id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => state.forum().get(id).await?,
                _ => None,
            };
            match topic {
                Some(topic) => {
                    layout.title = format!("{} - ToiletPro Forum", topic.title);
                    ForumTopicTemplate { layout, topic }.into_response()
                }
                None => (StatusCode::NOT_FOUND, TopicNotFoundTemplate { layout }).into_response(),
            }
        }
        Page::Careers => CareersTemplate {
            layout,
            jobs: content::JOBS,
        }
        .into_response(),
        Page::Admin => {
            let (products, stats) = if layout.is_admin {
                let (products, stats) = state.catalog().dashboard().await?;
                (products, Some(stats))
            } else {
                (Vec::new(), None)
            };
            AdminTemplate {
                layout,
                products,
                stats,
            }
            .into_response()
        }
    };

    Ok(response)
}
