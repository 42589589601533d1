//! Storefront routes.
//!
//! Every handler receives the request and an `Arc<Shop>`. Catalog-backed
//! handlers reload the catalog file on each call; cart mutations go through
//! [`CartStore`], which persists after every change.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`home`] |
//! | GET | `/categories/{id}?min=&max=` | [`category`] |
//! | GET | `/products/{id}` | [`product`] |
//! | GET | `/add-to-cart/{id}?from=` | [`add_to_cart`] |
//! | GET | `/remove/{id}` | [`remove_from_cart`] |
//! | GET | `/cart` | [`view_cart`] |
//! | GET | `/checkout` | [`checkout`] |
//! | GET | `/confirm-order` | [`confirm_order`] |
//! | GET | `/order-confirmation?orderId=` | [`order_confirmation`] |
//! | GET | `/login`, `/signup`, `/about`, `/terms` | static views |
//! | GET | `/healthz`, `/readyz` | [`health`](crate::health) |
//! | GET | anything else | static assets |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use serde_json::{Value, json};
use tracing::info;

use crate::assets;
use crate::cart::{Cart, CartStore};
use crate::catalog::{self, Catalog};
use crate::config::Config;
use crate::error::Error;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;
use crate::views::{Pages, Render, View};

/// Lowest order number handed out by `/confirm-order`.
pub const ORDER_ID_MIN: u32 = 10_000;
/// Highest order number handed out by `/confirm-order`.
pub const ORDER_ID_MAX: u32 = 99_999;

const DEFAULT_REDIRECT: &str = "/cart";

/// Everything the handlers share: where the catalog lives, the cart, the
/// renderer, and the static asset root.
pub struct Shop {
    catalog_path: PathBuf,
    assets_dir: PathBuf,
    cart: CartStore,
    views: Arc<dyn Render>,
}

impl Shop {
    pub fn new(
        catalog_path: impl Into<PathBuf>,
        assets_dir: impl Into<PathBuf>,
        cart: CartStore,
        views: Arc<dyn Render>,
    ) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            assets_dir: assets_dir.into(),
            cart,
            views,
        }
    }

    /// Builds the shop described by `config` with the built-in HTML pages,
    /// priming the cart from its file.
    pub async fn open(config: &Config) -> Self {
        let cart = CartStore::open(&config.cart_path).await;
        let items = cart.snapshot().await.items().len();
        info!(
            catalog = %config.catalog_path.display(),
            cart = %config.cart_path.display(),
            items,
            "shop opened",
        );
        Self::new(&config.catalog_path, &config.assets_dir, cart, Arc::new(Pages))
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Fresh read of the catalog file.
    pub async fn catalog(&self) -> Catalog {
        Catalog::load(&self.catalog_path).await
    }

    /// Renders `view` with `context` plus the layout's `cartCount`.
    async fn render(&self, view: View, mut context: Value) -> Result<Response, Error> {
        let units = self.cart.snapshot().await.units();
        if let Value::Object(map) = &mut context {
            map.insert("cartCount".into(), units.into());
        }
        let html = self.views.render(view, &context)?;
        Ok(Response::html(html))
    }
}

/// The storefront's routing table over a shared shop.
pub fn router(shop: Arc<Shop>) -> Router<Arc<Shop>> {
    Router::with_state(shop)
        .get("/", home)
        .get("/categories/{id}", category)
        .get("/products/{id}", product)
        .get("/add-to-cart/{id}", add_to_cart)
        .get("/remove/{id}", remove_from_cart)
        .get("/cart", view_cart)
        .get("/checkout", checkout)
        .get("/confirm-order", confirm_order)
        .get("/order-confirmation", order_confirmation)
        .get("/login", login)
        .get("/signup", signup)
        .get("/about", about)
        .get("/terms", terms)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .fallback(static_asset)
}

// ── Catalog pages ────────────────────────────────────────────────────────────

/// `GET /` — every category.
pub async fn home(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let catalog = shop.catalog().await;
    shop.render(View::Index, json!({ "categories": catalog.categories() })).await
}

/// `GET /categories/{id}?min=&max=` — one category, products filtered by
/// inclusive price bounds. The raw bounds are echoed back to the page.
pub async fn category(req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let catalog = shop.catalog().await;
    let found = id_param(&req).and_then(|id| catalog::find_category(catalog.categories(), id));
    let Some(category) = found else {
        return Ok(not_found("category not found"));
    };

    let min = req.query("min").and_then(catalog::parse_number);
    let max = req.query("max").and_then(catalog::parse_number);
    let products = catalog::filter_by_price(&category.products, min, max);

    shop.render(View::Category, json!({
        "category": category,
        "products": products,
        "min": req.query("min"),
        "max": req.query("max"),
    })).await
}

/// `GET /products/{id}` — one product and the name of its category.
pub async fn product(req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let catalog = shop.catalog().await;
    let found = id_param(&req).and_then(|id| catalog::find_product(catalog.categories(), id));
    let Some((product, category_name)) = found else {
        return Ok(not_found("product not found"));
    };
    shop.render(View::Product, json!({
        "product": product,
        "categoryName": category_name,
    })).await
}

// ── Cart ─────────────────────────────────────────────────────────────────────

/// `GET /add-to-cart/{id}?from=` — adds one unit, then redirects back to
/// `from` (default `/cart`). Unknown ids still redirect.
pub async fn add_to_cart(req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    if let Some(id) = id_param(&req) {
        let catalog = shop.catalog().await;
        shop.cart.add_item(id, &catalog).await?;
    }
    Ok(Response::redirect(redirect_target(req.query("from"))))
}

/// `GET /remove/{id}` — drops the item, then redirects to `/cart`.
pub async fn remove_from_cart(req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    if let Some(id) = id_param(&req) {
        shop.cart.remove_item(id).await?;
    }
    Ok(Response::redirect(DEFAULT_REDIRECT))
}

/// `GET /cart`
pub async fn view_cart(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let cart = shop.cart.snapshot().await;
    shop.render(View::Cart, cart_context(&cart)).await
}

/// `GET /checkout`
pub async fn checkout(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let cart = shop.cart.snapshot().await;
    shop.render(View::Checkout, cart_context(&cart)).await
}

/// `GET /confirm-order` — issues an order number, empties the cart, and
/// redirects to the confirmation page.
pub async fn confirm_order(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    let order_id = new_order_id();
    let cart = shop.cart.snapshot().await;
    shop.cart.clear().await?;
    info!(order_id, items = cart.items().len(), total = cart.total(), "order confirmed");
    Ok(Response::redirect(&format!("/order-confirmation?orderId={order_id}")))
}

/// `GET /order-confirmation?orderId=` — echoes the id as given.
pub async fn order_confirmation(req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    shop.render(View::OrderConfirmation, json!({ "orderId": req.query("orderId") })).await
}

// ── Static views ─────────────────────────────────────────────────────────────

async fn login(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    shop.render(View::Login, json!({})).await
}

async fn signup(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    shop.render(View::Signup, json!({})).await
}

async fn about(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    shop.render(View::About, json!({})).await
}

async fn terms(_req: Request, shop: Arc<Shop>) -> Result<Response, Error> {
    shop.render(View::Terms, json!({})).await
}

async fn static_asset(req: Request, shop: Arc<Shop>) -> Response {
    match req.method() {
        Method::Get | Method::Head => assets::serve(&shop.assets_dir, req.path()).await,
        _ => Response::status(Status::NotFound),
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A uniformly random order number in `ORDER_ID_MIN..=ORDER_ID_MAX`.
pub fn new_order_id() -> u32 {
    rand::thread_rng().gen_range(ORDER_ID_MIN..=ORDER_ID_MAX)
}

fn id_param(req: &Request) -> Option<i64> {
    req.param("id").and_then(catalog::parse_id)
}

fn cart_context(cart: &Cart) -> Value {
    json!({ "items": cart.items(), "total": cart.total() })
}

fn not_found(message: &'static str) -> Response {
    Response::builder().status(Status::NotFound).text(message)
}

/// Only same-site absolute paths are honoured; anything else (missing,
/// empty, `//host`, `/\host`, `https://…`) goes to the cart. Browsers read
/// `\` as `/`, so no backslash is allowed anywhere.
fn redirect_target(from: Option<&str>) -> &str {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => DEFAULT_REDIRECT,
    }
}
