use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use storefront::{
    CartStore, Config, Error, Method, Render, Request, Response, Router, Shop, View, shop,
};
use tempfile::TempDir;

const CATALOG: &str = r#"[
    { "id": 1, "name": "Drinks", "products": [
        { "id": 10, "name": "Cola",  "price": 2.5 },
        { "id": 11, "name": "Juice", "price": 4, "image": "/img/juice.png" }
    ]},
    { "id": 2, "name": "Snacks", "products": [
        { "id": 20, "name": "Chips",   "price": 1.5 },
        { "id": 21, "name": "Nuts",    "price": 3 },
        { "id": 22, "name": "Truffle", "price": 12 }
    ]}
]"#;

/// Renders the view name and context as JSON so tests can inspect exactly
/// what a handler passed to the page.
struct Contexts;

impl Render for Contexts {
    fn render(&self, view: View, context: &Value) -> Result<String, Error> {
        Ok(json!({ "view": view.name(), "context": context }).to_string())
    }
}

struct Fixture {
    dir: TempDir,
    router: Router<Arc<Shop>>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("categories.json"), CATALOG).unwrap();
        let router = router_at(dir.path());
        Self { dir, router }
    }

    fn cart_path(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }

    async fn get(&self, target: &str) -> Response {
        self.router.handle(Request::get(target)).await
    }

    /// Follows a GET that must render a page and returns its context.
    async fn page(&self, target: &str) -> (String, Value) {
        let response = self.get(target).await;
        assert_eq!(response.code(), 200, "GET {target}");
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        (body["view"].as_str().unwrap().to_owned(), body["context"].clone())
    }

    async fn cart(&self) -> Value {
        let (view, context) = self.page("/cart").await;
        assert_eq!(view, "cart");
        context
    }
}

fn router_at(dir: &Path) -> Router<Arc<Shop>> {
    let shop = Shop::new(
        dir.join("categories.json"),
        dir.join("assets"),
        CartStore::new(dir.join("cart.json")),
        Arc::new(Contexts),
    );
    shop::router(Arc::new(shop))
}

fn quantities(cart: &Value) -> Vec<(i64, u64)> {
    cart["items"].as_array().unwrap().iter()
        .map(|i| (i["id"].as_i64().unwrap(), i["quantity"].as_u64().unwrap()))
        .collect()
}

fn product_ids(context: &Value) -> Vec<i64> {
    context["products"].as_array().unwrap().iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

// ── Catalog pages ────────────────────────────────────────────────────────────

#[tokio::test]
async fn home_lists_every_category() {
    let fx = Fixture::new();
    let (view, context) = fx.page("/").await;
    assert_eq!(view, "index");
    assert_eq!(context["categories"].as_array().unwrap().len(), 2);
    assert_eq!(context["cartCount"], 0);
}

#[tokio::test]
async fn home_renders_with_a_missing_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_at(dir.path());
    let response = router.handle(Request::get("/")).await;
    assert_eq!(response.code(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["context"]["categories"], json!([]));
}

#[tokio::test]
async fn category_filters_by_inclusive_price_bounds() {
    let fx = Fixture::new();

    let (view, context) = fx.page("/categories/2").await;
    assert_eq!(view, "category");
    assert_eq!(product_ids(&context), [20, 21, 22]);

    let (_, context) = fx.page("/categories/2?min=1.5&max=3").await;
    assert_eq!(product_ids(&context), [20, 21]);
    assert_eq!(context["min"], "1.5");
    assert_eq!(context["max"], "3");
    assert_eq!(context["category"]["name"], "Snacks");

    let (_, context) = fx.page("/categories/2?min=5").await;
    assert_eq!(product_ids(&context), [22]);
    assert_eq!(context["max"], Value::Null);
}

#[tokio::test]
async fn non_numeric_bounds_are_ignored() {
    let fx = Fixture::new();
    let (_, context) = fx.page("/categories/2?min=cheap&max=").await;
    assert_eq!(product_ids(&context), [20, 21, 22]);
    assert_eq!(context["min"], "cheap");
}

#[tokio::test]
async fn unknown_category_is_404() {
    let fx = Fixture::new();
    for target in ["/categories/99", "/categories/abc", "/categories/1.5"] {
        let response = fx.get(target).await;
        assert_eq!(response.code(), 404, "{target}");
        assert_eq!(response.body(), b"category not found");
    }
}

#[tokio::test]
async fn product_page_names_its_category() {
    let fx = Fixture::new();
    let (view, context) = fx.page("/products/11").await;
    assert_eq!(view, "product");
    assert_eq!(context["product"]["name"], "Juice");
    assert_eq!(context["product"]["image"], "/img/juice.png");
    assert_eq!(context["categoryName"], "Drinks");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let fx = Fixture::new();
    let response = fx.get("/products/404").await;
    assert_eq!(response.code(), 404);
    assert_eq!(response.body(), b"product not found");
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_view_and_remove_walkthrough() {
    let fx = Fixture::new();

    let response = fx.get("/add-to-cart/10").await;
    assert_eq!(response.code(), 302);
    assert_eq!(response.header("location"), Some("/cart"));
    let cart = fx.cart().await;
    assert_eq!(quantities(&cart), [(10, 1)]);
    assert_eq!(cart["total"], 2.5);

    fx.get("/add-to-cart/10").await;
    let cart = fx.cart().await;
    assert_eq!(quantities(&cart), [(10, 2)]);
    assert_eq!(cart["total"], 5.0);
    assert_eq!(cart["cartCount"], 2);

    let response = fx.get("/remove/10").await;
    assert_eq!(response.code(), 302);
    assert_eq!(response.header("location"), Some("/cart"));
    let cart = fx.cart().await;
    assert!(quantities(&cart).is_empty());
    assert_eq!(cart["total"], 0.0);
}

#[tokio::test]
async fn add_redirects_back_to_from() {
    let fx = Fixture::new();
    let response = fx.get("/add-to-cart/21?from=%2Fcategories%2F2%3Fmin%3D1").await;
    assert_eq!(response.header("location"), Some("/categories/2?min=1"));

    let response = fx.get("/add-to-cart/21?from=https://elsewhere.example").await;
    assert_eq!(response.header("location"), Some("/cart"));

    let response = fx.get("/add-to-cart/21?from=%2F%5Celsewhere.example").await;
    assert_eq!(response.header("location"), Some("/cart"));
}

#[tokio::test]
async fn unknown_product_still_redirects_without_touching_the_cart() {
    let fx = Fixture::new();
    fx.get("/add-to-cart/11").await;

    for target in ["/add-to-cart/999", "/add-to-cart/nope"] {
        let response = fx.get(target).await;
        assert_eq!(response.code(), 302, "{target}");
    }
    assert_eq!(quantities(&fx.cart().await), [(11, 1)]);
}

#[tokio::test]
async fn remove_leaves_other_items_alone() {
    let fx = Fixture::new();
    fx.get("/add-to-cart/10").await;
    fx.get("/add-to-cart/20").await;
    fx.get("/add-to-cart/20").await;
    fx.get("/add-to-cart/22").await;

    fx.get("/remove/20").await;
    let cart = fx.cart().await;
    assert_eq!(quantities(&cart), [(10, 1), (22, 1)]);
    assert_eq!(cart["total"], 14.5);

    // Removing something absent is harmless.
    assert_eq!(fx.get("/remove/20").await.code(), 302);
    assert_eq!(quantities(&fx.cart().await), [(10, 1), (22, 1)]);
}

#[tokio::test]
async fn checkout_shows_items_and_total() {
    let fx = Fixture::new();
    fx.get("/add-to-cart/11").await;
    fx.get("/add-to-cart/11").await;
    fx.get("/add-to-cart/20").await;

    let (view, context) = fx.page("/checkout").await;
    assert_eq!(view, "checkout");
    assert_eq!(quantities(&context), [(11, 2), (20, 1)]);
    assert_eq!(context["total"], 9.5);
}

#[tokio::test]
async fn cart_survives_a_restart() {
    let fx = Fixture::new();
    fx.get("/add-to-cart/22").await;
    fx.get("/add-to-cart/10").await;
    fx.get("/add-to-cart/22").await;
    let before = fx.cart().await;

    let reopened = Shop::open(&Config {
        catalog_path: fx.dir.path().join("categories.json"),
        cart_path: fx.cart_path(),
        assets_dir: fx.dir.path().join("assets"),
        ..Config::default()
    }).await;
    let snapshot = reopened.cart().snapshot().await;
    let pairs: Vec<_> = snapshot.items().iter().map(|i| (i.id(), u64::from(i.quantity))).collect();
    assert_eq!(pairs, quantities(&before));
    assert_eq!(json!(snapshot.total()), before["total"]);
}

#[tokio::test]
async fn cart_write_failure_is_a_500() {
    let fx = Fixture::new();
    std::fs::create_dir(fx.cart_path()).unwrap();

    let response = fx.get("/add-to-cart/10").await;
    assert_eq!(response.code(), 500);
    assert_eq!(response.body(), b"internal server error");
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirm_order_empties_the_cart_and_issues_an_id() {
    let fx = Fixture::new();
    fx.get("/add-to-cart/10").await;
    fx.get("/add-to-cart/21").await;

    let response = fx.get("/confirm-order").await;
    assert_eq!(response.code(), 302);
    let location = response.header("location").unwrap().to_owned();
    let order_id: u32 = location
        .strip_prefix("/order-confirmation?orderId=")
        .unwrap()
        .parse()
        .unwrap();
    assert!((shop::ORDER_ID_MIN..=shop::ORDER_ID_MAX).contains(&order_id));

    let cart = fx.cart().await;
    assert!(quantities(&cart).is_empty());
    let persisted: Value = serde_json::from_str(&std::fs::read_to_string(fx.cart_path()).unwrap()).unwrap();
    assert_eq!(persisted, json!([]));

    let (view, context) = fx.page(&location).await;
    assert_eq!(view, "order-confirmation");
    assert_eq!(context["orderId"], order_id.to_string());
}

#[tokio::test]
async fn order_confirmation_echoes_any_id() {
    let fx = Fixture::new();
    let (_, context) = fx.page("/order-confirmation?orderId=not-issued").await;
    assert_eq!(context["orderId"], "not-issued");

    let (_, context) = fx.page("/order-confirmation").await;
    assert_eq!(context["orderId"], Value::Null);
}

// ── Everything else ──────────────────────────────────────────────────────────

#[tokio::test]
async fn static_views_render() {
    let fx = Fixture::new();
    for name in ["login", "signup", "about", "terms"] {
        let (view, _) = fx.page(&format!("/{name}")).await;
        assert_eq!(view, name);
    }
}

#[tokio::test]
async fn assets_are_served_from_the_assets_dir() {
    let fx = Fixture::new();
    let css = fx.dir.path().join("assets/css");
    std::fs::create_dir_all(&css).unwrap();
    std::fs::write(css.join("styles.css"), "nav{display:flex}").unwrap();
    std::fs::write(fx.dir.path().join("secret.txt"), "hidden").unwrap();

    let response = fx.get("/css/styles.css").await;
    assert_eq!(response.code(), 200);
    assert_eq!(response.header("content-type"), Some("text/css; charset=utf-8"));
    assert_eq!(response.body(), b"nav{display:flex}");

    assert_eq!(fx.get("/css/missing.css").await.code(), 404);
    assert_eq!(fx.get("/../secret.txt").await.code(), 404);
}

#[tokio::test]
async fn encoded_asset_names_are_decoded_before_lookup() {
    let fx = Fixture::new();
    let img = fx.dir.path().join("assets/img");
    std::fs::create_dir_all(&img).unwrap();
    std::fs::write(img.join("my photo.png"), "png").unwrap();
    std::fs::write(img.join("café.svg"), "<svg/>").unwrap();
    std::fs::write(fx.dir.path().join("secret.txt"), "hidden").unwrap();

    let response = fx.get("/img/my%20photo.png").await;
    assert_eq!(response.code(), 200);
    assert_eq!(response.body(), b"png");
    assert_eq!(fx.get("/img/caf%C3%A9.svg").await.code(), 200);

    assert_eq!(fx.get("/img/%2E%2E/%2E%2E/secret.txt").await.code(), 404);
    assert_eq!(fx.get("/img%2F..%2F..%2Fsecret.txt").await.code(), 404);
}

#[tokio::test]
async fn encoded_ids_are_decoded_before_lookup() {
    let fx = Fixture::new();
    let (view, context) = fx.page("/products/%31%30").await;
    assert_eq!(view, "product");
    assert_eq!(context["product"]["name"], "Cola");

    let (_, context) = fx.page("/categories/%32").await;
    assert_eq!(context["category"]["name"], "Snacks");
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let fx = Fixture::new();
    let response = fx.router.handle(Request::new(Method::Post, "/cart")).await;
    assert_eq!(response.code(), 405);
    let response = fx.router.handle(Request::new(Method::Delete, "/css/styles.css")).await;
    assert_eq!(response.code(), 404);
}

#[tokio::test]
async fn health_endpoints() {
    let fx = Fixture::new();
    assert_eq!(fx.get("/healthz").await.body(), b"ok");
    assert_eq!(fx.get("/readyz").await.body(), b"ready");

    std::fs::remove_file(fx.dir.path().join("categories.json")).unwrap();
    let response = fx.get("/readyz").await;
    assert_eq!(response.code(), 503);
    assert_eq!(response.body(), b"catalog unavailable");
}

#[tokio::test]
async fn built_in_pages_render_html() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("categories.json"), CATALOG).unwrap();
    let shop = Shop::open(&Config {
        catalog_path: dir.path().join("categories.json"),
        cart_path: dir.path().join("cart.json"),
        assets_dir: dir.path().join("assets"),
        ..Config::default()
    }).await;
    let router = shop::router(Arc::new(shop));

    router.handle(Request::get("/add-to-cart/10")).await;
    let response = router.handle(Request::get("/cart")).await;
    assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
    let html = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(html.contains("Cola"));
    assert!(html.contains("Total: $2.50"));
    assert!(html.contains("Cart (1)"));
}
