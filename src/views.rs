//! Page rendering.
//!
//! Handlers never build HTML themselves. They name a [`View`] and hand a
//! JSON context to a [`Render`] implementation. [`Pages`] is the built-in
//! renderer; tests swap in their own to inspect the context directly.
//!
//! Context keys per view (every view also receives `cartCount`):
//!
//! | View | Keys |
//! |---|---|
//! | `index` | `categories` |
//! | `category` | `category`, `products`, `min`, `max` |
//! | `product` | `product`, `categoryName` |
//! | `cart`, `checkout` | `items`, `total` |
//! | `order-confirmation` | `orderId` |
//! | `login`, `signup`, `about`, `terms` | — |

use std::fmt::Write as _;

use serde_json::Value;

use crate::error::Error;

/// A page template identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum View {
    Index,
    Category,
    Product,
    Cart,
    Checkout,
    OrderConfirmation,
    Login,
    Signup,
    About,
    Terms,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            Self::Index             => "index",
            Self::Category          => "category",
            Self::Product           => "product",
            Self::Cart              => "cart",
            Self::Checkout          => "checkout",
            Self::OrderConfirmation => "order-confirmation",
            Self::Login             => "login",
            Self::Signup            => "signup",
            Self::About             => "about",
            Self::Terms             => "terms",
        }
    }
}

/// Turns a view plus its data context into an HTML body.
pub trait Render: Send + Sync {
    fn render(&self, view: View, context: &Value) -> Result<String, Error>;
}

/// The storefront's HTML pages: one shared layout with navigation and the
/// cart badge, and a body per view. All interpolated text is escaped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pages;

impl Render for Pages {
    fn render(&self, view: View, context: &Value) -> Result<String, Error> {
        let body = match view {
            View::Index => index(context)?,
            View::Category => category(context)?,
            View::Product => product(context)?,
            View::Cart => cart(context, false)?,
            View::Checkout => cart(context, true)?,
            View::OrderConfirmation => order_confirmation(context),
            View::Login => form("Log in", "/login", &["email", "password"]),
            View::Signup => form("Sign up", "/signup", &["name", "email", "password"]),
            View::About => static_page("About us", "A small shop with a small catalog. Everything ships from the same shelf."),
            View::Terms => static_page("Terms", "Orders are placeholders: nothing is charged and nothing ships."),
        };
        let count = context.get("cartCount").and_then(Value::as_u64).unwrap_or(0);
        Ok(layout(title(view, context), count, &body))
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

fn title(view: View, context: &Value) -> String {
    let named = |key: &str| {
        context.get(key)
            .and_then(|v| v.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    match view {
        View::Category => named("category").unwrap_or_else(|| "Category".into()),
        View::Product => named("product").unwrap_or_else(|| "Product".into()),
        View::Index => "Shop".into(),
        View::Cart => "Your cart".into(),
        View::Checkout => "Checkout".into(),
        View::OrderConfirmation => "Order confirmed".into(),
        View::Login => "Log in".into(),
        View::Signup => "Sign up".into(),
        View::About => "About".into(),
        View::Terms => "Terms".into(),
    }
}

fn layout(title: String, cart_count: u64, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"/css/styles.css\">\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> <a href=\"/login\">Log in</a> \
         <a href=\"/signup\">Sign up</a> <a href=\"/cart\">Cart ({cart_count})</a></nav>\n\
         <main>\n{body}</main>\n<footer><a href=\"/terms\">Terms</a></footer>\n</body>\n</html>\n",
        title = escape(&title),
    )
}

// ── Bodies ───────────────────────────────────────────────────────────────────

fn index(ctx: &Value) -> Result<String, Error> {
    let categories = array(ctx, "categories", View::Index)?;
    let mut out = String::from("<h1>Categories</h1>\n");
    if categories.is_empty() {
        out.push_str("<p>No categories yet.</p>\n");
        return Ok(out);
    }
    out.push_str("<ul class=\"categories\">\n");
    for c in categories {
        let _ = writeln!(
            out,
            "<li><a href=\"/categories/{}\">{}</a></li>",
            number(c.get("id")),
            text(c.get("name")),
        );
    }
    out.push_str("</ul>\n");
    Ok(out)
}

fn category(ctx: &Value) -> Result<String, Error> {
    let category = field(ctx, "category", View::Category)?;
    let products = array(ctx, "products", View::Category)?;
    let id = number(category.get("id"));
    let mut out = format!("<h1>{}</h1>\n", text(category.get("name")));
    let _ = writeln!(
        out,
        "<form method=\"get\" action=\"/categories/{id}\">\
         <label>Min <input name=\"min\" value=\"{}\"></label> \
         <label>Max <input name=\"max\" value=\"{}\"></label> \
         <button>Filter</button></form>",
        text(ctx.get("min")),
        text(ctx.get("max")),
    );
    if products.is_empty() {
        out.push_str("<p>No products match.</p>\n");
        return Ok(out);
    }
    out.push_str("<ul class=\"products\">\n");
    for p in products {
        let pid = number(p.get("id"));
        let _ = writeln!(
            out,
            "<li><a href=\"/products/{pid}\">{}</a> {} \
             <a href=\"/add-to-cart/{pid}?from=/categories/{id}\">Add to cart</a></li>",
            text(p.get("name")),
            money(p.get("price")),
        );
    }
    out.push_str("</ul>\n");
    Ok(out)
}

fn product(ctx: &Value) -> Result<String, Error> {
    let product = field(ctx, "product", View::Product)?;
    let pid = number(product.get("id"));
    let mut out = format!(
        "<h1>{}</h1>\n<p class=\"category\">{}</p>\n<p class=\"price\">{}</p>\n",
        text(product.get("name")),
        text(ctx.get("categoryName")),
        money(product.get("price")),
    );
    if let Some(image) = product.get("image").and_then(Value::as_str) {
        let _ = writeln!(out, "<img src=\"{}\" alt=\"{}\">", escape(image), text(product.get("name")));
    }
    if let Some(description) = product.get("description").and_then(Value::as_str) {
        let _ = writeln!(out, "<p>{}</p>", escape(description));
    }
    let _ = writeln!(out, "<a href=\"/add-to-cart/{pid}?from=/products/{pid}\">Add to cart</a>");
    Ok(out)
}

fn cart(ctx: &Value, checkout: bool) -> Result<String, Error> {
    let view = if checkout { View::Checkout } else { View::Cart };
    let items = array(ctx, "items", view)?;
    let total = money(Some(field(ctx, "total", view)?));
    let mut out = format!("<h1>{}</h1>\n", if checkout { "Checkout" } else { "Your cart" });
    if items.is_empty() {
        out.push_str("<p>Your cart is empty.</p>\n");
    } else {
        out.push_str("<table class=\"cart\">\n<tr><th>Product</th><th>Price</th><th>Qty</th><th></th></tr>\n");
        for item in items {
            let _ = write!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td>",
                text(item.get("name")),
                money(item.get("price")),
                number(item.get("quantity")),
            );
            if checkout {
                out.push_str("<td></td></tr>\n");
            } else {
                let _ = writeln!(out, "<td><a href=\"/remove/{}\">Remove</a></td></tr>", number(item.get("id")));
            }
        }
        out.push_str("</table>\n");
    }
    let _ = writeln!(out, "<p class=\"total\">Total: {total}</p>");
    if items.is_empty() {
        return Ok(out);
    }
    if checkout {
        out.push_str("<a class=\"button\" href=\"/confirm-order\">Confirm order</a>\n");
    } else {
        out.push_str("<a class=\"button\" href=\"/checkout\">Checkout</a>\n");
    }
    Ok(out)
}

fn order_confirmation(ctx: &Value) -> String {
    format!(
        "<h1>Thank you!</h1>\n<p>Your order number is <strong>{}</strong>.</p>\n\
         <a href=\"/\">Keep shopping</a>\n",
        text(ctx.get("orderId")),
    )
}

fn form(heading: &str, action: &str, fields: &[&str]) -> String {
    let mut out = format!("<h1>{heading}</h1>\n<form method=\"get\" action=\"{action}\">\n");
    for name in fields {
        let kind = if *name == "password" { "password" } else { "text" };
        let _ = writeln!(out, "<label>{name} <input type=\"{kind}\" name=\"{name}\"></label>");
    }
    out.push_str("<button>Continue</button>\n</form>\n");
    out
}

fn static_page(heading: &str, paragraph: &str) -> String {
    format!("<h1>{heading}</h1>\n<p>{paragraph}</p>\n")
}

// ── Context access ───────────────────────────────────────────────────────────

fn field<'a>(ctx: &'a Value, key: &str, view: View) -> Result<&'a Value, Error> {
    ctx.get(key).ok_or_else(|| Error::Render {
        view: view.name(),
        reason: format!("missing `{key}`"),
    })
}

fn array<'a>(ctx: &'a Value, key: &str, view: View) -> Result<&'a Vec<Value>, Error> {
    field(ctx, key, view)?.as_array().ok_or_else(|| Error::Render {
        view: view.name(),
        reason: format!("`{key}` is not a list"),
    })
}

/// Escaped display text; `null` and missing render as nothing.
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape(s),
        Some(other) => escape(&other.to_string()),
    }
}

fn number(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn money(value: Option<&Value>) -> String {
    let amount = value.and_then(Value::as_f64).unwrap_or(0.0);
    format!("${amount:.2}")
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
