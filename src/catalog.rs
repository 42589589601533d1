//! Product catalog: loading and pure lookups.
//!
//! The catalog is a JSON array of categories, each owning its products:
//!
//! ```json
//! [{ "id": 1, "name": "Drinks",
//!    "products": [{ "id": 10, "name": "Cola", "price": 2.5, "image": "/img/cola.png" }] }]
//! ```
//!
//! Products may carry any extra display fields; they are kept verbatim.
//! A product missing `id`, `name`, or a numeric `price` is logged and skipped.
//! The file is re-read on every request and a missing or corrupt file reads
//! as an empty catalog.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A product as listed in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Display fields (image, description, …) passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named group of products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub products: Vec<Product>,
}

fn skip_malformed<'de, D>(deserializer: D) -> Result<Vec<Product>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let products = raw.into_iter()
        .filter_map(|value| {
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            serde_json::from_value(value)
                .inspect_err(|e| warn!(%id, error = %e, "skipping malformed product"))
                .ok()
        })
        .collect();
    Ok(products)
}

/// The parsed catalog file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Reads and parses the catalog at `path`.
    ///
    /// Never fails: any I/O or parse error is logged and yields an empty
    /// catalog, which renders as a store with nothing in it.
    pub async fn load(path: &Path) -> Self {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog unreadable");
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog is not valid JSON");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// First category whose id equals `id`.
pub fn find_category(categories: &[Category], id: i64) -> Option<&Category> {
    categories.iter().find(|c| c.id == id)
}

/// First product with `id`, scanning categories in order, paired with the
/// name of the category that owns it.
pub fn find_product(categories: &[Category], id: i64) -> Option<(&Product, &str)> {
    categories.iter().find_map(|c| {
        c.products.iter()
            .find(|p| p.id == id)
            .map(|p| (p, c.name.as_str()))
    })
}

/// Products priced within `[min, max]`, both bounds inclusive. A `None`
/// bound leaves that side open. Inverted bounds are not rejected; they
/// simply match nothing.
pub fn filter_by_price(products: &[Product], min: Option<f64>, max: Option<f64>) -> Vec<&Product> {
    products.iter()
        .filter(|p| min.is_none_or(|min| p.price >= min))
        .filter(|p| max.is_none_or(|max| p.price <= max))
        .collect()
}

// ── Numeric coercion ─────────────────────────────────────────────────────────

/// Coerces a raw parameter to a number. Surrounding whitespace is ignored;
/// blank, non-numeric, and non-finite input all read as `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerces a raw path segment to an id. `"10"` and `"10.0"` both read as 10;
/// fractional or non-numeric ids read as `None`, which matches nothing.
pub fn parse_id(raw: &str) -> Option<i64> {
    let n = parse_number(raw)?;
    if n.fract() != 0.0 || n < i64::MIN as f64 || n > i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}
