//! The shared shopping cart and its JSON-file persistence.
//!
//! There is exactly one cart per process. [`CartStore`] owns it behind a
//! mutex; every mutation re-reads the cart file, applies the change and
//! writes the file back while holding the lock, so concurrent requests
//! cannot lose each other's updates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::{Catalog, Product, find_product};
use crate::error::Error;

/// A product in the cart. Serialized flat: the product's own fields plus
/// `quantity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> i64 {
        self.product.id
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Cart contents in insertion order, at most one item per product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all items, capped at `u32::MAX`.
    pub fn units(&self) -> u32 {
        self.items.iter().fold(0, |units, i| units.saturating_add(i.quantity))
    }

    /// Σ price × quantity. Computed on demand, never stored.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Increments the item for `product`, or appends it with quantity 1.
    /// A quantity already at `u32::MAX` stays there.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|i| i.id() == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem { product: product.clone(), quantity: 1 }),
        }
    }

    /// Drops every item with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Owner of the process-wide cart and the file it is persisted to.
#[derive(Debug)]
pub struct CartStore {
    path: PathBuf,
    cart: Mutex<Cart>,
}

impl CartStore {
    /// A store with an empty in-memory cart. Nothing is read until
    /// [`reload`](Self::reload) or the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cart: Mutex::new(Cart::default()) }
    }

    /// A store primed from whatever is already persisted at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self::new(path);
        store.reload().await;
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Replaces the in-memory cart with the persisted one. A missing or
    /// unparsable file resets the cart to empty.
    pub async fn reload(&self) {
        let mut cart = self.cart.lock().await;
        self.reload_locked(&mut cart).await;
    }

    /// Writes the in-memory cart to disk, pretty-printed.
    pub async fn save(&self) -> Result<(), Error> {
        let cart = self.cart.lock().await;
        self.save_locked(&cart).await
    }

    /// Adds one unit of `product_id`. Unknown ids leave the cart untouched
    /// and return `Ok(false)`.
    pub async fn add_item(&self, product_id: i64, catalog: &Catalog) -> Result<bool, Error> {
        let mut cart = self.cart.lock().await;
        self.reload_locked(&mut cart).await;
        let Some((product, _)) = find_product(catalog.categories(), product_id) else {
            debug!(product_id, "add to cart: unknown product");
            return Ok(false);
        };
        cart.add(product);
        debug!(product_id, units = cart.units(), "added to cart");
        self.save_locked(&cart).await?;
        Ok(true)
    }

    /// Removes the item with `id`, if present.
    pub async fn remove_item(&self, id: i64) -> Result<bool, Error> {
        let mut cart = self.cart.lock().await;
        self.reload_locked(&mut cart).await;
        let removed = cart.remove(id);
        debug!(product_id = id, removed, "removed from cart");
        self.save_locked(&cart).await?;
        Ok(removed)
    }

    /// Empties the cart and persists the empty state.
    pub async fn clear(&self) -> Result<(), Error> {
        let mut cart = self.cart.lock().await;
        cart.clear();
        self.save_locked(&cart).await
    }

    async fn reload_locked(&self, cart: &mut Cart) {
        *cart = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "cart file is not valid JSON, starting empty");
                Cart::default()
            }),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no persisted cart, starting empty");
                Cart::default()
            }
        };
    }

    async fn save_locked(&self, cart: &Cart) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(cart)?;
        let persist = |source| Error::Persist { path: self.path.clone(), source };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(persist)?;
        }
        tokio::fs::write(&self.path, json).await.map_err(persist)
    }
}
