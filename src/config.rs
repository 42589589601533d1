//! Runtime configuration from `STOREFRONT_*` environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `STOREFRONT_ADDR` | `0.0.0.0:3000` |
//! | `STOREFRONT_CATALOG` | `data/categories.json` |
//! | `STOREFRONT_CART` | `data/cart.json` |
//! | `STOREFRONT_ASSETS` | `assets` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::Error;

pub const ENV_ADDR: &str = "STOREFRONT_ADDR";
pub const ENV_CATALOG: &str = "STOREFRONT_CATALOG";
pub const ENV_CART: &str = "STOREFRONT_CART";
pub const ENV_ASSETS: &str = "STOREFRONT_ASSETS";

/// Where to listen and which files back the shop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub catalog_path: PathBuf,
    pub cart_path: PathBuf,
    pub assets_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            catalog_path: PathBuf::from("data/categories.json"),
            cart_path: PathBuf::from("data/cart.json"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl Config {
    /// Reads the process environment. Unset or blank variables keep their
    /// defaults; an unparsable address is an error.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_ADDR) {
            config.addr = raw.trim().parse().map_err(|_| Error::Config { key: ENV_ADDR, value: raw.clone() })?;
        }
        if let Some(path) = get(ENV_CATALOG) {
            config.catalog_path = path.into();
        }
        if let Some(path) = get(ENV_CART) {
            config.cart_path = path.into();
        }
        if let Some(path) = get(ENV_ASSETS) {
            config.assets_dir = path.into();
        }
        Ok(config)
    }
}
