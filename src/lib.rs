//! # storefront
//!
//! A small shop served over HTTP: categories and products from a JSON
//! catalog file, one shared cart persisted to a JSON file after every change,
//! and server-rendered pages for browsing, the cart, and checkout.
//!
//! ## Layout
//!
//! - [`catalog`] — catalog file loading and pure lookups
//! - [`cart`] — the cart and its file-backed store
//! - [`views`] — page names and the HTML renderer
//! - [`shop`] — route handlers over the shared [`Shop`]
//! - [`Router`] / [`Server`] — radix-tree routing via [`matchit`], hyper
//!   connections, graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront::{Config, Server, Shop, shop};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), storefront::Error> {
//!     let config = Config::from_env()?;
//!     let shop = Arc::new(Shop::open(&config).await);
//!     Server::bind(config.addr).serve(shop::router(shop)).await
//! }
//! ```
//!
//! ## In-process requests
//!
//! [`Router::handle`] runs the full routing path without a socket:
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use storefront::{Config, Request, Shop, shop};
//! # async fn demo() {
//! let shop = Arc::new(Shop::open(&Config::default()).await);
//! let response = shop::router(shop).handle(Request::get("/cart")).await;
//! assert_eq!(response.code(), 200);
//! # }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod assets;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod health;
pub mod middleware;
pub mod shop;
pub mod views;

pub use cart::{Cart, CartItem, CartStore};
pub use catalog::{Catalog, Category, Product};
pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use shop::Shop;
pub use status::Status;
pub use views::{Pages, Render, View};
