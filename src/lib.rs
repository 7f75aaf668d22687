//! tokio_rewrite - URL-rewriting HTTP front end powered by Rust and Tokio.
//!
//! This crate rewrites extension-less request URLs to carry an application
//! routing extension (default `.rails`), then dispatches the request to a
//! handler registered for that extension. Clients ask for `/products`; the
//! extension-mapped application handler sees `/products.rails`.
//!
//! # Features
//!
//! - **Pure rewrite engine**: a stateless, bounded-input URL transform,
//!   usable on its own without the server
//! - **Middleware pipeline**: the engine runs as one composable stage,
//!   before any routing
//! - **Extension dispatch**: handlers keyed by the extension of the routed
//!   URL's last path segment
//! - **Async I/O**: built on Tokio and hyper
//! - **Access logging**: structured JSON logging with tracing, including
//!   the pre-rewrite URL
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_rewrite::rewrite::RewriteEngine;
//!
//! let engine = RewriteEngine::default();
//! assert_eq!(engine.rewrite("/products?id=1")?.as_str(), "/products.rails?id=1");
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod logging;
pub mod middleware;
pub mod rewrite;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use rewrite::{RewriteEngine, RewriteOutcome};
pub use server::Server;
