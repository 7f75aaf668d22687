//! Middleware pipeline for request/response processing.
//!
//! This module provides a composable middleware system for handling HTTP
//! requests and responses. Middleware can:
//! - Inspect and modify incoming requests (the rewrite stage swaps the URI)
//! - Short-circuit the pipeline and return early responses
//! - Modify outgoing responses
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_rewrite::middleware::{Middleware, MiddlewareResult, MiddlewareChain};
//! use tokio_rewrite::middleware::rewrite::RewriteMiddleware;
//!
//! let chain = MiddlewareChain::new()
//!     .add(RewriteMiddleware::with_defaults());
//! ```

mod chain;

pub mod access_log;
pub mod rewrite;

pub use chain::MiddlewareChain;

use crate::core::{Context, Request, Response};

/// Result of middleware request processing.
#[derive(Debug)]
pub enum MiddlewareResult {
    /// Continue to the next middleware with the (possibly modified) request.
    Next(Request),
    /// Stop the middleware chain and return this response immediately.
    Stop(Response),
}

impl MiddlewareResult {
    /// Check if this result continues the chain.
    pub fn is_next(&self) -> bool {
        matches!(self, MiddlewareResult::Next(_))
    }

    /// Check if this result stops the chain.
    pub fn is_stop(&self) -> bool {
        matches!(self, MiddlewareResult::Stop(_))
    }

    /// Unwrap the request if this is a Next result.
    pub fn into_request(self) -> Option<Request> {
        match self {
            MiddlewareResult::Next(req) => Some(req),
            MiddlewareResult::Stop(_) => None,
        }
    }

    /// Unwrap the response if this is a Stop result.
    pub fn into_response(self) -> Option<Response> {
        match self {
            MiddlewareResult::Next(_) => None,
            MiddlewareResult::Stop(res) => Some(res),
        }
    }
}

/// Trait for implementing middleware.
///
/// Middleware processes requests before they reach the dispatcher and
/// responses after the dispatcher returns. The pipeline executes
/// `on_request` in order and `on_response` in reverse order.
///
/// # Lifecycle
///
/// ```text
/// Request → MW1.on_request → MW2.on_request → Dispatcher
///                                                ↓
/// Response ← MW1.on_response ← MW2.on_response ←─┘
/// ```
///
/// # Implementation Notes
///
/// - `on_request` can modify the request or short-circuit with a response
/// - `on_response` can modify the response (e.g., add headers)
/// - Context allows middleware to communicate (e.g., the rewrite stage
///   records the pre-rewrite URL for the access log)
pub trait Middleware: Send + Sync {
    /// Unique name for this middleware (used for logging/debugging).
    fn name(&self) -> &'static str;

    /// Priority for ordering in the chain.
    /// Lower values execute first for requests, last for responses.
    /// Default is 0.
    ///
    /// Suggested priority ranges:
    /// - -100..-50: Security
    /// - -50..0: Logging, tracing
    /// - 0..50: Request modification (URL rewriting lives here)
    /// - 50..100: Response modification
    fn priority(&self) -> i32 {
        0
    }

    /// Process an incoming request.
    ///
    /// Return `MiddlewareResult::Next(req)` to continue the chain,
    /// or `MiddlewareResult::Stop(res)` to short-circuit with a response.
    fn on_request(&self, req: Request, _ctx: &mut Context) -> MiddlewareResult {
        MiddlewareResult::Next(req)
    }

    /// Process an outgoing response.
    ///
    /// Called in reverse order after the dispatcher returns.
    fn on_response(&self, res: Response, _ctx: &Context) -> Response {
        res
    }
}
