//! URL rewriting middleware.
//!
//! Runs once per request, after request parsing but before the dispatcher
//! resolves the URL to a handler. When the rewrite engine reports a change,
//! the request URI is replaced in place so all downstream routing sees the
//! rewritten value; the original target is kept in the request context.

use http::Uri;

use crate::config::{MiddlewareConfig, RewriteConfig};
use crate::core::{Context, Request, Response};
use crate::rewrite::{RewriteEngine, RewriteError, RewriteOutcome};

use super::{Middleware, MiddlewareResult};

/// URL rewriting middleware.
///
/// Wraps the pure [`RewriteEngine`] as a pipeline stage. Oversized URLs are
/// answered with 414 URI Too Long; everything else passes through, rewritten
/// or not. A request never fails because of the rewrite decision itself.
pub struct RewriteMiddleware {
    engine: RewriteEngine,
}

impl RewriteMiddleware {
    /// Create a rewrite middleware around an existing engine.
    pub fn new(engine: RewriteEngine) -> Self {
        Self { engine }
    }

    /// Create with the default suffixes (`.rails` / `index.rails`).
    pub fn with_defaults() -> Self {
        Self::new(RewriteEngine::default())
    }

    /// Create from loaded configuration.
    /// Returns None if the rewrite stage is disabled.
    pub fn from_config(rewrite: &RewriteConfig, middleware: &MiddlewareConfig) -> Option<Self> {
        middleware
            .rewrite
            .then(|| Self::new(RewriteEngine::from_config(rewrite)))
    }

    /// The engine this stage wraps.
    pub fn engine(&self) -> &RewriteEngine {
        &self.engine
    }
}

impl Middleware for RewriteMiddleware {
    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn priority(&self) -> i32 {
        10 // Request-modification band: after logging setup, before dispatch
    }

    fn on_request(&self, mut req: Request, ctx: &mut Context) -> MiddlewareResult {
        // A URI with no path portion cannot be rewritten; let it through
        // unchanged rather than failing the request.
        let raw_url = match req.target() {
            Some(target) => target,
            None => return MiddlewareResult::Next(req),
        };

        let rewritten = match self.engine.rewrite(raw_url) {
            Ok(RewriteOutcome::Unchanged(_)) => return MiddlewareResult::Next(req),
            Ok(RewriteOutcome::Rewritten(url)) => url,
            Err(RewriteError::InputTooLarge { len, max }) => {
                tracing::warn!(len, max, "rejecting oversized request URL");
                return MiddlewareResult::Stop(Response::uri_too_long());
            }
        };

        let uri: Uri = match rewritten.parse() {
            Ok(uri) => uri,
            Err(e) => {
                // The engine only appends known-good suffixes, so this fires
                // only for inputs that were never valid origin-form targets.
                // Decline to rewrite and let routing handle the original.
                tracing::debug!(url = %rewritten, error = %e, "rewritten URL did not parse, passing through");
                return MiddlewareResult::Next(req);
            }
        };

        tracing::debug!(from = %raw_url, to = %rewritten, "rewrote request URL");

        ctx.rewritten_from = Some(raw_url.to_string());
        req.set_uri(uri);
        MiddlewareResult::Next(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn create_context() -> Context {
        Context::new(
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            "trace".to_string(),
            "span".to_string(),
        )
    }

    fn create_request(target: &str) -> Request {
        Request::new(
            http::Method::GET,
            target.parse().unwrap(),
            http::HeaderMap::new(),
            bytes::Bytes::new(),
        )
    }

    #[test]
    fn test_rewrites_extensionless_path() {
        let mw = RewriteMiddleware::with_defaults();
        let mut ctx = create_context();

        let result = mw.on_request(create_request("/products"), &mut ctx);
        let req = result.into_request().unwrap();

        assert_eq!(req.path(), "/products.rails");
        assert_eq!(ctx.rewritten_from.as_deref(), Some("/products"));
    }

    #[test]
    fn test_rewrites_directory_to_index_document() {
        let mw = RewriteMiddleware::with_defaults();
        let mut ctx = create_context();

        let result = mw.on_request(create_request("/admin/"), &mut ctx);
        let req = result.into_request().unwrap();

        assert_eq!(req.path(), "/admin/index.rails");
    }

    #[test]
    fn test_preserves_query_string() {
        let mw = RewriteMiddleware::with_defaults();
        let mut ctx = create_context();

        let result = mw.on_request(create_request("/products?id=1&sort=asc"), &mut ctx);
        let req = result.into_request().unwrap();

        assert_eq!(req.target(), Some("/products.rails?id=1&sort=asc"));
        assert_eq!(req.query(), Some("id=1&sort=asc"));
    }

    #[test]
    fn test_existing_extension_untouched() {
        let mw = RewriteMiddleware::with_defaults();
        let mut ctx = create_context();

        let result = mw.on_request(create_request("/style.css"), &mut ctx);
        let req = result.into_request().unwrap();

        assert_eq!(req.path(), "/style.css");
        assert!(ctx.rewritten_from.is_none());
    }

    #[test]
    fn test_oversized_url_short_circuits_with_414() {
        let engine = RewriteEngine::new(".rails", "index.rails", 64);
        let mw = RewriteMiddleware::new(engine);
        let mut ctx = create_context();

        let long = format!("/{}", "a".repeat(100));
        let result = mw.on_request(create_request(&long), &mut ctx);

        assert!(result.is_stop());
        let res = result.into_response().unwrap();
        assert_eq!(res.status(), http::StatusCode::URI_TOO_LONG);
    }

    #[test]
    fn test_from_config_respects_disable_flag() {
        let rewrite = RewriteConfig::default();
        let mut middleware = MiddlewareConfig::default();

        middleware.rewrite = true;
        assert!(RewriteMiddleware::from_config(&rewrite, &middleware).is_some());

        middleware.rewrite = false;
        assert!(RewriteMiddleware::from_config(&rewrite, &middleware).is_none());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mw = RewriteMiddleware::with_defaults();
        let mut ctx = create_context();

        let req = mw
            .on_request(create_request("/products"), &mut ctx)
            .into_request()
            .unwrap();

        let mut ctx2 = create_context();
        let req2 = mw.on_request(req, &mut ctx2).into_request().unwrap();
        assert_eq!(req2.path(), "/products.rails");
        assert!(ctx2.rewritten_from.is_none());
    }
}
