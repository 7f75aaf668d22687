//! Extension-mapped request dispatch.
//!
//! After the middleware chain runs, every request URL is expected to carry a
//! file extension (the rewrite stage guarantees this for application URLs).
//! The dispatcher maps that extension to a registered [`Handler`], the same
//! way a web server maps extensions to handler modules.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{Context, Request, Response};

/// A request handler selected by the extension of the routed URL.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handler name for logging.
    fn name(&self) -> &'static str;

    /// Produce a response for the routed request.
    async fn handle(&self, req: Request, ctx: &mut Context) -> Response;
}

/// Maps the extension of the last path segment to a handler.
///
/// Extensions are registered without their leading dot (`rails`, not
/// `.rails`). Requests whose path has no extension, or an extension with no
/// registration, get a 404.
pub struct Dispatcher {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for an extension (without the leading dot).
    pub fn register(mut self, extension: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.handlers.insert(extension.into(), handler);
        self
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Look up the handler for a path, by its last-segment extension.
    pub fn handler_for(&self, path: &str) -> Option<&Arc<dyn Handler>> {
        extension_of(path).and_then(|ext| self.handlers.get(ext))
    }

    /// Dispatch a request to the handler registered for its extension.
    pub async fn dispatch(&self, req: Request, ctx: &mut Context) -> Response {
        let handler = match self.handler_for(req.path()) {
            Some(handler) => Arc::clone(handler),
            None => {
                tracing::debug!(path = req.path(), "no handler for extension");
                return Response::not_found();
            }
        };

        tracing::debug!(path = req.path(), handler = handler.name(), "dispatching");
        handler.handle(req, ctx).await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension of the last path segment, without the dot.
///
/// Uses the same last-segment rule as the rewrite engine: only the text
/// after the final `/` is examined, and a trailing dot does not count as an
/// extension.
pub fn extension_of(path: &str) -> Option<&str> {
    let last_segment = &path[path.rfind('/')? + 1..];
    match last_segment.rfind('.') {
        Some(pos) if pos + 1 < last_segment.len() => Some(&last_segment[pos + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    struct StaticHandler(&'static str);

    #[async_trait]
    impl Handler for StaticHandler {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn handle(&self, _req: Request, _ctx: &mut Context) -> Response {
            Response::ok(self.0)
        }
    }

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
    fn test_extension_of() {
        assert_eq!(extension_of("/products.rails"), Some("rails"));
        assert_eq!(extension_of("/a/b/index.rails"), Some("rails"));
        assert_eq!(extension_of("/style.min.css"), Some("css"));
        assert_eq!(extension_of("/products"), None);
        assert_eq!(extension_of("/dir/"), None);
        assert_eq!(extension_of("/trailing."), None);
        assert_eq!(extension_of("noslash.txt"), None);
        // Dots in earlier segments are not extensions.
        assert_eq!(extension_of("/v1.2/products"), None);
    }

    #[test]
    fn test_dispatch_by_extension() {
        let dispatcher = Dispatcher::new()
            .register("rails", Arc::new(StaticHandler("app")))
            .register("html", Arc::new(StaticHandler("page")));

        assert_eq!(dispatcher.len(), 2);

        let mut ctx = create_context();
        let res = tokio_test::block_on(dispatcher.dispatch(create_request("/home.rails"), &mut ctx));
        assert_eq!(res.body().as_ref(), b"app");

        let res = tokio_test::block_on(dispatcher.dispatch(create_request("/about.html"), &mut ctx));
        assert_eq!(res.body().as_ref(), b"page");
    }

    #[test]
    fn test_dispatch_unknown_extension_is_404() {
        let dispatcher = Dispatcher::new().register("rails", Arc::new(StaticHandler("app")));

        let mut ctx = create_context();
        let res = tokio_test::block_on(dispatcher.dispatch(create_request("/file.png"), &mut ctx));
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_dispatch_extensionless_is_404() {
        // Without the rewrite stage in front, extension-less URLs have
        // nowhere to go.
        let dispatcher = Dispatcher::new().register("rails", Arc::new(StaticHandler("app")));

        let mut ctx = create_context();
        let res = tokio_test::block_on(dispatcher.dispatch(create_request("/products"), &mut ctx));
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_empty_dispatcher() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.is_empty());
        assert!(dispatcher.handler_for("/x.rails").is_none());
    }
}
