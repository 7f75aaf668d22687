//! HTTP request abstraction for the middleware pipeline.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
    pub static CONTENT_LENGTH: HeaderName = header::CONTENT_LENGTH;
    pub static USER_AGENT: HeaderName = header::USER_AGENT;
}

/// HTTP request for middleware and the dispatcher.
///
/// The URI is replaceable: the rewrite stage substitutes the request target
/// before routing, and every later stage sees the rewritten value.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
/// Use references or move semantics instead.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    version: http::Version,
}

impl Request {
    /// Create a new request.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            version: http::Version::HTTP_11,
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the query string (without the leading `?`).
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get the raw request target: path plus optional `?query`.
    ///
    /// This is the string the rewrite engine operates on. `None` only for
    /// degenerate URIs that carry no path at all.
    #[inline]
    pub fn target(&self) -> Option<&str> {
        self.uri.path_and_query().map(|pq| pq.as_str())
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Replace the request URI.
    ///
    /// Downstream routing sees the new value; the original is gone from the
    /// request itself, so callers that care record it in the [`Context`]
    /// first.
    ///
    /// [`Context`]: crate::core::Context
    #[inline]
    pub fn set_uri(&mut self, uri: Uri) {
        self.uri = uri;
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a mutable reference to headers.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get the request body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the HTTP version.
    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    /// Set the HTTP version.
    #[inline]
    pub fn set_version(&mut self, version: http::Version) {
        self.version = version;
    }

    /// Get a header value by name (fast path with HeaderName constant).
    #[inline]
    fn header_by_name(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a header value by string name (slower, case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get Content-Type header.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header_by_name(&header_names::CONTENT_TYPE)
    }

    /// Get Content-Length header.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.header_by_name(&header_names::CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
    }

    /// Get User-Agent header.
    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.header_by_name(&header_names::USER_AGENT)
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<Bytes>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: body.into(),
            version: parts.version,
        }
    }
}

impl From<Request> for http::Request<Bytes> {
    fn from(req: Request) -> Self {
        let mut builder = http::Request::builder()
            .method(req.method)
            .uri(req.uri)
            .version(req.version);

        if let Some(headers) = builder.headers_mut() {
            *headers = req.headers;
        }

        builder.body(req.body).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_http() {
        let http_req = http::Request::builder()
            .method("GET")
            .uri("/test?foo=bar")
            .header("user-agent", "test/1.0")
            .body(Bytes::new())
            .unwrap();

        let req = Request::from(http_req);

        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.path(), "/test");
        assert_eq!(req.query(), Some("foo=bar"));
        assert_eq!(req.target(), Some("/test?foo=bar"));
        assert_eq!(req.user_agent(), Some("test/1.0"));
    }

    #[test]
    fn test_set_uri_replaces_target() {
        let http_req = http::Request::builder()
            .method("GET")
            .uri("/products?id=1")
            .body(Bytes::new())
            .unwrap();

        let mut req = Request::from(http_req);
        assert_eq!(req.target(), Some("/products?id=1"));

        let rewritten: Uri = "/products.rails?id=1".parse().unwrap();
        req.set_uri(rewritten);

        assert_eq!(req.path(), "/products.rails");
        assert_eq!(req.query(), Some("id=1"));
        assert_eq!(req.target(), Some("/products.rails?id=1"));
    }

    #[test]
    fn test_target_without_query() {
        let http_req = http::Request::builder()
            .method("GET")
            .uri("/plain")
            .body(Bytes::new())
            .unwrap();

        let req = Request::from(http_req);
        assert_eq!(req.target(), Some("/plain"));
        assert_eq!(req.query(), None);
    }

    #[test]
    fn test_header_by_string() {
        let http_req = http::Request::builder()
            .method("GET")
            .uri("/")
            .header("x-custom-header", "custom-value")
            .header("content-length", "42")
            .body(Bytes::new())
            .unwrap();

        let req = Request::from(http_req);
        assert_eq!(req.header("x-custom-header"), Some("custom-value"));
        assert_eq!(req.header("X-Custom-Header"), Some("custom-value")); // case-insensitive
        assert_eq!(req.content_length(), Some(42));
    }
}
