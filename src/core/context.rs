//! Request context for the middleware pipeline.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Instant;

/// HTTP version as static string (no allocation).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpVersion(&'static str);

impl HttpVersion {
    pub const HTTP_10: Self = Self("HTTP/1.0");
    pub const HTTP_11: Self = Self("HTTP/1.1");
    pub const HTTP_20: Self = Self("HTTP/2.0");

    /// Get the version string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Create from http::Version.
    #[inline]
    pub fn from_http(version: http::Version) -> Self {
        match version {
            http::Version::HTTP_10 => Self::HTTP_10,
            http::Version::HTTP_11 => Self::HTTP_11,
            http::Version::HTTP_2 => Self::HTTP_20,
            _ => Self::HTTP_11, // fallback
        }
    }
}

impl std::fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

/// Request context shared across middleware and handlers.
///
/// Context carries request-scoped data through the pipeline:
/// - Client information (IP, trace IDs)
/// - Timing information
/// - The pre-rewrite URL, when the rewrite stage changed the request target
/// - Response headers to add
/// - Custom key-value storage for middleware communication
pub struct Context {
    /// Client IP address.
    pub client_ip: IpAddr,

    /// W3C Trace ID (32 hex chars).
    pub trace_id: String,

    /// Span ID (16 hex chars).
    pub span_id: String,

    /// Short request ID for logging.
    pub request_id: String,

    /// Request start time.
    pub started_at: Instant,

    /// HTTP version (no allocation, Copy).
    pub http_version: HttpVersion,

    /// The original request target, recorded by the rewrite stage when it
    /// substitutes the URI. `None` when the URL passed through unchanged.
    pub rewritten_from: Option<String>,

    /// Response headers to add (pre-sized for typical usage).
    response_headers: HashMap<String, String>,

    /// Custom key-value storage for middleware.
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Create a new context with minimal information.
    #[inline]
    pub fn new(client_ip: IpAddr, trace_id: String, span_id: String) -> Self {
        let request_id = make_request_id(&trace_id, &span_id);

        Self {
            client_ip,
            trace_id,
            span_id,
            request_id,
            started_at: Instant::now(),
            http_version: HttpVersion::HTTP_11,
            rewritten_from: None,
            response_headers: HashMap::with_capacity(4),
            values: HashMap::new(),
        }
    }

    /// Create a context builder for more control.
    #[inline]
    pub fn builder(client_ip: IpAddr) -> ContextBuilder {
        ContextBuilder::new(client_ip)
    }

    /// Set a custom value.
    #[inline]
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    /// Get a custom value.
    #[inline]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref())
    }

    /// Get a mutable reference to a custom value.
    #[inline]
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut())
    }

    /// Remove a custom value.
    #[inline]
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Add a response header.
    #[inline]
    pub fn set_response_header(&mut self, name: impl Into<String>, value: impl ToString) {
        self.response_headers.insert(name.into(), value.to_string());
    }

    /// Get all response headers to add.
    #[inline]
    pub fn response_headers(&self) -> &HashMap<String, String> {
        &self.response_headers
    }

    /// Whether the rewrite stage changed this request's URL.
    #[inline]
    pub fn was_rewritten(&self) -> bool {
        self.rewritten_from.is_some()
    }

    /// Get elapsed time since request started.
    #[inline]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Get elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

/// Build request ID from trace_id and span_id.
#[inline]
fn make_request_id(trace_id: &str, span_id: &str) -> String {
    let trace_part = &trace_id[..12.min(trace_id.len())];
    let span_part = &span_id[..4.min(span_id.len())];

    let mut id = String::with_capacity(trace_part.len() + 1 + span_part.len());
    id.push_str(trace_part);
    id.push('-');
    id.push_str(span_part);
    id
}

/// Builder for creating Context with more control.
pub struct ContextBuilder {
    client_ip: IpAddr,
    trace_id: Option<String>,
    span_id: Option<String>,
    http_version: HttpVersion,
}

impl ContextBuilder {
    /// Create a new context builder.
    #[inline]
    pub fn new(client_ip: IpAddr) -> Self {
        Self {
            client_ip,
            trace_id: None,
            span_id: None,
            http_version: HttpVersion::HTTP_11,
        }
    }

    /// Set the trace ID.
    #[inline]
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Set the span ID.
    #[inline]
    pub fn span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }

    /// Set the HTTP version.
    #[inline]
    pub fn http_version(mut self, version: HttpVersion) -> Self {
        self.http_version = version;
        self
    }

    /// Build the context.
    #[inline]
    pub fn build(self) -> Context {
        let trace_id = self.trace_id.unwrap_or_else(generate_trace_id);
        let span_id = self.span_id.unwrap_or_else(generate_span_id);
        let request_id = make_request_id(&trace_id, &span_id);

        Context {
            client_ip: self.client_ip,
            trace_id,
            span_id,
            request_id,
            started_at: Instant::now(),
            http_version: self.http_version,
            rewritten_from: None,
            response_headers: HashMap::with_capacity(4),
            values: HashMap::new(),
        }
    }
}

// ============================================================================
// Fast random ID generation with thread-local state
// ============================================================================

thread_local! {
    static RNG_STATE: Cell<u64> = Cell::new(init_rng_seed());
}

/// Initialize RNG seed from system entropy.
fn init_rng_seed() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{SystemTime, UNIX_EPOCH};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    hasher.write_u64(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
    );
    hasher.finish()
}

/// Fast random u64 using thread-local xorshift64.
#[inline]
fn rand_u64() -> u64 {
    RNG_STATE.with(|state| {
        let mut x = state.get();
        // xorshift64 algorithm
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        state.set(x);
        x
    })
}

/// Generate a random trace ID (32 hex chars).
pub fn generate_trace_id() -> String {
    use std::fmt::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let random = rand_u64();

    let mut id = String::with_capacity(32);
    let _ = write!(id, "{:016x}{:016x}", timestamp, random);
    id
}

/// Generate a random span ID (16 hex chars).
#[inline]
pub fn generate_span_id() -> String {
    use std::fmt::Write;

    let mut id = String::with_capacity(16);
    let _ = write!(id, "{:016x}", rand_u64());
    id
}
