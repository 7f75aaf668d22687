//! URL-rewrite decision engine.
//!
//! Rewrites extension-less request URLs to carry the application routing
//! extension, so that the extension-mapped dispatcher can pick up requests
//! whose clients never supplied an extension:
//!
//! ```text
//! /products              -> /products.rails
//! /products/             -> /products/index.rails
//! /products.html         -> unchanged
//! /products?id=1         -> /products.rails?id=1
//! ```
//!
//! The engine is a pure function over the raw request target (path plus
//! optional query). It holds no per-request state, performs no I/O, and is
//! safe to share across any number of request tasks.
//!
//! This is deliberately a single fixed policy, not a rule-table rewriter:
//! append a suffix when the last path segment has no extension, and nothing
//! else. No percent-decoding, no case normalization, no `..` handling; the
//! transform operates on the raw bytes the server received.

mod engine;

pub use engine::{RewriteDecision, RewriteEngine, RewriteError, RewriteOutcome};

/// Default extension appended to extension-less file segments.
pub const DEFAULT_EXTENSION_SUFFIX: &str = ".rails";

/// Default document name appended to directory references (paths ending in `/`).
pub const DEFAULT_INDEX_DOCUMENT: &str = "index.rails";

/// Default maximum accepted length for a raw request URL, in bytes.
pub const DEFAULT_MAX_URL_LEN: usize = 2048;
