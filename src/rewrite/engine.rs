//! The rewrite decision procedure.

use std::fmt;

use super::{DEFAULT_EXTENSION_SUFFIX, DEFAULT_INDEX_DOCUMENT, DEFAULT_MAX_URL_LEN};
use crate::config::RewriteConfig;

/// What the engine decided to do with a URL.
///
/// Derived purely from the last path segment (the text after the final `/`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteDecision {
    /// Leave the URL alone: the last segment already has an extension,
    /// or the path contains no `/` at all.
    NoOp,
    /// The path ends in `/`: append the full index document name.
    AppendIndexDocument,
    /// The last segment is non-empty and has no `.`: append the bare
    /// extension suffix.
    AppendExtension,
}

/// Result of a rewrite: either the borrowed input or a newly built URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteOutcome<'a> {
    /// No rewrite was needed; the original URL passes through.
    Unchanged(&'a str),
    /// The URL was rewritten; the query string (if any) is preserved verbatim.
    Rewritten(String),
}

impl<'a> RewriteOutcome<'a> {
    /// Whether the engine changed the URL.
    #[inline]
    pub fn changed(&self) -> bool {
        matches!(self, RewriteOutcome::Rewritten(_))
    }

    /// The resulting URL, rewritten or not.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            RewriteOutcome::Unchanged(url) => url,
            RewriteOutcome::Rewritten(url) => url,
        }
    }

    /// Consume the outcome, allocating only if a rewrite happened.
    #[inline]
    pub fn into_string(self) -> String {
        match self {
            RewriteOutcome::Unchanged(url) => url.to_string(),
            RewriteOutcome::Rewritten(url) => url,
        }
    }
}

/// Error produced by the engine.
#[derive(Debug, PartialEq, Eq)]
pub enum RewriteError {
    /// The raw URL exceeds the engine's maximum accepted length.
    ///
    /// Oversized input is rejected outright rather than truncated: a
    /// silently shortened URL would route to the wrong resource.
    InputTooLarge { len: usize, max: usize },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::InputTooLarge { len, max } => {
                write!(f, "request URL too large: {} bytes (max {})", len, max)
            }
        }
    }
}

impl std::error::Error for RewriteError {}

/// The URL-rewrite engine.
///
/// The suffix strings and the input length bound are injected at
/// construction; behavior is otherwise fixed. An engine is cheap to build
/// and immutable afterwards, so one instance is shared by every request.
#[derive(Clone, Debug)]
pub struct RewriteEngine {
    extension_suffix: String,
    index_document: String,
    max_url_len: usize,
}

impl RewriteEngine {
    /// Create an engine with explicit suffixes and length bound.
    pub fn new(
        extension_suffix: impl Into<String>,
        index_document: impl Into<String>,
        max_url_len: usize,
    ) -> Self {
        Self {
            extension_suffix: extension_suffix.into(),
            index_document: index_document.into(),
            max_url_len,
        }
    }

    /// Create an engine from loaded configuration.
    pub fn from_config(config: &RewriteConfig) -> Self {
        Self::new(
            config.extension.clone(),
            config.index_document.clone(),
            config.max_url_len,
        )
    }

    /// The extension suffix appended to extension-less segments.
    #[inline]
    pub fn extension_suffix(&self) -> &str {
        &self.extension_suffix
    }

    /// The document name appended to directory references.
    #[inline]
    pub fn index_document(&self) -> &str {
        &self.index_document
    }

    /// Maximum accepted input length in bytes.
    #[inline]
    pub fn max_url_len(&self) -> usize {
        self.max_url_len
    }

    /// Upper bound on the length of any URL this engine can produce.
    #[inline]
    pub fn max_rewritten_len(&self) -> usize {
        self.max_url_len + self.extension_suffix.len().max(self.index_document.len())
    }

    /// Classify a raw URL without building the rewritten string.
    ///
    /// The decision looks only at the path portion (everything before the
    /// first `?`) and within that, only at the last path segment. Dots in
    /// earlier segments do not inhibit rewriting.
    pub fn decide(&self, raw_url: &str) -> RewriteDecision {
        let path = match raw_url.find('?') {
            Some(pos) => &raw_url[..pos],
            None => raw_url,
        };

        // No '/' means no identifiable last segment; decline to rewrite.
        let last_segment = match path.rfind('/') {
            Some(pos) => &path[pos + 1..],
            None => return RewriteDecision::NoOp,
        };

        if last_segment.is_empty() {
            RewriteDecision::AppendIndexDocument
        } else if last_segment.contains('.') {
            RewriteDecision::NoOp
        } else {
            RewriteDecision::AppendExtension
        }
    }

    /// Rewrite a raw request URL.
    ///
    /// Returns [`RewriteOutcome::Unchanged`] when no rewrite applies, or
    /// [`RewriteOutcome::Rewritten`] with the suffix inserted before the
    /// query string. The query string, including its leading `?`, is
    /// reattached byte-for-byte.
    ///
    /// # Errors
    ///
    /// [`RewriteError::InputTooLarge`] when `raw_url` exceeds
    /// [`max_url_len`](Self::max_url_len).
    pub fn rewrite<'a>(&self, raw_url: &'a str) -> Result<RewriteOutcome<'a>, RewriteError> {
        if raw_url.len() > self.max_url_len {
            return Err(RewriteError::InputTooLarge {
                len: raw_url.len(),
                max: self.max_url_len,
            });
        }

        let suffix = match self.decide(raw_url) {
            RewriteDecision::NoOp => return Ok(RewriteOutcome::Unchanged(raw_url)),
            RewriteDecision::AppendIndexDocument => &self.index_document,
            RewriteDecision::AppendExtension => &self.extension_suffix,
        };

        let (path, query) = match raw_url.find('?') {
            Some(pos) => (&raw_url[..pos], &raw_url[pos..]),
            None => (raw_url, ""),
        };

        let mut url = String::with_capacity(path.len() + suffix.len() + query.len());
        url.push_str(path);
        url.push_str(suffix);
        url.push_str(query);

        Ok(RewriteOutcome::Rewritten(url))
    }
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSION_SUFFIX,
            DEFAULT_INDEX_DOCUMENT,
            DEFAULT_MAX_URL_LEN,
        )
    }
}
