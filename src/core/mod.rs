//! Core types for HTTP request/response handling.
//!
//! The fundamental types used throughout the middleware pipeline and the
//! extension dispatcher:
//!
//! - [`Request`] - HTTP request abstraction, with a replaceable URI so the
//!   rewrite stage can substitute the request target before routing
//! - [`Response`] - HTTP response abstraction with builder pattern
//! - [`Context`] - Request context for middleware communication
//! - [`Error`] - Core error types

mod context;
mod error;
mod request;
mod response;

pub use context::{generate_span_id, generate_trace_id, Context, ContextBuilder, HttpVersion};
pub use error::{Error, Result};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
