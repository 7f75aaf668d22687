//! HTTP server: accept loop, per-request pipeline, extension dispatch.
//!
//! Each connection is served by hyper over HTTP/1.1. Per request, the server
//! builds a [`Context`], runs the middleware chain (where the URL rewrite
//! happens, before any routing), dispatches by extension, and runs the
//! response pass of the chain.

pub mod dispatch;
pub mod handlers;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderName, HeaderValue, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::core::{Context, HttpVersion, Request, Response, Result};
use crate::middleware::{MiddlewareChain, MiddlewareResult};

pub use dispatch::{Dispatcher, Handler};

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    chain: MiddlewareChain,
    dispatcher: Dispatcher,
}

impl Server {
    /// Create a server from config, a middleware chain, and a dispatcher.
    pub fn new(config: ServerConfig, chain: MiddlewareChain, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            chain,
            dispatcher,
        }
    }

    /// Run the accept loop until the task is cancelled.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr).await?;
        tracing::info!(
            addr = %self.config.listen_addr,
            middleware = ?self.chain.names(),
            "server listening"
        );

        let server = Arc::new(self);
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                server.serve_connection(stream, peer).await;
            });
        }
    }

    async fn serve_connection(self: Arc<Self>, stream: tokio::net::TcpStream, peer: SocketAddr) {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let service = service_fn(move |req| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(req, peer).await) }
        });

        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            tracing::debug!(peer = %peer, error = %e, "connection closed with error");
        }
    }

    /// Process one request through the pipeline.
    async fn handle_request(
        &self,
        req: http::Request<Incoming>,
        peer: SocketAddr,
    ) -> http::Response<Full<Bytes>> {
        let version = req.version();
        let (parts, body) = req.into_parts();

        let body = match Limited::new(body, self.config.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "failed to read request body");
                return into_http(Response::empty(StatusCode::PAYLOAD_TOO_LARGE));
            }
        };

        let request = Request::from(http::Request::from_parts(parts, body));
        let mut ctx = Context::builder(peer.ip())
            .http_version(HttpVersion::from_http(version))
            .build();

        // Request pass of the chain: the rewrite stage substitutes the URI
        // here, before any routing has looked at it.
        let request = match self.chain.process_request(request, &mut ctx) {
            MiddlewareResult::Next(req) => req,
            MiddlewareResult::Stop(res) => {
                let res = self.chain.process_response(res, &ctx);
                return into_http(apply_context_headers(res, &ctx));
            }
        };

        let res = self.dispatcher.dispatch(request, &mut ctx).await;
        let res = self.chain.process_response(res, &ctx);

        into_http(apply_context_headers(res, &ctx))
    }
}

/// Merge headers queued in the context into the response.
fn apply_context_headers(mut res: Response, ctx: &Context) -> Response {
    for (name, value) in ctx.response_headers() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            res.headers_mut().insert(name, value);
        }
    }
    res
}

/// Convert the core response into hyper's body type.
fn into_http(res: Response) -> http::Response<Full<Bytes>> {
    let http_res: http::Response<Bytes> = res.into();
    http_res.map(Full::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_apply_context_headers() {
        let mut ctx = Context::new(
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            "trace".to_string(),
            "span".to_string(),
        );
        ctx.set_response_header("X-Request-Id", "abc");

        let res = apply_context_headers(Response::ok("body"), &ctx);
        assert_eq!(res.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn test_into_http_preserves_status_and_body() {
        let res = Response::ok("payload").with_header("x-test", "1");
        let http_res = into_http(res);
        assert_eq!(http_res.status(), StatusCode::OK);
        assert_eq!(http_res.headers().get("x-test").unwrap(), "1");
    }
}
