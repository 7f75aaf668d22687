//! Built-in handlers for the extension dispatcher.

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::core::{Context, Request, Response};

use super::dispatch::Handler;

/// Routed request information derived from the rewritten URL.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RouteInfo {
    /// Controller name: the path segment before the action, or "home" for
    /// requests routed at the root.
    pub controller: String,
    /// Action name: the last path segment with the routing extension removed.
    pub action: String,
    /// Query string, verbatim as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// The client-visible URL when the rewrite stage changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten_from: Option<String>,
}

/// Application handler answering routing extension requests.
///
/// Resolves `/controller/action.<ext>` URLs and replies with the derived
/// route as JSON. Path segments are percent-decoded for the reply; the
/// routing itself still operates on raw bytes.
pub struct RouteInfoHandler {
    extension: String,
}

impl RouteInfoHandler {
    /// Create a handler for the given extension (without the leading dot).
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Derive controller/action from a routed path.
    fn route_for(&self, path: &str) -> (String, String) {
        let trimmed = path.strip_prefix('/').unwrap_or(path);

        // Drop the routing extension from the last segment.
        let suffix = format!(".{}", self.extension);
        let without_ext = trimmed.strip_suffix(suffix.as_str()).unwrap_or(trimmed);

        let mut segments: Vec<String> = without_ext
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();

        let action = match segments.pop() {
            Some(action) => action,
            None => return ("home".to_string(), "index".to_string()),
        };

        let controller = if segments.is_empty() {
            "home".to_string()
        } else {
            segments.join("/")
        };

        (controller, action)
    }
}

#[async_trait]
impl Handler for RouteInfoHandler {
    fn name(&self) -> &'static str {
        "route_info"
    }

    async fn handle(&self, req: Request, ctx: &mut Context) -> Response {
        let (controller, action) = self.route_for(req.path());

        let info = RouteInfo {
            controller,
            action,
            query: req.query().map(str::to_string),
            rewritten_from: ctx.rewritten_from.clone(),
        };

        match serde_json::to_vec(&info) {
            Ok(body) => Response::builder().json().body(body).build(),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize route info");
                Response::internal_error("route serialization failed")
            }
        }
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
    fn test_route_for_controller_action() {
        let handler = RouteInfoHandler::new("rails");
        assert_eq!(
            handler.route_for("/home/index.rails"),
            ("home".to_string(), "index".to_string())
        );
        assert_eq!(
            handler.route_for("/admin/users/list.rails"),
            ("admin/users".to_string(), "list".to_string())
        );
    }

    #[test]
    fn test_route_for_root_paths() {
        let handler = RouteInfoHandler::new("rails");
        // "/index.rails" is the rewritten root request.
        assert_eq!(
            handler.route_for("/index.rails"),
            ("home".to_string(), "index".to_string())
        );
        assert_eq!(
            handler.route_for("/products.rails"),
            ("home".to_string(), "products".to_string())
        );
    }

    #[test]
    fn test_route_for_percent_decodes_segments() {
        let handler = RouteInfoHandler::new("rails");
        assert_eq!(
            handler.route_for("/my%20area/new%20item.rails"),
            ("my area".to_string(), "new item".to_string())
        );
    }

    #[test]
    fn test_handle_returns_json_route() {
        let handler = RouteInfoHandler::new("rails");
        let mut ctx = create_context();
        ctx.rewritten_from = Some("/home/index".to_string());

        let res = tokio_test::block_on(
            handler.handle(create_request("/home/index.rails?id=1"), &mut ctx),
        );

        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));

        let info: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(info["controller"], "home");
        assert_eq!(info["action"], "index");
        assert_eq!(info["query"], "id=1");
        assert_eq!(info["rewritten_from"], "/home/index");
    }

    #[test]
    fn test_handle_omits_absent_fields() {
        let handler = RouteInfoHandler::new("rails");
        let mut ctx = create_context();

        let res =
            tokio_test::block_on(handler.handle(create_request("/about.rails"), &mut ctx));

        let info: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert!(info.get("query").is_none());
        assert!(info.get("rewritten_from").is_none());
    }
}
