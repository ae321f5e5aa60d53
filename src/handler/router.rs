//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution, and per-verb dispatch into the filesystem operations.

use crate::config::AppState;
use crate::handler::files;
use crate::http;
use crate::logger;
use crate::resolve::{self, ResolveError};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling.
///
/// Unsupported methods are answered 405 before any path resolution or
/// filesystem access; for supported methods a resolver rejection (400/403)
/// short-circuits before any filesystem access. Generic over the body type
/// so the server can pass `hyper::body::Incoming` while tests drive it with
/// `Full<Bytes>`.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    let access_log = state.config.logging.access_log;

    if access_log {
        logger::log_request(&method, &uri, req.version());
    }

    // 1. Method gate: no filesystem work for unsupported verbs
    if !matches!(method, Method::GET | Method::PUT | Method::DELETE) {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(http::build_405_response());
    }

    // 2. Declared body size gate for writes
    if method == Method::PUT {
        if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
            return Ok(resp);
        }
    }

    // 3. Confine the request path to the served root
    let resolved = match resolve::resolve(&state.root, uri.path(), &state.config.files.index) {
        Ok(path) => path,
        Err(ResolveError::BadRequest) => {
            logger::log_warning(&format!("Malformed request path: {}", uri.path()));
            return Ok(http::build_400_response());
        }
        Err(ResolveError::Forbidden) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", uri.path()));
            return Ok(http::build_403_response());
        }
    };

    // 4. Dispatch to the filesystem operation
    let response = match method {
        Method::GET => files::get(&resolved).await,
        Method::PUT => files::put(&resolved, req.into_body()).await,
        Method::DELETE => files::delete(&resolved).await,
        // Gated above
        _ => http::build_405_response(),
    };

    if access_log {
        logger::log_response(response.status().as_u16(), content_length_of(&response));
    }

    Ok(response)
}

/// Validate the declared Content-Length against the configured maximum and
/// return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Body size for the access log, taken from the Content-Length header
fn content_length_of(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
