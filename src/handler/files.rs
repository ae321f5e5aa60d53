//! Filesystem operations module
//!
//! Performs the per-verb filesystem work on a resolved path: read for GET,
//! buffered write for PUT, unlink for DELETE. Each operation maps I/O
//! failures to a status code at the point of call; nothing propagates past
//! the response. All I/O goes through `tokio::fs`, so a slow operation only
//! suspends its own request task.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::Response;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// GET: read the file at the resolved path.
///
/// Missing path or non-regular file is a 404; any other stat or read
/// failure (permission, race after stat) is a 500.
pub async fn get(path: &Path) -> Response<Full<Bytes>> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return http::build_404_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
            return http::build_500_response();
        }
    }

    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
            http::build_file_response(content, content_type)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// PUT: buffer the request body, then write it to the resolved path.
///
/// The parent directory must already exist (no intermediate directory
/// creation): missing parent is a 404. Whether the target already existed
/// as a regular file only decides the success status, 201 for a new file
/// and 200 for an overwrite. The body is drained fully before the write
/// begins; a body or write failure is a 500.
pub async fn put<B>(path: &Path, body: B) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let Some(parent) = path.parent() else {
        // A resolved path is always below the root, so this cannot happen;
        // fail closed rather than write to an unknown location.
        logger::log_error(&format!("PUT target has no parent: {}", path.display()));
        return http::build_500_response();
    };

    match fs::metadata(parent).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return http::build_404_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", parent.display()));
            return http::build_500_response();
        }
    }

    let existed = match fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    };

    let content = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return http::build_500_response();
        }
    };

    match fs::write(path, &content).await {
        Ok(()) => http::build_put_success_response(!existed),
        Err(e) => {
            logger::log_error(&format!("Failed to write '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// DELETE: unlink the file at the resolved path.
///
/// Missing file is a 404; any other removal failure is a 500. Success is a
/// 204 with an explicit zero Content-Length.
pub async fn delete(path: &Path) -> Response<Full<Bytes>> {
    match fs::remove_file(path).await {
        Ok(()) => http::build_204_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to remove '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}
