//! HTTP response building module
//!
//! Provides builders for the server's responses, decoupled from the
//! filesystem logic. Every response carries `Date`, `Connection: close`,
//! `Content-Type` and a `Content-Length` matching the body.

use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Current time as an RFC 7231 HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Common response skeleton: status, `Date`, `Connection: close`
fn base(status: StatusCode) -> hyper::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Date", http_date())
        .header("Connection", "close")
}

/// Build 200 OK with file content and the extension-derived Content-Type
pub fn build_file_response(content: Vec<u8>, content_type: &'static str) -> Response<Full<Bytes>> {
    let content_length = content.len();
    base(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain-text response; the body is the message plus a trailing newline
pub fn build_text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = format!("{message}\n");
    base(status)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request response (malformed percent-encoding)
pub fn build_400_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::BAD_REQUEST, "400 Bad Request")
}

/// Build 403 Forbidden response (directory-traversal attempt)
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::FORBIDDEN, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let body = "405 Method Not Allowed\n";
    base(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", body.len())
        .header("Allow", "GET, PUT, DELETE")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 500 Internal Server Error response; detail stays in the server log
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build the empty-bodied PUT success response: 201 for a new file,
/// 200 for an overwrite
pub fn build_put_success_response(created: bool) -> Response<Full<Bytes>> {
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    base(status)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 204 No Content response with an explicit `Content-Length: 0`
pub fn build_204_response() -> Response<Full<Bytes>> {
    base(StatusCode::NO_CONTENT)
        .header("Content-Type", TEXT_PLAIN)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_common_headers(resp: &Response<Full<Bytes>>) {
        assert!(resp.headers().contains_key("Date"));
        assert_eq!(resp.headers()["Connection"], "close");
        assert!(resp.headers().contains_key("Content-Type"));
        assert!(resp.headers().contains_key("Content-Length"));
    }

    #[test]
    fn file_response_has_length_and_type() {
        let resp = build_file_response(b"hello".to_vec(), "text/plain; charset=utf-8");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_common_headers(&resp);
        assert_eq!(resp.headers()["Content-Length"], "5");
    }

    #[test]
    fn error_bodies_end_in_newline() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_common_headers(&resp);
        assert_eq!(resp.headers()["Content-Length"], "14");
        assert_eq!(resp.headers()["Content-Type"], TEXT_PLAIN);
    }

    #[test]
    fn method_not_allowed_lists_supported_verbs() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, PUT, DELETE");
        assert_common_headers(&resp);
    }

    #[test]
    fn put_success_statuses() {
        assert_eq!(build_put_success_response(true).status(), StatusCode::CREATED);
        assert_eq!(build_put_success_response(false).status(), StatusCode::OK);
        assert_eq!(
            build_put_success_response(true).headers()["Content-Length"],
            "0"
        );
    }

    #[test]
    fn no_content_has_explicit_zero_length() {
        let resp = build_204_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Content-Length"], "0");
    }

    #[test]
    fn http_date_looks_like_rfc7231() {
        let date = http_date();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), "Sun, 06 Nov 1994 08:49:37 GMT".len());
    }
}
