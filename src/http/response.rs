//! HTTP response building module
//!
//! Builders for the handful of responses the server produces, decoupled
//! from resolution logic. No Content-Type is set on file or listing
//! bodies; that is left to engine and client defaults.

use std::path::Path;

use hyper::body::Bytes;
use hyper::Response;

use super::body::{DirListing, FileStream, ResponseBody};
use crate::logger;

/// Build a 200 response streaming a regular file.
///
/// The exact size hint on [`FileStream`] makes the engine declare a
/// Content-Length equal to the file's byte length.
pub fn build_file_response(stream: FileStream) -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .body(ResponseBody::File(stream))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(ResponseBody::full(Bytes::new()))
        })
}

/// Build a 200 response streaming the root directory listing.
///
/// Total size is unknown up front, so the engine frames the body with
/// chunked transfer encoding.
pub fn build_listing_response(listing: DirListing) -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .body(ResponseBody::Listing(listing))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(ResponseBody::full(Bytes::new()))
        })
}

/// Build a 503 response for a root directory that cannot be listed,
/// carrying the underlying system error text.
pub fn build_unavailable_response(root: &Path, error: &std::io::Error) -> Response<ResponseBody> {
    let message = format!("Failed to open directory `{}': {error}\n", root.display());
    Response::builder()
        .status(503)
        .body(ResponseBody::full(Bytes::from(message.clone())))
        .unwrap_or_else(|e| {
            log_build_error("503", &e);
            Response::new(ResponseBody::full(Bytes::from(message)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::body::Body;
    use std::io;

    #[tokio::test]
    async fn file_response_is_200_with_exact_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"abcd").unwrap();
        let file = tokio::fs::File::open(&path).await.unwrap();

        let response = build_file_response(FileStream::new(file, 4));
        assert_eq!(response.status(), 200);
        assert_eq!(response.body().size_hint().exact(), Some(4));
    }

    #[tokio::test]
    async fn unavailable_response_carries_error_text() {
        let error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let response = build_unavailable_response(Path::new("/srv/files"), &error);
        assert_eq!(response.status(), 503);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("/srv/files"));
        assert!(text.contains("permission denied"));
    }
}
