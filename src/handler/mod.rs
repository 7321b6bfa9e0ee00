//! Request handler module
//!
//! Method validation, content resolution, and response assembly for the
//! single GET surface the server exposes.

pub mod resolver;

use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body;
use hyper::{Method, Request, Response, Version};

use crate::http::body::{DirListing, FileStream, ResponseBody};
use crate::http::response;
use crate::logger::{self, AccessLogEntry};
use crate::state::AppState;
use self::resolver::Resolved;

/// Refusal surfaced to the engine instead of a response.
///
/// hyper treats a service error as a connection-level failure: nothing is
/// queued and the connection is torn down. No resource is opened before
/// the refusal is decided.
#[derive(Debug)]
pub struct RequestRejected {
    method: Method,
}

impl fmt::Display for RequestRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported method: {}", self.method)
    }
}

impl Error for RequestRejected {}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, RequestRejected> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    if method != Method::GET {
        logger::log_warning(&format!("Refusing {method} {path}: only GET is supported"));
        return Err(RequestRejected { method });
    }

    let response = match resolver::resolve(&state.root, &path).await {
        Resolved::File { file, len } => response::build_file_response(FileStream::new(file, len)),
        Resolved::Listing(entries) => response::build_listing_response(DirListing::new(entries)),
        Resolved::Unavailable(error) => {
            logger::log_error(&format!(
                "Failed to open directory `{}': {error}",
                state.root.display()
            ));
            response::build_unavailable_response(&state.root, &error)
        }
    };

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = req.uri().query().map(ToOwned::to_owned);
        entry.http_version = version_str(req.version()).to_owned();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_value(&req, "referer");
        entry.user_agent = header_value(&req, "user-agent");
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

fn version_str(version: Version) -> &'static str {
    match version {
        v if v == Version::HTTP_09 => "0.9",
        v if v == Version::HTTP_10 => "1.0",
        v if v == Version::HTTP_2 => "2",
        v if v == Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
