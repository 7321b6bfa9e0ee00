//! HTTP layer module
//!
//! Response bodies and builders, decoupled from content resolution.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::{DirListing, FileStream, ResponseBody};
pub use response::{build_file_response, build_listing_response, build_unavailable_response};
