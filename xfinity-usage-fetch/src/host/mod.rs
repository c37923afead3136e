//! Host APIs used by the usage fetcher.
//!
//! - [`http`] - Cookie-bearing HTTP session with tracing and domain allowlist

pub mod http;

// Re-export key types
pub use http::HttpSession;
