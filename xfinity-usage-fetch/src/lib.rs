// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Xfinity Usage Fetch
//!
//! Authenticated session handling and usage fetching for Xfinity.
//!
//! A fetch is three sequential requests on one cookie session:
//!
//! 1. GET the force-connect page and scrape the hidden `reqId` token
//! 2. POST the login form with the token and credentials
//! 3. GET the usage JSON and extract the latest month
//!
//! ## Host APIs
//!
//! - [`host::http`] - Cookie-bearing HTTP session with domain allowlist
//!
//! ## Fetching
//!
//! - [`fetcher::UsageFetcher`] - Runs the flow, keeps the last good snapshot
//! - [`source::UsageSource`] - Trait the sensor reads from
//! - [`sensor::UsageSensor`] - Name, icon, state and attributes for a host
//!
//! ## Example
//!
//! ```ignore
//! use xfinity_usage_core::Credentials;
//! use xfinity_usage_fetch::{UsageFetcher, UsageSensor};
//!
//! let fetcher = UsageFetcher::new(Credentials::new("user@example.com", password))?;
//! let mut sensor = UsageSensor::new("Xfinity Usage", fetcher);
//!
//! sensor.update().await;
//! println!("{} {}", sensor.state(), sensor.unit_of_measurement().unwrap_or(""));
//! ```

pub mod endpoints;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod login;
pub mod parser;
pub mod sensor;
pub mod source;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, HttpError};
pub use reqwest::StatusCode;

// Host APIs
pub use host::http::HttpSession;

// Fetching
pub use endpoints::XfinityEndpoints;
pub use fetcher::UsageFetcher;
pub use sensor::{DEFAULT_ICON, DEFAULT_NAME, UsageSensor};
pub use source::UsageSource;
