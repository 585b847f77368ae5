//! Utility modules supporting the news engine.
//!
//! - [`HttpClient`]: shared HTTP session (redirect-following and non-following clients)
//! - [`html_to_text`]: HTML description cleanup
//! - [`strip_publisher_suffix`]: remove ` - Publisher` from headlines
//! - [`normalize_exclude_domain`], [`parse_period`], [`validate_proxy`]: query validation
//!
//! # HTTP session
//!
//! ```rust,no_run
//! use gnews::utils::{HttpClient, HttpSettings};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), gnews::NewsError> {
//! let client = HttpClient::with_settings(HttpSettings {
//!     timeout: Duration::from_secs(10),
//!     ..HttpSettings::default()
//! })?;
//! let _request = client.get("https://news.google.com/rss");
//! # Ok(())
//! # }
//! ```

mod http;
mod text;
mod validate;

pub use http::{HttpClient, HttpSettings, DEFAULT_USER_AGENT};
pub use text::{html_to_text, strip_publisher_suffix};
pub use validate::{normalize_exclude_domain, parse_period, validate_proxy, ValidationError};
