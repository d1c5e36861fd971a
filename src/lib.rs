//! requests - fluent HTTP requests over cookie-carrying sessions
//!
//! A [`Session`] hands out [`Request`] builders, one per HTTP verb. A
//! builder accumulates headers, query and form parameters, a raw or JSON
//! body and file attachments, then [`Request::send`] blocks until the
//! whole [`Response`] has been read.

pub mod config;
pub mod error;
pub mod http;
pub mod utils;

pub use config::{Config, HttpMethod};
pub use error::{RequestsError, Result};
pub use http::{Request, Response, Session};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start a GET request on a shared session that keeps no cookies
pub fn get(url: &str) -> Result<Request> {
    Session::shared_default()?.get(url)
}
