//! Common utilities shared by the playback and agent commands

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Join a base URL and a query string, inserting `?` only when needed
pub fn with_query(url: &str, query: Option<&str>) -> String {
    match query.map(str::trim) {
        None | Some("") => url.to_string(),
        Some(q) if q.starts_with('?') => format!("{}{}", url, q),
        Some(q) => format!("{}?{}", url, q),
    }
}
