//! Utility functions for common operations.
//!
//! - **URL validation**: accept only http(s) feed sources and derive cache keys
//! - **Text processing**: terminal-safe text, HTML stripping, file stems
//!
//! # Examples
//!
//! ```
//! use rss_reader::util::{cache_key, sanitize_file_stem, validate_source};
//!
//! let url = validate_source("https://www.example.com/feed.xml").unwrap();
//! assert_eq!(cache_key(&url), "example.com");
//! assert_eq!(sanitize_file_stem("News/Daily"), "News_Daily");
//! ```

mod text;
mod url_validator;

pub use text::{html_to_text, sanitize_file_stem, strip_control_chars};
pub use url_validator::{cache_key, validate_source, UrlValidationError};
