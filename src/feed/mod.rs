//! Feed retrieval, caching, parsing and JSON export.
//!
//! - **Fetching**: a single HTTP GET with timeout and body size limit
//! - **Caching**: raw markup stored per host, used when a fetch fails
//! - **Parsing**: tag scanning over RSS markup into a [`Feed`]
//! - **Export**: the feed as a JSON array, channel first
//!
//! # Example
//!
//! ```ignore
//! use rss_reader::feed::{parse_feed, FeedCache, Fetcher};
//!
//! let bytes = fetcher.fetch(&url).await?;
//! cache.write("example.com", &bytes).await?;
//! let feed = parse_feed(&bytes)?;
//! ```

mod cache;
mod export;
mod fetcher;
mod links;
mod parser;
mod types;

pub use cache::{CacheError, FeedCache};
pub use export::{read_json, to_pretty_json, write_json, ExportError};
pub use fetcher::{FetchError, Fetcher};
pub use links::find_urls;
pub use parser::{parse_feed, ParseError};
pub use types::{Channel, Entry, Feed};
