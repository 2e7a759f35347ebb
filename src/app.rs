//! The fetch → cache → parse → export → present pipeline.
//!
//! [`run`] drives one invocation end to end. It writes rendered output to an
//! injected sink and reports everything else through `tracing`; the binary
//! only maps the returned [`Outcome`] / [`RunError`] to an exit code.

use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use crate::feed::{self, FeedCache, FetchError, Fetcher, ParseError};
use crate::output::{render_json, render_text, EntryFilter, Palette};
use crate::util::{cache_key, validate_source, UrlValidationError};

/// Errors that end a run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid source: {0}")]
    InvalidSource(#[from] UrlValidationError),
    /// The fetch failed and there was no cached copy to fall back on.
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The feed was rendered; `entries` is how many passed the filters.
    Displayed { entries: usize },
    /// No feed could be produced (no cache offline, or no `<channel>`).
    NothingToDisplay,
}

/// Options for a single run, after CLI flags and config have been merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: String,
    pub json: bool,
    pub filter: EntryFilter,
    pub colorize: bool,
    /// Skip the network and read only from the cache.
    pub offline: bool,
    pub cache_dir: PathBuf,
}

/// Runs the whole pipeline once.
///
/// - Fetch failures fall back to the cached copy; with no cache they are
///   returned as [`RunError::Fetch`].
/// - A missing cache in offline mode, or a feed without `<channel>`, ends
///   with [`Outcome::NothingToDisplay`].
/// - Export write/read failures are logged and never abort the run.
pub async fn run<W: Write>(
    options: &RunOptions,
    fetcher: &Fetcher,
    out: &mut W,
) -> Result<Outcome, RunError> {
    let url = validate_source(&options.source)?;
    let key = cache_key(&url);
    let cache = FeedCache::new(&options.cache_dir);

    let markup = if options.offline {
        read_cache(&cache, &key).await
    } else {
        match fetcher.fetch(&url).await {
            Ok(bytes) => {
                if let Err(e) = cache.write(&key, &bytes).await {
                    tracing::error!(error = %e, "Could not create an XML file");
                }
                Some(bytes)
            }
            Err(e) => {
                log_fetch_error(&e);
                match read_cache(&cache, &key).await {
                    Some(bytes) => {
                        tracing::warn!(url = %url, "Could not get new RSS feed, using cached copy");
                        Some(bytes)
                    }
                    None => return Err(RunError::Fetch(e)),
                }
            }
        }
    };

    let Some(markup) = markup else {
        tracing::warn!("No feed to display");
        return Ok(Outcome::NothingToDisplay);
    };

    tracing::info!("Scanning the XML file for feeds");
    let parsed = match feed::parse_feed(&markup) {
        Ok(parsed) => parsed,
        Err(ParseError::MissingChannel) => {
            tracing::warn!(url = %url, "No channel found in feed, nothing to display");
            return Ok(Outcome::NothingToDisplay);
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Feed could not be parsed, nothing to display");
            return Ok(Outcome::NothingToDisplay);
        }
    };

    if !options.json {
        tracing::info!("Printing out feed");
        let palette = Palette {
            colorize: options.colorize,
        };
        let entries = render_text(out, &parsed, &options.filter, palette)?;
        return Ok(Outcome::Displayed { entries });
    }

    let export_path = cache.export_path(&parsed.channel.title);
    tracing::info!(path = %export_path.display(), "Creating a JSON file for the feed contents");
    let exported = match cache.ensure_dir().await {
        Ok(()) => feed::write_json(&parsed, &export_path).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = exported {
        tracing::error!(error = %e, "Could not write to a JSON file");
    }

    tracing::info!("Displaying feed in JSON format");
    match feed::read_json(&export_path).await {
        Ok(exported) => {
            let entries = render_json(out, &exported, &options.filter)?;
            Ok(Outcome::Displayed { entries })
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not read the JSON file");
            Ok(Outcome::Displayed { entries: 0 })
        }
    }
}

async fn read_cache(cache: &FeedCache, key: &str) -> Option<Vec<u8>> {
    match cache.read(key).await {
        Ok(Some(bytes)) => Some(bytes),
        Ok(None) => {
            tracing::warn!(key = %key, "No cache for this channel found");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not read the XML file");
            None
        }
    }
}

fn log_fetch_error(e: &FetchError) {
    match e {
        FetchError::NotFound(url) => tracing::error!(url = %url, "No RSS found"),
        FetchError::Network(err) => tracing::error!(error = %err, "Connection error"),
        other => tracing::error!(error = %other, "Feed fetch failed"),
    }
}
