//! Integration tests for a full run: fetch, cache, parse, export, present.
//!
//! Each test serves a feed from its own mock server and uses its own
//! temporary cache directory.

use pretty_assertions::assert_eq;
use rss_reader::app::{run, Outcome, RunError, RunOptions};
use rss_reader::feed::{read_json, FetchError, Fetcher};
use rss_reader::output::EntryFilter;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
    <title>Mock News</title>
    <link>https://mock.example.com/</link>
    <item>
        <title>Morning</title>
        <link>https://mock.example.com/morning</link>
        <pubDate>Fri, 01 Jan 2021 08:00:00 +0000</pubDate>
        <description>&lt;b&gt;Early&lt;/b&gt; news, see https://mock.example.com/extra</description>
    </item>
    <item>
        <title>Evening</title>
        <link>https://mock.example.com/evening</link>
        <pubDate>Sat, 02 Jan 2021 20:00:00 +0000</pubDate>
        <description>Late news</description>
        <enclosure url="https://cdn.example.com/evening.mp3" type="audio/mpeg"/>
    </item>
    <item>
        <title>Undated</title>
    </item>
</channel>
</rss>"#;

fn fetcher() -> Fetcher {
    Fetcher::with_client(reqwest::Client::new(), Duration::from_secs(5), 1024 * 1024)
}

fn options(source: String, cache_dir: &Path) -> RunOptions {
    RunOptions {
        source,
        json: false,
        filter: EntryFilter::default(),
        colorize: false,
        offline: false,
        cache_dir: cache_dir.to_path_buf(),
    }
}

async fn serve(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

async fn run_to_string(options: &RunOptions) -> (Result<Outcome, RunError>, String) {
    let mut out = Vec::new();
    let result = run(options, &fetcher(), &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

// ============================================================================
// Text mode
// ============================================================================

#[tokio::test]
async fn test_text_run_prints_all_entries_and_caches() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    let opts = options(format!("{}/rss", server.uri()), cache.path());

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 3 });
    assert!(output.starts_with("\nChannel: Mock News - https://mock.example.com/\n"));
    assert!(output.contains("Title:\tMorning"));
    assert!(output.contains("\tEarly news, see https://mock.example.com/extra"));
    assert!(output.contains("[1]:\thttps://mock.example.com/evening"));
    assert!(output.contains("[2]:\thttps://cdn.example.com/evening.mp3"));

    let cached = std::fs::read_to_string(cache.path().join("127.0.0.1.xml")).unwrap();
    assert_eq!(cached, FEED);
}

#[tokio::test]
async fn test_limit_below_count_truncates() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    let mut opts = options(format!("{}/rss", server.uri()), cache.path());
    opts.filter.limit = Some(2);

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 2 });
    assert!(output.contains("Title:\tEvening"));
    assert!(!output.contains("Title:\tUndated"));
}

#[tokio::test]
async fn test_limit_above_count_shows_all() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    let mut opts = options(format!("{}/rss", server.uri()), cache.path());
    opts.filter.limit = Some(10);

    let (result, _) = run_to_string(&opts).await;
    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 3 });
}

#[tokio::test]
async fn test_date_filter_keeps_matching_day() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    let mut opts = options(format!("{}/rss", server.uri()), cache.path());
    opts.filter.date = chrono::NaiveDate::from_ymd_opt(2021, 1, 2);

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 1 });
    assert!(output.contains("Title:\tEvening"));
    assert!(!output.contains("Title:\tMorning"));
    assert!(!output.contains("Title:\tUndated"));
}

// ============================================================================
// JSON mode
// ============================================================================

#[tokio::test]
async fn test_json_run_exports_and_prints_entries_only() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    let mut opts = options(format!("{}/rss", server.uri()), cache.path());
    opts.json = true;
    opts.filter.limit = Some(1);

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 1 });
    assert!(output.starts_with("{\n    \"Date\": \"Fri, 01 Jan 2021 08:00:00 +0000\""));
    assert!(!output.contains("Mock News"));
    assert!(!output.contains("Evening"));

    let exported = read_json(&cache.path().join("Mock News.json")).await.unwrap();
    assert_eq!(exported.channel.title, "Mock News");
    let titles: Vec<_> = exported
        .entries
        .iter()
        .map(|e| e.title.clone().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Morning", "Evening", "Undated"]);
}

#[tokio::test]
async fn test_json_export_failure_displays_nothing_without_aborting() {
    let server = serve(FEED, 200).await;
    let cache = tempfile::tempdir().unwrap();
    // A directory where the export file belongs: writing and reading it both fail
    std::fs::create_dir(cache.path().join("Mock News.json")).unwrap();
    let mut opts = options(format!("{}/rss", server.uri()), cache.path());
    opts.json = true;

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::Displayed { entries: 0 });
    assert!(output.is_empty());
    assert!(cache.path().join("127.0.0.1.xml").is_file());
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_fetch_failure_falls_back_to_cache() {
    let cache = tempfile::tempdir().unwrap();

    let good = serve(FEED, 200).await;
    let opts = options(format!("{}/rss", good.uri()), cache.path());
    let (first, fresh_output) = run_to_string(&opts).await;
    first.unwrap();

    // Same host, so the same cache key; this time the server fails
    let bad = serve("oops", 500).await;
    let opts = options(format!("{}/rss", bad.uri()), cache.path());
    let (second, cached_output) = run_to_string(&opts).await;

    assert_eq!(second.unwrap(), Outcome::Displayed { entries: 3 });
    assert_eq!(cached_output, fresh_output);
}

#[tokio::test]
async fn test_fetch_failure_without_cache_is_error() {
    let server = serve("missing", 404).await;
    let cache = tempfile::tempdir().unwrap();
    let opts = options(format!("{}/rss", server.uri()), cache.path());

    let (result, output) = run_to_string(&opts).await;

    assert!(matches!(
        result,
        Err(RunError::Fetch(FetchError::NotFound(_)))
    ));
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_offline_without_cache_has_nothing_to_display() {
    let cache = tempfile::tempdir().unwrap();
    let mut opts = options("https://never-fetched.example.com/rss".into(), cache.path());
    opts.offline = true;

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::NothingToDisplay);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_missing_channel_has_nothing_to_display() {
    let server = serve("<html><body>Not a feed</body></html>", 200).await;
    let cache = tempfile::tempdir().unwrap();
    let opts = options(format!("{}/rss", server.uri()), cache.path());

    let (result, output) = run_to_string(&opts).await;

    assert_eq!(result.unwrap(), Outcome::NothingToDisplay);
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_invalid_source_is_rejected() {
    let cache = tempfile::tempdir().unwrap();
    let opts = options("ftp://example.com/rss".into(), cache.path());

    let (result, _) = run_to_string(&opts).await;
    assert!(matches!(result, Err(RunError::InvalidSource(_))));
}
