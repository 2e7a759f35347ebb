//! A small command-line RSS reader.
//!
//! Fetches a feed, caches the raw markup per host, scans it into a channel
//! header and entries, optionally exports the result as JSON, and prints it
//! as text or JSON with limit and date filters. See [`app::run`].
//!
//! The crate also carries [`exercises`], a handful of standalone string and
//! number utilities.

pub mod app;
pub mod config;
pub mod exercises;
pub mod feed;
pub mod output;
pub mod util;
