use crossterm::style::Stylize;
use std::io::{self, Write};

use super::filter::EntryFilter;
use crate::feed::{to_pretty_json, Entry, Feed};

/// Terminal styling for text mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    pub colorize: bool,
}

impl Palette {
    fn label(&self, text: &str) -> String {
        if self.colorize {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.colorize {
            text.bold().yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn link(&self, text: &str) -> String {
        if self.colorize {
            text.blue().underlined().to_string()
        } else {
            text.to_string()
        }
    }

    fn index(&self, n: usize) -> String {
        let text = format!("[{n}]:");
        if self.colorize {
            text.green().to_string()
        } else {
            text
        }
    }
}

/// Prints the channel header and the filtered entries as formatted text.
///
/// Returns how many entries were printed.
pub fn render_text<W: Write>(
    out: &mut W,
    feed: &Feed,
    filter: &EntryFilter,
    palette: Palette,
) -> io::Result<usize> {
    writeln!(
        out,
        "\n{} {} - {}",
        palette.label("Channel:"),
        palette.heading(&feed.channel.title),
        palette.link(&feed.channel.link)
    )?;

    let entries = filter.apply(&feed.entries);
    for entry in &entries {
        write_entry(out, entry, palette)?;
    }
    Ok(entries.len())
}

fn write_entry<W: Write>(out: &mut W, entry: &Entry, palette: Palette) -> io::Result<()> {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    writeln!(out)?;
    writeln!(out, "{}\t{}", palette.label("Date:"), field(&entry.date))?;
    writeln!(
        out,
        "{}\t{}",
        palette.label("Title:"),
        palette.heading(&field(&entry.title))
    )?;
    writeln!(
        out,
        "{}\t{}",
        palette.label("Link:"),
        palette.link(&field(&entry.link))
    )?;
    writeln!(out, "\t{}", field(&entry.description))?;

    writeln!(out, "{}", palette.label("Links:"))?;
    for (i, url) in entry.links.iter().enumerate() {
        writeln!(out, "{}\t{}", palette.index(i + 1), palette.link(url))?;
    }
    Ok(())
}

/// Prints each filtered entry as its own indented JSON object.
///
/// The channel is never printed. Returns how many entries were printed.
pub fn render_json<W: Write>(out: &mut W, feed: &Feed, filter: &EntryFilter) -> io::Result<usize> {
    let entries = filter.apply(&feed.entries);
    for entry in &entries {
        writeln!(out, "{}", to_pretty_json(entry)?)?;
    }
    Ok(entries.len())
}
