use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::links::{find_urls, is_link_attribute};
use super::types::{Channel, Entry, Feed};
use crate::util::{html_to_text, strip_control_chars};

/// Errors that stop a feed from being parsed.
///
/// Both are treated as "nothing to display" by the caller rather than as
/// hard failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document has no `<channel>` element.
    #[error("No <channel> element found in feed")]
    MissingChannel,
    /// The document is not well-formed XML.
    #[error("XML parse error at byte {position}: {message}")]
    Xml { position: u64, message: String },
}

/// Item child tags that populate named [`Entry`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Title,
    Link,
    Description,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"pubDate" => Some(Self::Date),
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// A named tag whose text is being collected.
struct OpenField<F> {
    field: F,
    depth: usize,
    text: String,
}

/// Accumulates one `<item>` while its descendants stream past.
struct ItemState {
    depth: usize,
    entry: Entry,
    open: Option<OpenField<Field>>,
    /// The last visited tag has not seen a child node yet; if that child is
    /// text it gets scanned for URLs.
    awaiting_first_text: bool,
}

impl ItemState {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            entry: Entry::default(),
            open: None,
            awaiting_first_text: false,
        }
    }

    fn visit_tag(&mut self, e: &BytesStart<'_>, reader: &Reader<&[u8]>) {
        for attr in e.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping malformed attribute");
                    continue;
                }
            };
            let value = match attr.decode_and_unescape_value(reader.decoder()) {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            if is_link_attribute(&value) {
                self.entry.links.push(clean(value.trim()));
            }
        }
    }

    fn on_text(&mut self, text: &str, depth: usize) {
        if self.awaiting_first_text {
            self.awaiting_first_text = false;
            self.entry.links.extend(find_urls(text).map(clean));
        }
        if let Some(open) = self.open.as_mut() {
            if open.depth == depth {
                open.text.push_str(text);
            }
        }
    }

    fn close_field(&mut self, depth: usize) {
        if !matches!(&self.open, Some(open) if open.depth == depth) {
            return;
        }
        let Some(OpenField { field, text, .. }) = self.open.take() else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = match field {
            Field::Date => &mut self.entry.date,
            Field::Title => &mut self.entry.title,
            Field::Link => &mut self.entry.link,
            Field::Description => &mut self.entry.description,
        };
        *slot = Some(match field {
            Field::Description => clean(&html_to_text(text)),
            _ => clean(text),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Title,
    Link,
}

#[derive(Default)]
struct ChannelState {
    /// Depth of the open `<channel>`, `None` once it has closed.
    depth: Option<usize>,
    seen: bool,
    channel: Channel,
    open: Option<OpenField<HeaderField>>,
}

fn clean(s: &str) -> String {
    strip_control_chars(s).into_owned()
}

/// Parses raw RSS markup into a [`Feed`].
///
/// The channel title and link are taken verbatim from the `<channel>`'s
/// direct children. Every `<item>` becomes an [`Entry`]: `pubDate`, `title`,
/// `link` and `description` fill the named fields (last occurrence wins),
/// text of any other tag is dropped. Links are gathered from every
/// descendant tag of the item: attribute values that contain an http(s) URL,
/// then URL-shaped substrings of the tag's first text node.
///
/// Tag names match exactly, so prefixed tags such as `media:title` never
/// fill named fields.
///
/// # Errors
///
/// - [`ParseError::MissingChannel`] if there is no `<channel>` element
/// - [`ParseError::Xml`] if the document is not well-formed
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, ParseError> {
    // Text events are not trimmed: a tag mixing plain text and CDATA must keep
    // the whitespace between the pieces. Assembled field text is trimmed once.
    let mut reader = Reader::from_reader(bytes);

    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut channel = ChannelState::default();
    let mut item: Option<ItemState> = None;
    let mut entries = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| ParseError::Xml {
            position: reader.error_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                let name = name.as_ref();

                if let Some(state) = item.as_mut() {
                    state.visit_tag(&e, &reader);
                    state.awaiting_first_text = true;
                    if state.open.is_none() {
                        if let Some(field) = Field::from_tag(name) {
                            state.open = Some(OpenField {
                                field,
                                depth,
                                text: String::new(),
                            });
                        }
                    }
                } else if name == b"item" {
                    item = Some(ItemState::new(depth));
                } else if name == b"channel" && !channel.seen {
                    channel.seen = true;
                    channel.depth = Some(depth);
                } else if channel.depth == Some(depth - 1) && channel.open.is_none() {
                    let field = match name {
                        b"title" => Some(HeaderField::Title),
                        b"link" => Some(HeaderField::Link),
                        _ => None,
                    };
                    channel.open = field.map(|field| OpenField {
                        field,
                        depth,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = name.as_ref();

                if let Some(state) = item.as_mut() {
                    state.awaiting_first_text = false;
                    state.visit_tag(&e, &reader);
                } else if name == b"item" {
                    entries.push(Entry::default());
                } else if name == b"channel" && !channel.seen {
                    channel.seen = true;
                }
            }
            Event::Text(t) => {
                let raw = decode(&reader, &t);
                let text = match unescape(&raw) {
                    Ok(text) => text.into_owned(),
                    // Entities such as &nbsp; are not XML builtins; keep the raw text
                    Err(_) => raw,
                };
                handle_text(&text, depth, item.as_mut(), &mut channel);
            }
            Event::CData(c) => {
                let text = decode(&reader, &c);
                handle_text(&text, depth, item.as_mut(), &mut channel);
            }
            Event::End(_) => {
                if let Some(mut state) = item.take() {
                    state.awaiting_first_text = false;
                    state.close_field(depth);
                    if state.depth == depth {
                        entries.push(state.entry);
                    } else {
                        item = Some(state);
                    }
                } else {
                    if matches!(&channel.open, Some(open) if open.depth == depth) {
                        if let Some(open) = channel.open.take() {
                            let value = clean(open.text.trim());
                            match open.field {
                                HeaderField::Title => channel.channel.title = value,
                                HeaderField::Link => channel.channel.link = value,
                            }
                        }
                    }
                    if channel.depth == Some(depth) {
                        channel.depth = None;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !channel.seen {
        return Err(ParseError::MissingChannel);
    }

    tracing::debug!(
        title = %channel.channel.title,
        entries = entries.len(),
        "Parsed feed"
    );

    Ok(Feed {
        channel: channel.channel,
        entries,
    })
}

/// Decodes raw event bytes with the document's declared encoding.
fn decode(reader: &Reader<&[u8]>, bytes: &[u8]) -> String {
    match reader.decoder().decode(bytes) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn handle_text(text: &str, depth: usize, item: Option<&mut ItemState>, channel: &mut ChannelState) {
    if let Some(state) = item {
        state.on_text(text, depth);
    } else if let Some(open) = channel.open.as_mut() {
        if open.depth == depth {
            open.text.push_str(text);
        }
    }
}
