use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Feed-level header: the `<channel>`'s own title and link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Channel {
    pub title: String,
    pub link: String,
}

/// A single `<item>`.
///
/// Named fields stay `None` when the item has no such tag; they are left out
/// of the exported JSON rather than written as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    /// Raw `pubDate` text, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Plain text, HTML already stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every URL found in the item's attributes and text, in document order.
    #[serde(default)]
    pub links: Vec<String>,
}

/// A parsed feed: the channel header plus its entries in document order.
///
/// Serializes as a flat JSON array whose first element is the channel and
/// whose remaining elements are the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub channel: Channel,
    pub entries: Vec<Entry>,
}

impl Serialize for Feed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len() + 1))?;
        seq.serialize_element(&self.channel)?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Feed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(FeedVisitor)
    }
}

struct FeedVisitor;

impl<'de> Visitor<'de> for FeedVisitor {
    type Value = Feed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array holding a channel object followed by entry objects")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Feed, A::Error> {
        let channel: Channel = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;

        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<Entry>()? {
            entries.push(entry);
        }

        Ok(Feed { channel, entries })
    }
}
