use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Range;

/// Half-open `[byte_start, byte_end)` range over the UTF-8 bytes of a block's plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteRange {
    pub byte_start: usize,
    pub byte_end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            byte_start: start,
            byte_end: end,
        }
    }

    pub fn to_range(self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    pub fn is_empty(&self) -> bool {
        self.byte_start >= self.byte_end
    }

    pub fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    pub fn start(&self) -> usize {
        self.byte_start
    }

    pub fn end(&self) -> usize {
        self.byte_end
    }

    /// True when the range lies inside a text of `len` bytes.
    pub fn fits(&self, len: usize) -> bool {
        self.byte_start <= self.byte_end && self.byte_end <= len
    }
}

impl From<Range<usize>> for ByteRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Feature {
    #[serde(rename = "pub.leaflet.richtext.facet#bold")]
    Bold,
    #[serde(rename = "pub.leaflet.richtext.facet#italic")]
    Italic,
    #[serde(rename = "pub.leaflet.richtext.facet#code")]
    Code,
    #[serde(rename = "pub.leaflet.richtext.facet#strikethrough")]
    Strikethrough,
    #[serde(rename = "pub.leaflet.richtext.facet#underline")]
    Underline,
    #[serde(rename = "pub.leaflet.richtext.facet#highlight")]
    Highlight,
    #[serde(rename = "pub.leaflet.richtext.facet#link")]
    #[serde(alias = "app.bsky.richtext.facet#link")]
    Link { uri: String },
}

impl Feature {
    const KNOWN_TAGS: &'static [&'static str] = &[
        "pub.leaflet.richtext.facet#bold",
        "pub.leaflet.richtext.facet#italic",
        "pub.leaflet.richtext.facet#code",
        "pub.leaflet.richtext.facet#strikethrough",
        "pub.leaflet.richtext.facet#underline",
        "pub.leaflet.richtext.facet#highlight",
        "pub.leaflet.richtext.facet#link",
        "app.bsky.richtext.facet#link",
    ];

    pub fn link(uri: impl Into<String>) -> Self {
        Self::Link { uri: uri.into() }
    }

    pub fn is_known_tag(tag: &str) -> bool {
        Self::KNOWN_TAGS.contains(&tag)
    }
}

/// A styled byte range over a block's plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub index: ByteRange,
    #[serde(deserialize_with = "lenient_features")]
    pub features: Vec<Feature>,
}

impl Facet {
    pub fn new(range: impl Into<ByteRange>, features: Vec<Feature>) -> Self {
        Self {
            index: range.into(),
            features,
        }
    }
}

/// Features with a `$type` this crate does not know are dropped. A known
/// feature with a bad payload is still an error.
fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let mut features = Vec::with_capacity(raw.len());
    for value in raw {
        let known = value
            .get("$type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(Feature::is_known_tag);
        if known {
            features.push(serde_json::from_value(value).map_err(D::Error::custom)?);
        }
    }
    Ok(features)
}
