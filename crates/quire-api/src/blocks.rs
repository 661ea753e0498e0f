//! Block records of a linear document.
//!
//! [`Block`] and [`ListItemContent`] are closed sums over the block kinds this
//! crate understands, plus an explicit [`UnknownBlock`] arm that keeps the raw
//! payload of anything newer.

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smol_str::SmolStr;

use crate::blob::{AspectRatio, Blob};
use crate::error::{DecodeError, json_kind};
use crate::facet::Facet;
use crate::nsid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub plaintext: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

impl Paragraph {
    pub fn new(plaintext: impl Into<String>, facets: Vec<Facet>) -> Self {
        Self {
            plaintext: plaintext.into(),
            facets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub plaintext: String,
    #[serde(default = "default_level", deserialize_with = "heading_level")]
    pub level: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

fn default_level() -> u8 {
    1
}

fn heading_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let level = u8::deserialize(deserializer)?;
    if (1..=6).contains(&level) {
        Ok(level)
    } else {
        Err(D::Error::invalid_value(
            Unexpected::Unsigned(level.into()),
            &"a heading level from 1 to 6",
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub plaintext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(
        default,
        rename = "syntaxHighlightingTheme",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub plaintext: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct List {
    pub children: Vec<ListItem>,
}

impl List {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::expected_object("block", &value));
        };
        Ok(Self {
            children: list_items(map.remove("children"))?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizontalRule {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image: Blob,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

/// A block or list-item payload whose `$type` is not one this crate knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlock {
    pub type_tag: Option<SmolStr>,
    pub data: Value,
}

impl UnknownBlock {
    pub fn type_discriminator(&self) -> &str {
        self.type_tag.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    Code(Code),
    Quote(Quote),
    List(List),
    Rule(HorizontalRule),
    Image(Image),
    Unknown(UnknownBlock),
}

impl Block {
    pub fn type_tag(&self) -> &str {
        match self {
            Block::Paragraph(_) => nsid::TEXT,
            Block::Heading(_) => nsid::HEADER,
            Block::Code(_) => nsid::CODE,
            Block::Quote(_) => nsid::BLOCKQUOTE,
            Block::List(_) => nsid::UNORDERED_LIST,
            Block::Rule(_) => nsid::HORIZONTAL_RULE,
            Block::Image(_) => nsid::IMAGE,
            Block::Unknown(unknown) => unknown.type_discriminator(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::expected_object("block", &value));
        }
        let tag = type_tag_of(&value);
        let block = match tag.as_deref() {
            Some(nsid::TEXT) => Block::Paragraph(decode(nsid::TEXT, value)?),
            Some(nsid::HEADER) => Block::Heading(decode(nsid::HEADER, value)?),
            Some(nsid::CODE) => Block::Code(decode(nsid::CODE, value)?),
            Some(nsid::BLOCKQUOTE) => Block::Quote(decode(nsid::BLOCKQUOTE, value)?),
            Some(nsid::UNORDERED_LIST) => Block::List(List::from_value(value)?),
            Some(nsid::HORIZONTAL_RULE) => Block::Rule(HorizontalRule {}),
            Some(nsid::IMAGE) => Block::Image(decode(nsid::IMAGE, value)?),
            _ => Block::Unknown(UnknownBlock {
                type_tag: tag,
                data: value,
            }),
        };
        Ok(block)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItemContent {
    Paragraph(Paragraph),
    Heading(Heading),
    Image(Image),
    Unknown(UnknownBlock),
}

impl ListItemContent {
    pub fn type_tag(&self) -> &str {
        match self {
            ListItemContent::Paragraph(_) => nsid::TEXT,
            ListItemContent::Heading(_) => nsid::HEADER,
            ListItemContent::Image(_) => nsid::IMAGE,
            ListItemContent::Unknown(unknown) => unknown.type_discriminator(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::expected_object("content", &value));
        }
        let tag = type_tag_of(&value);
        let content = match tag.as_deref() {
            Some(nsid::TEXT) => ListItemContent::Paragraph(decode(nsid::TEXT, value)?),
            Some(nsid::HEADER) => ListItemContent::Heading(decode(nsid::HEADER, value)?),
            Some(nsid::IMAGE) => ListItemContent::Image(decode(nsid::IMAGE, value)?),
            _ => ListItemContent::Unknown(UnknownBlock {
                type_tag: tag,
                data: value,
            }),
        };
        Ok(content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: ListItemContent,
    pub children: Vec<ListItem>,
}

impl ListItem {
    pub fn new(content: ListItemContent) -> Self {
        Self {
            content,
            children: Vec::new(),
        }
    }

    /// Decodes an item and its nested children, keeping shape errors at any
    /// depth as [`DecodeError::Shape`].
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::expected_object("children", &value));
        };
        let Some(content) = map.remove("content") else {
            return Err(DecodeError::Malformed {
                type_tag: SmolStr::new_static(nsid::LIST_ITEM),
                source: serde_json::Error::missing_field("content"),
            });
        };
        Ok(Self {
            content: ListItemContent::from_value(content)?,
            children: list_items(map.remove("children"))?,
        })
    }
}

fn list_items(children: Option<Value>) -> Result<Vec<ListItem>, DecodeError> {
    match children {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.into_iter().map(ListItem::from_value).collect(),
        Some(other) => Err(DecodeError::Shape {
            field: "children",
            expected: "an array",
            found: json_kind(&other),
        }),
    }
}

impl Serialize for ListItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.children.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("ListItem", len)?;
        state.serialize_field("$type", nsid::LIST_ITEM)?;
        state.serialize_field("content", &self.content)?;
        if !self.children.is_empty() {
            state.serialize_field("children", &self.children)?;
        }
        state.end()
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "$type")]
    kind: &'static str,
    #[serde(flatten)]
    inner: &'a T,
}

fn tagged<'a, T>(kind: &'static str, inner: &'a T) -> Tagged<'a, T> {
    Tagged { kind, inner }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Paragraph(b) => tagged(nsid::TEXT, b).serialize(serializer),
            Block::Heading(b) => tagged(nsid::HEADER, b).serialize(serializer),
            Block::Code(b) => tagged(nsid::CODE, b).serialize(serializer),
            Block::Quote(b) => tagged(nsid::BLOCKQUOTE, b).serialize(serializer),
            Block::List(b) => tagged(nsid::UNORDERED_LIST, b).serialize(serializer),
            Block::Rule(b) => tagged(nsid::HORIZONTAL_RULE, b).serialize(serializer),
            Block::Image(b) => tagged(nsid::IMAGE, b).serialize(serializer),
            Block::Unknown(unknown) => unknown.data.serialize(serializer),
        }
    }
}

impl Serialize for ListItemContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListItemContent::Paragraph(b) => tagged(nsid::TEXT, b).serialize(serializer),
            ListItemContent::Heading(b) => tagged(nsid::HEADER, b).serialize(serializer),
            ListItemContent::Image(b) => tagged(nsid::IMAGE, b).serialize(serializer),
            ListItemContent::Unknown(unknown) => unknown.data.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Block::from_value(value).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for List {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        List::from_value(value).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ListItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ListItem::from_value(value).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ListItemContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ListItemContent::from_value(value).map_err(D::Error::custom)
    }
}

fn type_tag_of(value: &Value) -> Option<SmolStr> {
    value
        .get("$type")
        .and_then(Value::as_str)
        .map(SmolStr::new)
}

fn decode<T: DeserializeOwned>(type_tag: &'static str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Malformed {
        type_tag: SmolStr::new_static(type_tag),
        source,
    })
}
