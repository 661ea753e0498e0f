//! Record model for linear rich-text documents.
//!
//! A page is an ordered list of [`Block`]s. Text-bearing blocks carry their
//! styling as [`Facet`]s: byte ranges over the UTF-8 plaintext, each with an
//! ordered list of [`Feature`]s. Every record serializes with an explicit
//! `$type` discriminator so that newer block and feature kinds survive a
//! decode/encode cycle through older code.

pub mod blob;
pub mod blocks;
pub mod document;
pub mod error;
pub mod facet;

pub use blob::{AspectRatio, Blob, BlobRef};
pub use blocks::{
    Block, Code, Heading, HorizontalRule, Image, List, ListItem, ListItemContent, Paragraph,
    Quote, UnknownBlock,
};
pub use document::{BlockEnvelope, LinearDocument};
pub use error::DecodeError;
pub use facet::{ByteRange, Facet, Feature};

/// `$type` values for the records in this crate.
pub mod nsid {
    pub const TEXT: &str = "pub.leaflet.blocks.text";
    pub const HEADER: &str = "pub.leaflet.blocks.header";
    pub const CODE: &str = "pub.leaflet.blocks.code";
    pub const BLOCKQUOTE: &str = "pub.leaflet.blocks.blockquote";
    pub const UNORDERED_LIST: &str = "pub.leaflet.blocks.unorderedList";
    pub const LIST_ITEM: &str = "pub.leaflet.blocks.unorderedList#listItem";
    pub const HORIZONTAL_RULE: &str = "pub.leaflet.blocks.horizontalRule";
    pub const IMAGE: &str = "pub.leaflet.blocks.image";
    pub const LINEAR_DOCUMENT: &str = "pub.leaflet.pages.linearDocument";
    pub const LINEAR_DOCUMENT_BLOCK: &str = "pub.leaflet.pages.linearDocument#block";
    pub const BLOB: &str = "blob";
}
