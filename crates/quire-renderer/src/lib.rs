//! Quire renderer
//!
//! Converts markdown into linear rich-text documents (blocks whose styling is
//! kept as byte-range facets over plain text) and renders those documents
//! back to markdown or to an HTML preview.
//!
//! ```no_run
//! let blocks = quire_renderer::to_document("## Hello **world**")?;
//! let markdown = quire_renderer::to_markup(&blocks)?;
//! # Ok::<(), quire_renderer::ConvertError>(())
//! ```

pub mod error;
pub mod facet;
pub mod images;
pub mod leaflet;
pub mod options;
mod tree;

use std::path::Path;

use quire_api::Block;

pub use error::{BoxError, ConvertError, ResolveError};
pub use images::{BlobImageResolver, BlobUploader, DigestUploader, ImageInfo, ImageResolver};
pub use leaflet::{Converter, to_html, to_markup};
pub use options::ConvertOptions;

/// Converts markdown into blocks. Images become placeholder blobs.
pub fn to_document(markup: &str) -> Result<Vec<Block>, ConvertError> {
    Converter::default().to_document(markup)
}

/// Converts markdown into blocks, resolving each distinct image reference
/// through `resolver`. Relative references are joined onto `base_path`.
pub fn to_document_with_images(
    markup: &str,
    resolver: &dyn ImageResolver,
    base_path: Option<&Path>,
) -> Result<Vec<Block>, ConvertError> {
    let mut converter = Converter::default().with_resolver(resolver);
    if let Some(base_path) = base_path {
        converter = converter.with_base_path(base_path);
    }
    converter.to_document(markup)
}
