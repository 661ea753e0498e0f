//! Image discovery and resolution.
//!
//! Conversion resolves images before any block is built: every reference in
//! the tree is gathered, each distinct reference is resolved exactly once, and
//! block construction only reads the resulting table.

mod resolver;

pub use resolver::{BlobImageResolver, BlobUploader, DigestUploader};

use std::collections::HashMap;
use std::path::Path;

use quire_api::{AspectRatio, Blob, BlobRef, Image};
use smol_str::SmolStr;

use crate::error::{ConvertError, ResolveError};
use crate::tree::Node;

/// What a resolver learned about one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub blob: BlobRef,
    pub size: u64,
    pub mime_type: SmolStr,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn to_blob(&self) -> Blob {
        Blob {
            reference: self.blob.clone(),
            mime_type: self.mime_type.clone(),
            size: self.size,
        }
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_dimensions(self.width, self.height)
    }
}

/// Turns an image reference (a path or URL) into blob metadata.
///
/// Relative paths have already been joined onto the converter's base path by
/// the time they reach the resolver.
pub trait ImageResolver {
    fn resolve(&self, reference: &str) -> Result<ImageInfo, ResolveError>;
}

impl<R: ImageResolver + ?Sized> ImageResolver for &R {
    fn resolve(&self, reference: &str) -> Result<ImageInfo, ResolveError> {
        (**self).resolve(reference)
    }
}

impl<R: ImageResolver + ?Sized> ImageResolver for Box<R> {
    fn resolve(&self, reference: &str) -> Result<ImageInfo, ResolveError> {
        (**self).resolve(reference)
    }
}

/// Resolved images keyed by the reference string as written in the markup.
#[derive(Debug, Default)]
pub(crate) struct ImageCatalog {
    resolved: HashMap<String, ImageInfo>,
}

impl ImageCatalog {
    /// Resolves every distinct image reference in `tree`. The first failure
    /// aborts the whole build.
    #[tracing::instrument(skip_all)]
    pub fn build<R: ImageResolver + ?Sized>(
        tree: &Node,
        resolver: &R,
        base_path: Option<&Path>,
    ) -> Result<Self, ConvertError> {
        let references = tree.image_references();
        let mut resolved = HashMap::with_capacity(references.len());

        for reference in references {
            if resolved.contains_key(reference) {
                continue;
            }
            let location = locate(reference, base_path);
            tracing::debug!(reference, location = %location, "resolving image");
            let info = resolver.resolve(&location).map_err(|source| {
                ConvertError::ImageResolution {
                    reference: reference.to_string(),
                    source,
                }
            })?;
            resolved.insert(reference.to_string(), info);
        }

        tracing::debug!(count = resolved.len(), "resolved images");
        Ok(Self { resolved })
    }

    pub fn get(&self, reference: &str) -> Option<&ImageInfo> {
        self.resolved.get(reference)
    }

    /// Builds the image block for `reference`, falling back to the
    /// placeholder blob when it was never resolved.
    pub fn image_block(&self, reference: &str, alt: Option<String>) -> Image {
        match self.get(reference) {
            Some(info) => Image {
                image: info.to_blob(),
                alt,
                aspect_ratio: info.aspect_ratio(),
            },
            None => Image {
                image: Blob::placeholder(),
                alt,
                aspect_ratio: AspectRatio::SQUARE,
            },
        }
    }
}

/// Joins a relative path reference onto `base_path`. URLs and absolute
/// paths pass through unchanged.
pub(crate) fn locate(reference: &str, base_path: Option<&Path>) -> String {
    match base_path {
        Some(base) if !is_url(reference) && Path::new(reference).is_relative() => {
            base.join(reference).to_string_lossy().into_owned()
        }
        _ => reference.to_string(),
    }
}

pub(crate) fn is_url(reference: &str) -> bool {
    url::Url::parse(reference).is_ok_and(|url| url.scheme().len() > 1)
}
