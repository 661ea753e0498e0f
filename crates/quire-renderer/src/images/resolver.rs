use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use quire_api::BlobRef;
use smol_str::SmolStr;

use super::{ImageInfo, ImageResolver, is_url};
use crate::error::{BoxError, ResolveError};

/// Stores image bytes somewhere and returns their blob identity.
pub trait BlobUploader {
    fn upload_blob(&self, bytes: Bytes, mime_type: &str) -> Result<BlobRef, BoxError>;
}

impl<U: BlobUploader + ?Sized> BlobUploader for &U {
    fn upload_blob(&self, bytes: Bytes, mime_type: &str) -> Result<BlobRef, BoxError> {
        (**self).upload_blob(bytes, mime_type)
    }
}

/// Offline uploader: the identity is the BLAKE3 hash of the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestUploader;

impl BlobUploader for DigestUploader {
    fn upload_blob(&self, bytes: Bytes, _mime_type: &str) -> Result<BlobRef, BoxError> {
        Ok(BlobRef::new(blake3::hash(&bytes).to_hex().as_str()))
    }
}

/// Loads an image from disk or over HTTP, measures it, and uploads it.
#[derive(Debug, Clone, Default)]
pub struct BlobImageResolver<U> {
    uploader: U,
}

impl<U: BlobUploader> BlobImageResolver<U> {
    pub fn new(uploader: U) -> Self {
        Self { uploader }
    }

    fn load(&self, reference: &str) -> Result<Bytes, ResolveError> {
        if is_url(reference) {
            return fetch(reference);
        }
        tracing::debug!("Reading image file: {}", reference);
        let data = std::fs::read(Path::new(reference))?;
        Ok(Bytes::from(data))
    }
}

impl<U: BlobUploader> ImageResolver for BlobImageResolver<U> {
    #[tracing::instrument(skip(self))]
    fn resolve(&self, reference: &str) -> Result<ImageInfo, ResolveError> {
        let bytes = self.load(reference)?;
        let mime_type = SmolStr::new(
            bytes
                .sniff_mime_type()
                .unwrap_or("application/octet-stream"),
        );
        let (width, height) = dimensions(&bytes)?;
        let size = bytes.len() as u64;

        tracing::debug!(
            "Uploading image blob: {} ({} bytes, {})",
            reference,
            size,
            mime_type
        );
        let blob = self
            .uploader
            .upload_blob(bytes, &mime_type)
            .map_err(ResolveError::Upload)?;

        Ok(ImageInfo {
            blob,
            size,
            mime_type,
            width,
            height,
        })
    }
}

fn dimensions(bytes: &[u8]) -> Result<(u32, u32), ResolveError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|err| ResolveError::UnknownFormat(Box::new(err)))
}

#[cfg(feature = "remote-images")]
fn fetch(url: &str) -> Result<Bytes, ResolveError> {
    let fetch_err = |err: reqwest::Error| ResolveError::Fetch {
        url: url.to_string(),
        source: Box::new(err),
    };
    tracing::debug!("Fetching image: {}", url);
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(fetch_err)
}

#[cfg(not(feature = "remote-images"))]
fn fetch(url: &str) -> Result<Bytes, ResolveError> {
    Err(ResolveError::Other(format!(
        "remote images are disabled, cannot fetch {url}"
    )))
}
