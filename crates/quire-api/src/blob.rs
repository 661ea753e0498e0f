use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Content-addressed identity of an uploaded blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct BlobRef(SmolStr);

impl BlobRef {
    pub fn new(identity: impl Into<SmolStr>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The placeholder identity carried by images that were never uploaded.
    pub fn is_placeholder(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for BlobRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlob", into = "RawBlob")]
pub struct Blob {
    pub reference: BlobRef,
    pub mime_type: SmolStr,
    pub size: u64,
}

impl Blob {
    pub const PLACEHOLDER_MIME: &'static str = "image/jpeg";

    /// Zero-byte JPEG stand-in for an image that could not be resolved.
    pub fn placeholder() -> Self {
        Self {
            reference: BlobRef::default(),
            mime_type: SmolStr::new_static(Self::PLACEHOLDER_MIME),
            size: 0,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawLink {
    #[serde(rename = "$link")]
    link: BlobRef,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlob {
    #[serde(rename = "$type", default = "blob_type")]
    kind: SmolStr,
    #[serde(rename = "ref")]
    reference: RawLink,
    mime_type: SmolStr,
    #[serde(default)]
    size: u64,
}

fn blob_type() -> SmolStr {
    SmolStr::new_static(crate::nsid::BLOB)
}

impl From<RawBlob> for Blob {
    fn from(raw: RawBlob) -> Self {
        Self {
            reference: raw.reference.link,
            mime_type: raw.mime_type,
            size: raw.size,
        }
    }
}

impl From<Blob> for RawBlob {
    fn from(blob: Blob) -> Self {
        Self {
            kind: blob_type(),
            reference: RawLink {
                link: blob.reference,
            },
            mime_type: blob.mime_type,
            size: blob.size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };

    /// Falls back to 1x1 when either dimension is unknown.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            Self::SQUARE
        } else {
            Self { width, height }
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}
