use miette::Diagnostic;
use quire_api::DecodeError;
use smol_str::SmolStr;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("markup could not be parsed at byte {offset}: {message}")]
    #[diagnostic(code(quire::convert::markup_parse))]
    MarkupParse { message: String, offset: usize },

    #[error("failed to resolve image {reference}")]
    #[diagnostic(code(quire::convert::image_resolution))]
    ImageResolution {
        reference: String,
        #[source]
        source: ResolveError,
    },

    #[error("unsupported block type: {type_tag}")]
    #[diagnostic(code(quire::convert::unsupported_block))]
    UnsupportedBlock { type_tag: SmolStr },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),
}

impl ConvertError {
    pub(crate) fn unsupported(type_tag: &str) -> Self {
        Self::UnsupportedBlock {
            type_tag: SmolStr::new(type_tag),
        }
    }
}

/// Errors produced by an [`ImageResolver`](crate::images::ImageResolver).
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("io error: {0}")]
    #[diagnostic(code(quire::resolve::io))]
    Io(#[from] std::io::Error),

    #[error("failed to fetch {url}")]
    #[diagnostic(code(quire::resolve::fetch))]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("unrecognized image format")]
    #[diagnostic(code(quire::resolve::unknown_format))]
    UnknownFormat(#[source] BoxError),

    #[error("blob upload failed")]
    #[diagnostic(code(quire::resolve::blob_upload))]
    Upload(#[source] BoxError),

    #[error("{0}")]
    #[diagnostic(code(quire::resolve::other))]
    Other(String),
}
