use std::path::PathBuf;

/// Errors produced by the conversion pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested parameters cannot produce a valid rendering
    /// (too many buckets, too many clusters, a zero-sized grid, ...)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The font used for glyph ranking could not be read
    #[error("font unavailable at '{}': {source}", path.display())]
    FontUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The font file was read but could not be parsed
    #[error("invalid font at '{}': {reason}", path.display())]
    InvalidFont { path: PathBuf, reason: String },

    /// The source image could not be opened or decoded
    #[error("image unavailable at '{}': {source}", path.display())]
    ImageUnavailable {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A stored rank record is malformed or does not describe a valid ranking.
    /// The ranker recovers from this by recomputing.
    #[error("rank cache is inconsistent: {0}")]
    CacheInconsistency(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// True for the error kinds that mean a required asset is missing
    pub fn is_resource(&self) -> bool {
        matches!(
            self,
            Error::FontUnavailable { .. } | Error::InvalidFont { .. } | Error::ImageUnavailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
