use thiserror::Error;

/// Failures surfaced by the editor core.
///
/// Operations that fail leave the editor state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A scene index outside `0..len`.
    #[error("Invalid item index {index} (scene holds {len} items)")]
    InvalidIndex { index: usize, len: usize },

    /// Uploaded bytes are not a raster image we can read.
    #[error("Image decode failed: {reason}")]
    ImageDecodeFailure { reason: String },

    /// Catalog lookup with an id the catalog does not contain.
    #[error("Unknown catalog item: {id}")]
    UnknownItem { id: String },

    /// Editor config or catalog manifest could not be parsed.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EditorError {
    pub fn decode(reason: impl Into<String>) -> Self {
        EditorError::ImageDecodeFailure {
            reason: reason.into(),
        }
    }
}
