/// Convenience result type used across panoweave.
pub type PanoResult<T> = Result<T, PanoError>;

/// Error taxonomy for compositing and persistence.
///
/// Each condition a caller may need to react to differently has its own variant, so "no data"
/// ([`PanoError::EmptyInput`]), "bad data" ([`PanoError::InconsistentGeometry`]) and "storage
/// failure" ([`PanoError::Storage`]) can always be told apart.
#[derive(thiserror::Error, Debug)]
pub enum PanoError {
    /// No directional images were supplied.
    #[error("no directional images supplied")]
    EmptyInput,

    /// Input images disagree on side length or channel depth, or do not fit the crop.
    #[error("inconsistent geometry: {0}")]
    InconsistentGeometry(String),

    /// Feather overlap is zero or would consume the whole strip.
    #[error("invalid overlap: {overlap}px must be > 0 and < crop width {crop_width}px")]
    InvalidOverlap {
        /// Configured overlap in pixels.
        overlap: u32,
        /// Configured crop width in pixels.
        crop_width: u32,
    },

    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input bytes could not be decoded into a raster.
    #[error("decode error: {0}")]
    Decode(String),

    /// The canvas could not be encoded into the output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Persistence IO failed.
    #[error("storage error: {context}")]
    Storage {
        /// What the store was doing when the failure happened.
        context: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanoError {
    /// Build a [`PanoError::InconsistentGeometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InconsistentGeometry(msg.into())
    }

    /// Build a [`PanoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PanoError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PanoError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PanoError::Storage`] value from an IO error.
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// `true` for a storage failure caused by the target name already being taken.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::Storage { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
