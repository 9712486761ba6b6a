/// Convenience result type used across chanpack.
pub type PackResult<T> = Result<T, PackError>;

/// Top-level error taxonomy used by the packing APIs.
#[derive(thiserror::Error, Debug)]
pub enum PackError {
    /// Channel sources disagree on pixel dimensions.
    #[error(
        "dimension mismatch: image '{image}' is {}x{}, expected {}x{}",
        .found.0,
        .found.1,
        .expected.0,
        .expected.1
    )]
    DimensionMismatch {
        /// Name of the first image whose size disagrees.
        image: String,
        /// Size established by the first channel source.
        expected: (u32, u32),
        /// Size of the offending image.
        found: (u32, u32),
    },

    /// Invalid user-provided data (recipes, names, channel labels).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing recipes and configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The compositing engine failed to produce an image.
    #[error("engine error: {0}")]
    Engine(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackError {
    /// Build a [`PackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`PackError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
