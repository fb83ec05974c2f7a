use thiserror::Error;

// Every fallible operation in the core reports through this enum.
// Recipe-level failures carry the index of the offending recipe so the caller
// can decide whether to skip it or abort the whole generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("op pool has no recipes")]
    EmptyPool,

    #[error("recipe #{index}: {reason}")]
    InvalidRecipe { index: usize, reason: String },

    #[error("recipe #{index}: placement region has zero area")]
    ZeroArea { index: usize },

    #[error("op '{id}': {reason}")]
    InvalidOp { id: String, reason: String },

    #[error("terrain source: {0}")]
    InvalidSource(String),

    #[error("fit: {0}")]
    InvalidFit(String),

    #[error("splat: {0}")]
    InvalidSplat(String),
}

impl TerrainError {
    pub(crate) fn recipe(index: usize, reason: impl Into<String>) -> Self {
        TerrainError::InvalidRecipe {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
