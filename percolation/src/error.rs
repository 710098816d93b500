use std::collections::TryReserveError;

/// Failure of a single threshold pass.
///
/// Errors never escape a pass half-done: a pass either returns a complete
/// label grid or one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("declared dimensions {expected:?} hold {expected_cells} cells, but {actual} were supplied")]
    ShapeMismatch {
        expected: [usize; 3],
        expected_cells: usize,
        actual: usize,
    },
    #[error("invalid threshold entry: {0}")]
    InvalidThreshold(String),
    #[error("cannot allocate a grid of {dims:?}: {reason}")]
    ResourceExhaustion { dims: [usize; 3], reason: String },
}

impl ExtractError {
    pub(crate) fn exhausted(dims: [usize; 3], err: TryReserveError) -> Self {
        ExtractError::ResourceExhaustion {
            dims,
            reason: err.to_string(),
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
