use thiserror::Error;

use crate::gym::Pos;

/// Errors raised while loading or validating a maze description
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse maze config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read maze config: {0}")]
    Io(#[from] std::io::Error),
    #[error("maze must have positive dimensions, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("{what} at {pos} is outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        width: usize,
        height: usize,
    },
}

/// Crate-level error type
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A value table snapshot does not fit the table it is restored into
    #[error("value table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: [usize; 2],
        found: [usize; 2],
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
