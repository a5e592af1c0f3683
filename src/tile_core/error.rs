use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Configuration or caller input that can never produce a valid world.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A direction token outside north/south/east/west.
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
    #[error("chunk ({x}, {y}) was already inserted")]
    DuplicateChunk { x: i32, y: i32 },
}

impl TileError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

pub type TileResult<T> = Result<T, TileError>;
