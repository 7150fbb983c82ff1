use thiserror::Error;

pub type Result<T> = std::result::Result<T, PgnIndexError>;

#[derive(Error, Debug)]
pub enum PgnIndexError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid archive path: {0}")]
    InvalidPath(String),

    #[error("Header tag not found: {0}")]
    TagNotFound(String),

    #[error("Game {index} not found (index has {len} games)")]
    GameNotFound { index: usize, len: usize },
}

impl PgnIndexError {
    /// Missing header tag or out of range game index.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TagNotFound(_) | Self::GameNotFound { .. })
    }

    /// Open, stat or read failure while building an index.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::IoError(_) | Self::InvalidPath(_))
    }
}
