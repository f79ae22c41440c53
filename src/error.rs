//! Unified error type for lissajous.

use thiserror::Error;

/// Errors that can occur while generating or serving an animation.
#[derive(Debug, Error)]
pub enum LissajousError {
    /// The GIF encoder rejected a frame or failed to write to the sink.
    #[error("Encoding error: {0}")]
    Encoding(#[from] gif::EncodingError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The canvas does not fit in a GIF's 16-bit dimension fields.
    #[error("Canvas of {side}x{side} pixels exceeds the GIF limit of 65535")]
    CanvasTooLarge {
        /// Requested canvas side in pixels.
        side: u64,
    },

    /// A frame count or delay does not fit in its 16-bit GIF field.
    #[error("{field} {value} exceeds the GIF limit of 65535")]
    FieldTooLarge {
        /// Query key of the offending value.
        field: &'static str,
        /// Requested value.
        value: u32,
    },

    /// A request exceeded a configured service limit.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

impl LissajousError {
    /// Whether the error was caused by the request rather than the server.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::CanvasTooLarge { .. } | Self::FieldTooLarge { .. } | Self::LimitExceeded(_)
        )
    }
}
