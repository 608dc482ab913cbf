/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer is smaller than the fixed envelope.
    #[error("short frame ({len} bytes, envelope needs 8)")]
    ShortFrame { len: usize },

    /// The envelope carries an unsupported format version.
    #[error("version mismatch (expected {expected}, found {found})")]
    VersionMismatch { expected: u8, found: u8 },

    /// The declared header and body lengths exceed the available bytes.
    #[error("incomplete frame (need {needed} bytes, have {available})")]
    IncompleteFrame { needed: usize, available: usize },

    /// The header does not fit the 16-bit length field.
    #[error("header too large ({size} bytes, max 65535)")]
    HeaderTooLarge { size: usize },

    /// The body exceeds the 32-bit length field or the configured limit.
    #[error("body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
