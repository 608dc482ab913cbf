use tensorwire_frame::{FrameError, MessageType};

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The envelope could not be built or parsed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The header is not exactly the size declared for the message type.
    #[error("bad {message} header size (expected {expected} bytes, got {actual})")]
    BadHeaderSize {
        message: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The frame carries a message type id with no codec.
    #[error("unknown message type {0}")]
    UnknownMessageType(u8),

    /// A typed decode was handed a frame of another message type.
    #[error("unexpected message type (expected {expected}, found {found})")]
    UnexpectedMessageType { expected: MessageType, found: u8 },

    /// Checksum verification was requested and the stored tag does not match the body.
    #[error("{message} checksum does not match body")]
    ChecksumMismatch { message: &'static str },
}

pub type Result<T> = std::result::Result<T, MessageError>;
