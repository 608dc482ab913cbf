use std::fmt;
use std::io;

use tensorwire_frame::FrameError;
use tensorwire_message::MessageError;

// Exit codes follow sysexits-style ranges.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        FrameError::HeaderTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::ShortFrame { .. }
        | FrameError::VersionMismatch { .. }
        | FrameError::IncompleteFrame { .. }
        | FrameError::BodyTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Frame(err) => frame_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_map_to_data_invalid() {
        let err = frame_error("decode", FrameError::ShortFrame { len: 3 });
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: short frame"));
    }

    #[test]
    fn message_errors_unwrap_frame_errors() {
        let err = message_error(
            "decode",
            MessageError::Frame(FrameError::Io(io::Error::from(
                io::ErrorKind::PermissionDenied,
            ))),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = message_error("decode", MessageError::UnknownMessageType(9));
        assert_eq!(err.code, DATA_INVALID);
    }
}
