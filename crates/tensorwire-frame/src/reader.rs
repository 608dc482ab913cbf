use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_frame_buf, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame_buf(&mut self.buf, self.config.max_body_size)? {
                tracing::trace!(
                    message_type = frame.message_type,
                    body_len = frame.body.len(),
                    "read frame"
                );
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Returns true if no partially received frame bytes are buffered.
    pub fn is_idle(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum body size for subsequent frame decoding.
    pub fn set_max_body_size(&mut self, max_body_size: usize) {
        self.config.max_body_size = max_body_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::{encode_frame, VERSION};
    use crate::message_type::{ACTIVATION, RESULT, TILE};

    fn wire(message_type: u8, header: &[u8], body: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(message_type, header, body, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn read_single_frame() {
        let bytes = wire(TILE, b"hdr", b"hello");

        let mut reader = FrameReader::new(Cursor::new(bytes));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.message_type, TILE);
        assert_eq!(frame.header.as_ref(), b"hdr");
        assert_eq!(frame.body.as_ref(), b"hello");
        assert!(reader.is_idle());
    }

    #[test]
    fn read_multiple_frames() {
        let bytes = [
            wire(TILE, b"a", b"one"),
            wire(ACTIVATION, b"b", b"two"),
            wire(RESULT, b"c", b"three"),
        ]
        .concat();

        let mut reader = FrameReader::new(Cursor::new(bytes));

        let f1 = reader.read_frame().unwrap();
        let f2 = reader.read_frame().unwrap();
        let f3 = reader.read_frame().unwrap();

        assert_eq!((f1.message_type, f1.body.as_ref()), (TILE, b"one".as_ref()));
        assert_eq!((f2.message_type, f2.body.as_ref()), (ACTIVATION, b"two".as_ref()));
        assert_eq!((f3.message_type, f3.body.as_ref()), (RESULT, b"three".as_ref()));

        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn read_frame_with_large_body() {
        let body = vec![0xAB; 64 * 1024];
        let bytes = wire(TILE, &[0u8; 34], &body);

        let mut reader = FrameReader::new(Cursor::new(bytes));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.header.len(), 34);
        assert_eq!(frame.body.as_ref(), body.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(ACTIVATION, b"slow-header", b"slow"),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.message_type, ACTIVATION);
        assert_eq!(frame.header.as_ref(), b"slow-header");
        assert_eq!(frame.body.as_ref(), b"slow");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut partial = BytesMut::new();
        partial.put_u8(VERSION);
        partial.put_u8(RESULT);
        partial.put_u16(4);
        partial.put_u32(16);
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
        assert!(!reader.is_idle());
    }

    #[test]
    fn version_mismatch_in_stream() {
        let bytes = vec![0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::VersionMismatch { found: 5, .. }));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut bytes = BytesMut::new();
        bytes.put_u8(VERSION);
        bytes.put_u8(TILE);
        bytes.put_u16(0);
        bytes.put_u32(1024);

        let cfg = FrameConfig { max_body_size: 16 };
        let mut reader = FrameReader::with_config(Cursor::new(bytes.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { size: 1024, max: 16 }));
    }

    #[test]
    fn set_max_body_size_applies_to_next_frame() {
        let bytes = wire(TILE, b"", b"0123456789");
        let mut reader = FrameReader::new(Cursor::new(bytes));
        reader.set_max_body_size(4);
        assert_eq!(reader.config().max_body_size, 4);

        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { .. }));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    #[cfg(unix)]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send(TILE, b"tile-header", b"ping").unwrap();
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.message_type, TILE);
        assert_eq!(frame.body.as_ref(), b"ping");
    }

    #[test]
    #[cfg(unix)]
    fn concurrent_reader_writer_threads() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let reader = FrameReader::new(right);
        let reader = Arc::new(Mutex::new(reader));

        let reader_thread = {
            let reader = Arc::clone(&reader);
            std::thread::spawn(move || {
                for expected in 0..64u8 {
                    let frame = reader.lock().unwrap().read_frame().unwrap();
                    assert_eq!(frame.message_type, expected % 3);
                    assert_eq!(frame.body.as_ref(), format!("step-{expected}").as_bytes());
                }
            })
        };

        for i in 0..64u8 {
            let body = format!("step-{i}");
            writer.send(i % 3, &[i], body.as_bytes()).unwrap();
        }

        reader_thread.join().unwrap();
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = FlakyReader {
            fail_with: Some(ErrorKind::WouldBlock),
            bytes: wire(RESULT, b"", b"ok"),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = FlakyReader {
            fail_with: Some(ErrorKind::Interrupted),
            bytes: wire(RESULT, b"", b"ok"),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let frame = framed.read_frame().unwrap();

        assert_eq!(frame.message_type, RESULT);
        assert_eq!(frame.body.as_ref(), b"ok");
    }

    struct FlakyReader {
        fail_with: Option<ErrorKind>,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if let Some(kind) = self.fail_with.take() {
                return Err(std::io::Error::from(kind));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
