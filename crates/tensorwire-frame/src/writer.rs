use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.message_type, frame.header.as_ref(), frame.body.as_ref())
    }

    /// Frame and send a header/body pair.
    pub fn send(&mut self, message_type: u8, header: &[u8], body: &[u8]) -> Result<()> {
        if body.len() > self.config.max_body_size {
            return Err(FrameError::BodyTooLarge {
                size: body.len(),
                max: self.config.max_body_size,
            });
        }

        self.buf.clear();
        encode_frame(message_type, header, body, &mut self.buf)?;
        let wire = self.buf.split().freeze();
        self.write_all(&wire)?;
        tracing::trace!(message_type, body_len = body.len(), "wrote frame");

        self.flush()
    }

    /// Write bytes that already hold one or more encoded frames.
    pub fn write_raw(&mut self, wire: &[u8]) -> Result<()> {
        self.write_all(wire)?;
        self.flush()
    }

    fn write_all(&mut self, wire: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < wire.len() {
            match self.inner.write(&wire[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum body size for subsequent frame encoding.
    pub fn set_max_body_size(&mut self, max_body_size: usize) {
        self.config.max_body_size = max_body_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
