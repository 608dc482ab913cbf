//! `tokio_util::codec` adapter for async byte streams.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame_buf, encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

/// Frame codec for `FramedRead` / `FramedWrite`.
#[derive(Debug, Clone, Default)]
pub struct TensorWireCodec {
    config: FrameConfig,
}

impl TensorWireCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for TensorWireCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        decode_frame_buf(src, self.config.max_body_size)
    }
}

impl Encoder<Frame> for TensorWireCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<()> {
        if item.body.len() > self.config.max_body_size {
            return Err(FrameError::BodyTooLarge {
                size: item.body.len(),
                max: self.config.max_body_size,
            });
        }
        encode_frame(item.message_type, &item.header, &item.body, dst)
    }
}

/// Pre-encoded frame bytes are passed through untouched.
impl Encoder<Bytes> for TensorWireCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}
