//! Shared header layout for all message kinds.
//!
//! A message header is `SCALAR_LEN` bytes of big-endian fields followed by
//! the first `HEADER_LEN - SCALAR_LEN` bytes of the body checksum. The
//! declared `HEADER_LEN` differs per message kind and is checked exactly on
//! decode:
//!
//! ```text
//! message      scalars  tag  header
//! tile            26      8     34
//! activation      32      0     32
//! result          29      4     33
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tensorwire_frame::{checksum_tag, decode_frame, encode_frame, verify_tag, MessageType};

use crate::error::{MessageError, Result};

/// Decode-time behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Compare the stored checksum tag against the body. Off by default:
    /// the tag is advisory and peers have never been required to check it.
    pub verify_checksum: bool,
}

impl DecodeOptions {
    /// Options with checksum verification turned on.
    pub fn verified() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

/// A message kind with a fixed-size header and an opaque body.
pub trait WireMessage: Sized {
    /// Frame message type id for this kind.
    const MESSAGE_TYPE: MessageType;

    /// Name used in errors and logs.
    const NAME: &'static str;

    /// Bytes of big-endian scalar fields at the start of the header.
    const SCALAR_LEN: usize;

    /// Exact header length on the wire.
    const HEADER_LEN: usize;

    /// Checksum bytes stored after the scalars.
    const TAG_LEN: usize = Self::HEADER_LEN - Self::SCALAR_LEN;

    /// The body carried by this message.
    fn payload(&self) -> &Bytes;

    /// Append exactly `SCALAR_LEN` bytes of header fields.
    fn put_scalars(&self, dst: &mut BytesMut);

    /// Rebuild the message from a `SCALAR_LEN`-byte field prefix and a body.
    fn from_scalars(scalars: &[u8], body: Bytes) -> Self;

    /// The complete header: scalars followed by the checksum tag.
    fn encode_header(&self) -> BytesMut {
        let mut header = BytesMut::with_capacity(Self::HEADER_LEN);
        self.put_scalars(&mut header);
        debug_assert_eq!(header.len(), Self::SCALAR_LEN);
        header.put_slice(&checksum_tag(self.payload(), Self::TAG_LEN));
        header
    }

    /// Append the framed message to `dst`.
    fn encode_into(&self, dst: &mut BytesMut) -> Result<()> {
        let header = self.encode_header();
        encode_frame(
            Self::MESSAGE_TYPE.as_u8(),
            &header,
            self.payload(),
            dst,
        )?;
        Ok(())
    }

    /// Encode the message as a standalone frame.
    fn encode(&self) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode_into(&mut dst)?;
        Ok(dst.freeze())
    }

    /// The checksum tag stored in a header of the right size.
    fn stored_tag(header: &[u8]) -> &[u8] {
        &header[Self::SCALAR_LEN.min(header.len())..]
    }

    /// Decode from an already split header and body.
    fn from_parts(header: &[u8], body: Bytes) -> Result<Self> {
        Self::from_parts_with(header, body, &DecodeOptions::default())
    }

    /// Decode from an already split header and body with explicit options.
    fn from_parts_with(header: &[u8], body: Bytes, options: &DecodeOptions) -> Result<Self> {
        if header.len() != Self::HEADER_LEN {
            tracing::debug!(
                kind = Self::NAME,
                expected = Self::HEADER_LEN,
                actual = header.len(),
                "rejecting header"
            );
            return Err(MessageError::BadHeaderSize {
                message: Self::NAME,
                expected: Self::HEADER_LEN,
                actual: header.len(),
            });
        }

        if options.verify_checksum && !verify_tag(&body, Self::stored_tag(header)) {
            tracing::warn!(
                kind = Self::NAME,
                body_len = body.len(),
                "checksum mismatch"
            );
            return Err(MessageError::ChecksumMismatch {
                message: Self::NAME,
            });
        }

        Ok(Self::from_scalars(&header[..Self::SCALAR_LEN], body))
    }

    /// Parse a raw frame and decode it as this message kind.
    fn decode(raw: &[u8]) -> Result<Self> {
        Self::decode_with(raw, &DecodeOptions::default())
    }

    /// Parse a raw frame and decode it as this message kind with explicit options.
    fn decode_with(raw: &[u8], options: &DecodeOptions) -> Result<Self> {
        let frame = decode_frame(raw)?;
        if frame.message_type != Self::MESSAGE_TYPE.as_u8() {
            return Err(MessageError::UnexpectedMessageType {
                expected: Self::MESSAGE_TYPE,
                found: frame.message_type,
            });
        }
        Self::from_parts_with(&frame.header, frame.body, options)
    }
}
