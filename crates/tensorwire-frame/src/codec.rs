use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::message_type::MessageType;

/// Envelope: version (1) + message type (1) + header length (2) + body length (4) = 8 bytes.
pub const ENVELOPE_SIZE: usize = 8;

/// The only supported format version.
pub const VERSION: u8 = 1;

/// Largest header the 16-bit length field can describe.
pub const MAX_HEADER_LEN: usize = u16::MAX as usize;

/// Largest body the 32-bit length field can describe.
pub const MAX_BODY_LEN: usize = u32::MAX as usize;

/// Default maximum body size accepted from a stream: 256 MiB.
pub const DEFAULT_MAX_BODY: usize = 256 * 1024 * 1024;

/// A parsed frame: message type selector plus raw header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type id (see [`crate::message_type`]).
    pub message_type: u8,
    /// Message header bytes.
    pub header: Bytes,
    /// Message body bytes.
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(message_type: u8, header: impl Into<Bytes>, body: impl Into<Bytes>) -> Self {
        Self {
            message_type,
            header: header.into(),
            body: body.into(),
        }
    }

    /// The known message type, if the id is assigned.
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type).ok()
    }

    /// The total wire size of this frame (envelope + header + body).
    pub fn wire_size(&self) -> usize {
        ENVELOPE_SIZE + self.header.len() + self.body.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format (big-endian):
/// ```text
/// ┌─────────┬──────────┬────────────┬────────────┬──────────┬──────────┐
/// │ Version │ Msg type │ Header len │ Body len   │ Header   │ Body     │
/// │ (1B)=1  │ (1B)     │ (2B)       │ (4B)       │          │          │
/// └─────────┴──────────┴────────────┴────────────┴──────────┴──────────┘
/// ```
pub fn encode_frame(message_type: u8, header: &[u8], body: &[u8], dst: &mut BytesMut) -> Result<()> {
    if header.len() > MAX_HEADER_LEN {
        return Err(FrameError::HeaderTooLarge { size: header.len() });
    }
    if body.len() > MAX_BODY_LEN {
        return Err(FrameError::BodyTooLarge {
            size: body.len(),
            max: MAX_BODY_LEN,
        });
    }
    dst.reserve(ENVELOPE_SIZE + header.len() + body.len());
    dst.put_u8(VERSION);
    dst.put_u8(message_type);
    dst.put_u16(header.len() as u16);
    dst.put_u32(body.len() as u32);
    dst.put_slice(header);
    dst.put_slice(body);
    Ok(())
}

/// Encode a single frame into a fresh buffer.
pub fn frame(message_type: u8, header: &[u8], body: &[u8]) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(ENVELOPE_SIZE + header.len() + body.len());
    encode_frame(message_type, header, body, &mut dst)?;
    Ok(dst.freeze())
}

struct Envelope {
    version: u8,
    message_type: u8,
    header_len: usize,
    body_len: usize,
}

impl Envelope {
    fn parse(mut src: &[u8]) -> Self {
        Self {
            version: src.get_u8(),
            message_type: src.get_u8(),
            header_len: src.get_u16() as usize,
            body_len: src.get_u32() as usize,
        }
    }

    fn check_version(&self) -> Result<()> {
        if self.version != VERSION {
            return Err(FrameError::VersionMismatch {
                expected: VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Saturates instead of wrapping where `usize` is 32 bits, so an
    /// oversized declaration can never look satisfiable.
    fn total_len(&self) -> usize {
        ENVELOPE_SIZE
            .saturating_add(self.header_len)
            .saturating_add(self.body_len)
    }
}

/// Decode one complete frame from a byte slice.
///
/// Checks run in order: envelope length, version, declared lengths.
/// Bytes past the end of the frame are ignored. Header and body are
/// copied out of `raw`.
pub fn decode_frame(raw: &[u8]) -> Result<Frame> {
    if raw.len() < ENVELOPE_SIZE {
        tracing::debug!(len = raw.len(), "rejecting short frame");
        return Err(FrameError::ShortFrame { len: raw.len() });
    }

    let envelope = Envelope::parse(&raw[..ENVELOPE_SIZE]);
    envelope.check_version()?;

    let total = envelope.total_len();
    if raw.len() < total {
        tracing::debug!(needed = total, available = raw.len(), "rejecting incomplete frame");
        return Err(FrameError::IncompleteFrame {
            needed: total,
            available: raw.len(),
        });
    }

    let header_end = ENVELOPE_SIZE + envelope.header_len;
    let frame = Frame {
        message_type: envelope.message_type,
        header: Bytes::copy_from_slice(&raw[ENVELOPE_SIZE..header_end]),
        body: Bytes::copy_from_slice(&raw[header_end..total]),
    };
    tracing::trace!(
        message_type = frame.message_type,
        header_len = frame.header.len(),
        body_len = frame.body.len(),
        "decoded frame"
    );
    Ok(frame)
}

/// Decode a frame from a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame_buf(src: &mut BytesMut, max_body: usize) -> Result<Option<Frame>> {
    if src.len() < ENVELOPE_SIZE {
        return Ok(None); // Need more data
    }

    let envelope = Envelope::parse(&src[..ENVELOPE_SIZE]);
    envelope.check_version()?;

    if envelope.body_len > max_body {
        return Err(FrameError::BodyTooLarge {
            size: envelope.body_len,
            max: max_body,
        });
    }

    if src.len() < envelope.total_len() {
        return Ok(None); // Need more data
    }

    src.advance(ENVELOPE_SIZE);
    let header = src.split_to(envelope.header_len).freeze();
    let body = src.split_to(envelope.body_len).freeze();

    Ok(Some(Frame {
        message_type: envelope.message_type,
        header,
        body,
    }))
}

/// Configuration for stream framing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum body size in bytes accepted from a stream. Default: 256 MiB.
    pub max_body_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY,
        }
    }
}
