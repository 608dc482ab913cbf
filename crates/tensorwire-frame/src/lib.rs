//! Versioned TLV framing for the tensorwire format.
//!
//! Every message travels inside an 8-byte big-endian envelope:
//! - A 1-byte format version (always [`VERSION`])
//! - A 1-byte message type selecting the message codec
//! - A 2-byte header length
//! - A 4-byte body length
//!
//! followed by the header bytes and then the body bytes. Bodies carry a
//! truncated SHA-256 tag in their message header; see [`checksum`].

#[cfg(feature = "async")]
pub mod async_codec;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod message_type;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::TensorWireCodec;
pub use checksum::{checksum, checksum_tag, verify_tag, Checksum, CHECKSUM_LEN};
pub use codec::{
    decode_frame, decode_frame_buf, encode_frame, frame, Frame, FrameConfig, DEFAULT_MAX_BODY,
    ENVELOPE_SIZE, MAX_BODY_LEN, MAX_HEADER_LEN, VERSION,
};
pub use error::{FrameError, Result};
pub use message_type::{message_type_name, MessageType, ACTIVATION, RESULT, TILE};
pub use reader::FrameReader;
pub use writer::FrameWriter;
