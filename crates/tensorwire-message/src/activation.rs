//! Activation forwarding messages.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tensorwire_frame::MessageType;

use crate::wire::WireMessage;

/// An activation blob travelling from one tile to the next.
///
/// Header: `session_id`, `step_id`, `from_tile_id`, `to_tile_id` (all u64).
///
/// Activation frames carry no integrity tag: the 32-byte header is all
/// scalars, so two different blobs produce identical checksum bytes (none)
/// and checksum verification accepts any body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationMessage {
    pub session_id: u64,
    pub step_id: u64,
    pub from_tile_id: u64,
    pub to_tile_id: u64,
    /// Compressed activation blob.
    pub activation: Bytes,
}

impl ActivationMessage {
    pub fn new(
        session_id: u64,
        step_id: u64,
        from_tile_id: u64,
        to_tile_id: u64,
        activation: impl Into<Bytes>,
    ) -> Self {
        Self {
            session_id,
            step_id,
            from_tile_id,
            to_tile_id,
            activation: activation.into(),
        }
    }
}

impl WireMessage for ActivationMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Activation;
    const NAME: &'static str = "ActivationMessage";
    const SCALAR_LEN: usize = 8 * 4;
    const HEADER_LEN: usize = 32;

    fn payload(&self) -> &Bytes {
        &self.activation
    }

    fn put_scalars(&self, dst: &mut BytesMut) {
        dst.put_u64(self.session_id);
        dst.put_u64(self.step_id);
        dst.put_u64(self.from_tile_id);
        dst.put_u64(self.to_tile_id);
    }

    fn from_scalars(mut scalars: &[u8], body: Bytes) -> Self {
        Self {
            session_id: scalars.get_u64(),
            step_id: scalars.get_u64(),
            from_tile_id: scalars.get_u64(),
            to_tile_id: scalars.get_u64(),
            activation: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use tensorwire_frame::{decode_frame, ACTIVATION};

    use super::*;
    use crate::error::MessageError;
    use crate::wire::DecodeOptions;

    #[test]
    fn test_roundtrip() {
        let msg = ActivationMessage::new(42, 7, 1, 2, &b"x"[..]);
        let decoded = ActivationMessage::decode(&msg.encode().unwrap()).unwrap();

        assert_eq!(decoded.session_id, 42);
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_frame_layout() {
        let msg = ActivationMessage::new(1, 2, 3, 4, vec![9u8; 10]);
        let raw = msg.encode().unwrap();
        let frame = decode_frame(&raw).unwrap();

        assert_eq!(frame.message_type, ACTIVATION);
        assert_eq!(frame.header.len(), 32);
        assert_eq!(&frame.header[24..32], &4u64.to_be_bytes());
        assert_eq!(ActivationMessage::TAG_LEN, 0);
    }

    #[test]
    fn test_extreme_ids() {
        let msg = ActivationMessage::new(u64::MAX, 0, u64::MAX - 1, 1, Bytes::new());
        let decoded = ActivationMessage::decode(&msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert!(decoded.activation.is_empty());
    }

    #[test]
    fn test_bad_header_size() {
        for len in [0usize, 31, 33, 48] {
            let err = ActivationMessage::from_parts(&vec![0u8; len], Bytes::new()).unwrap_err();
            assert!(matches!(
                err,
                MessageError::BadHeaderSize { expected: 32, actual, .. } if actual == len
            ));
        }
    }

    #[test]
    fn test_different_payloads_share_empty_tag() {
        let a = ActivationMessage::new(1, 2, 3, 4, "first");
        let b = ActivationMessage::new(1, 2, 3, 4, "second");
        assert_eq!(a.encode_header(), b.encode_header());
        assert!(ActivationMessage::stored_tag(&a.encode_header()).is_empty());
    }

    #[test]
    fn test_verification_has_no_tag_to_check() {
        let header = ActivationMessage::new(1, 1, 1, 1, "a").encode_header();
        let decoded = ActivationMessage::from_parts_with(
            &header,
            Bytes::from_static(b"anything"),
            &DecodeOptions::verified(),
        )
        .unwrap();
        assert_eq!(decoded.activation.as_ref(), b"anything");
    }
}
