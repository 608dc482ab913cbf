//! Dispatch over the three message kinds.

use std::io::{Read, Write};

use bytes::Bytes;
use tensorwire_frame::{decode_frame, Frame, FrameReader, FrameWriter, MessageType};

use crate::activation::ActivationMessage;
use crate::error::{MessageError, Result};
use crate::result::ResultMessage;
use crate::tile::TileMessage;
use crate::wire::{DecodeOptions, WireMessage};

/// Any decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Tile(TileMessage),
    Activation(ActivationMessage),
    Result(ResultMessage),
}

impl Message {
    /// Parse a raw frame and decode the message it carries.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        Self::decode_with(raw, &DecodeOptions::default())
    }

    /// Parse a raw frame and decode the message it carries with explicit options.
    pub fn decode_with(raw: &[u8], options: &DecodeOptions) -> Result<Self> {
        let frame = decode_frame(raw)?;
        Self::from_frame_with(&frame, options)
    }

    /// Decode the message carried by an already parsed frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::from_frame_with(frame, &DecodeOptions::default())
    }

    /// Decode the message carried by an already parsed frame with explicit options.
    pub fn from_frame_with(frame: &Frame, options: &DecodeOptions) -> Result<Self> {
        let kind = MessageType::try_from(frame.message_type)
            .map_err(MessageError::UnknownMessageType)?;
        let (header, body) = (frame.header.as_ref(), frame.body.clone());

        let message = match kind {
            MessageType::Tile => {
                Message::Tile(TileMessage::from_parts_with(header, body, options)?)
            }
            MessageType::Activation => {
                Message::Activation(ActivationMessage::from_parts_with(header, body, options)?)
            }
            MessageType::Result => {
                Message::Result(ResultMessage::from_parts_with(header, body, options)?)
            }
        };
        Ok(message)
    }

    /// Encode as a standalone frame.
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Message::Tile(msg) => msg.encode(),
            Message::Activation(msg) => msg.encode(),
            Message::Result(msg) => msg.encode(),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Tile(_) => TileMessage::MESSAGE_TYPE,
            Message::Activation(_) => ActivationMessage::MESSAGE_TYPE,
            Message::Result(_) => ResultMessage::MESSAGE_TYPE,
        }
    }

    /// The opaque body of the message.
    pub fn payload(&self) -> &Bytes {
        match self {
            Message::Tile(msg) => msg.payload(),
            Message::Activation(msg) => msg.payload(),
            Message::Result(msg) => msg.payload(),
        }
    }
}

impl From<TileMessage> for Message {
    fn from(value: TileMessage) -> Self {
        Message::Tile(value)
    }
}

impl From<ActivationMessage> for Message {
    fn from(value: ActivationMessage) -> Self {
        Message::Activation(value)
    }
}

impl From<ResultMessage> for Message {
    fn from(value: ResultMessage) -> Self {
        Message::Result(value)
    }
}

/// Read the next frame from `reader` and decode it.
pub fn read_message<R: Read>(reader: &mut FrameReader<R>, options: &DecodeOptions) -> Result<Message> {
    let frame = reader.read_frame()?;
    Message::from_frame_with(&frame, options)
}

/// Encode `message` and write it to `writer`.
pub fn write_message<W: Write>(writer: &mut FrameWriter<W>, message: &Message) -> Result<()> {
    let wire = message.encode()?;
    writer.write_raw(&wire)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tensorwire_frame::{frame, FrameError, TILE};

    use super::*;
    use crate::tile::{TileKind, NO_EXPERT};

    fn samples() -> Vec<Message> {
        vec![
            TileMessage::new(1, 2, TileKind::Weight, 3, None, vec![0u8; 100]).into(),
            ActivationMessage::new(42, 7, 1, 2, "x").into(),
            ResultMessage::new(5, 6, 7, 1, vec![3u8; 50])
                .with_cycles_hint(999)
                .into(),
        ]
    }

    #[test]
    fn test_dispatch_roundtrip() {
        for message in samples() {
            let decoded = Message::decode(&message.encode().unwrap()).unwrap();
            assert_eq!(decoded.message_type(), message.message_type());
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_tile_example() {
        let raw = samples()[0].encode().unwrap();
        let frame = decode_frame(&raw).unwrap();
        assert_eq!(frame.message_type, TILE);

        match Message::from_frame(&frame).unwrap() {
            Message::Tile(tile) => {
                assert_eq!(tile.tile_id, 2);
                assert_eq!(tile.expert_idx, NO_EXPERT);
            }
            other => panic!("expected tile, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_message_type() {
        let raw = frame(3, &[0u8; 32], b"").unwrap();
        let err = Message::decode(&raw).unwrap_err();
        assert!(matches!(err, MessageError::UnknownMessageType(3)));
    }

    #[test]
    fn test_header_size_checked_per_type() {
        // A tile-sized header under the activation type id.
        let raw = frame(1, &[0u8; 34], b"").unwrap();
        let err = Message::decode(&raw).unwrap_err();
        assert!(matches!(
            err,
            MessageError::BadHeaderSize { message: "ActivationMessage", expected: 32, actual: 34 }
        ));
    }

    #[test]
    fn test_frame_errors_surface() {
        assert!(matches!(
            Message::decode(&[1, 0, 0]),
            Err(MessageError::Frame(FrameError::ShortFrame { len: 3 }))
        ));

        let mut raw = samples()[2].encode().unwrap().to_vec();
        raw[0] = 2;
        assert!(matches!(
            Message::decode(&raw),
            Err(MessageError::Frame(FrameError::VersionMismatch { found: 2, .. }))
        ));
    }

    #[test]
    fn test_verified_dispatch() {
        let options = DecodeOptions::verified();
        for message in samples() {
            let decoded = Message::decode_with(&message.encode().unwrap(), &options).unwrap();
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_stream_read_write() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        for message in samples() {
            write_message(&mut writer, &message).unwrap();
        }

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));
        let options = DecodeOptions::default();
        for expected in samples() {
            assert_eq!(read_message(&mut reader, &options).unwrap(), expected);
        }
        assert!(matches!(
            read_message(&mut reader, &options),
            Err(MessageError::Frame(FrameError::ConnectionClosed))
        ));
    }

    #[test]
    fn test_payload_accessor() {
        let messages = samples();
        assert_eq!(messages[0].payload().len(), 100);
        assert_eq!(messages[1].payload().as_ref(), b"x");
        assert_eq!(messages[2].payload().len(), 50);
    }

    #[test]
    fn test_concurrent_decode_is_independent() {
        let raw = samples()[2].encode().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let raw = raw.clone();
                std::thread::spawn(move || Message::decode(&raw).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), samples()[2]);
        }
    }
}
