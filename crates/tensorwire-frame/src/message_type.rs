//! Message type ids carried in byte 1 of the envelope.
//!
//! Ids 0-2 are assigned. Frames with other ids still parse at the frame
//! layer; it is up to the message layer to reject them.

/// Packed weight or auxiliary tensor tile.
pub const TILE: u8 = 0;

/// Activation forwarded between tiles.
pub const ACTIVATION: u8 = 1;

/// Partial result reported by a vote group.
pub const RESULT: u8 = 2;

/// Known message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Tile = TILE,
    Activation = ACTIVATION,
    Result = RESULT,
}

impl MessageType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::Tile => "TILE",
            MessageType::Activation => "ACTIVATION",
            MessageType::Result => "RESULT",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            TILE => Ok(MessageType::Tile),
            ACTIVATION => Ok(MessageType::Activation),
            RESULT => Ok(MessageType::Result),
            other => Err(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value.as_u8()
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns a human-readable name for a message type id.
pub fn message_type_name(id: u8) -> &'static str {
    MessageType::try_from(id)
        .map(MessageType::name)
        .unwrap_or("UNKNOWN")
}

/// Returns true if the id is an assigned message type.
pub fn is_known(id: u8) -> bool {
    MessageType::try_from(id).is_ok()
}
