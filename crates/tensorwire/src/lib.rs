//! Binary wire format for a tensor-sharing network.
//!
//! tensorwire frames three kinds of messages exchanged between peers that
//! hold tiles of a model: tile transfers, activation forwarding, and
//! partial-result reporting. Transport, routing and sessions live with the
//! caller; this crate only turns messages into bytes and back.
//!
//! # Crate Structure
//!
//! - [`frame`] — Versioned TLV envelope and truncated SHA-256 body checksums
//! - [`message`] — Tile, activation and result codecs plus type dispatch
//!
//! # Example
//!
//! ```
//! use tensorwire::message::{Message, TileKind, TileMessage, WireMessage};
//!
//! let tile = TileMessage::new(1, 2, TileKind::Weight, 3, None, vec![0u8; 100]);
//! let raw = tile.encode().unwrap();
//!
//! match Message::decode(&raw).unwrap() {
//!     Message::Tile(decoded) => assert_eq!(decoded.tile_id, 2),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

/// Re-export frame types.
pub mod frame {
    pub use tensorwire_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use tensorwire_message::*;
}
