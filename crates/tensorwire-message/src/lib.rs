//! Message codecs for the tensorwire format.
//!
//! Three message kinds ride on top of [`tensorwire_frame`]:
//! - [`TileMessage`] — a packed weight or auxiliary tensor tile
//! - [`ActivationMessage`] — an activation forwarded between tiles
//! - [`ResultMessage`] — a partial result from one vote group
//!
//! Each message packs its scalar fields into a fixed-size big-endian
//! header, followed by a truncated checksum of the body. The payload is
//! carried as the opaque frame body. [`Message`] dispatches on the frame's
//! message type.

pub mod activation;
pub mod error;
pub mod message;
pub mod result;
pub mod tile;
pub mod wire;

pub use activation::ActivationMessage;
pub use error::{MessageError, Result};
pub use message::{read_message, write_message, Message};
pub use result::{ResultMessage, VOTE_GROUPS};
pub use tile::{TileKind, TileMessage, NO_EXPERT};
pub use wire::{DecodeOptions, WireMessage};
