//! Tile transfer messages.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tensorwire_frame::MessageType;

use crate::wire::WireMessage;

/// `expert_idx` value for tiles that do not belong to an expert.
pub const NO_EXPERT: u16 = 0xFFFF;

/// What a tile holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TileKind {
    Weight = 0,
    Expert = 1,
    KvAux = 2,
    Codebook = 3,
}

impl TileKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(TileKind::Weight),
            1 => Some(TileKind::Expert),
            2 => Some(TileKind::KvAux),
            3 => Some(TileKind::Codebook),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Weight => "weight",
            TileKind::Expert => "expert",
            TileKind::KvAux => "kv_aux",
            TileKind::Codebook => "codebook",
        }
    }
}

/// A packed model tile.
///
/// Header: `model_id` (u64), `tile_id` (u64), `tile_kind` (u32),
/// `layer_idx` (u32), `expert_idx` (u16), then 8 checksum bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMessage {
    pub model_id: u64,
    pub tile_id: u64,
    /// Raw kind value; see [`TileKind`]. Unknown values are carried as-is.
    pub tile_kind: u32,
    pub layer_idx: u32,
    /// Expert index, or [`NO_EXPERT`].
    pub expert_idx: u16,
    /// 4-bit packed tensor data.
    pub tile_bytes: Bytes,
}

impl TileMessage {
    /// Build a tile. `expert` of `None` stores [`NO_EXPERT`].
    pub fn new(
        model_id: u64,
        tile_id: u64,
        kind: TileKind,
        layer_idx: u32,
        expert: Option<u16>,
        tile_bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            model_id,
            tile_id,
            tile_kind: kind.as_u32(),
            layer_idx,
            expert_idx: expert.unwrap_or(NO_EXPERT),
            tile_bytes: tile_bytes.into(),
        }
    }

    /// The tile kind, if the raw value is assigned.
    pub fn kind(&self) -> Option<TileKind> {
        TileKind::from_u32(self.tile_kind)
    }

    /// The expert index, or `None` for [`NO_EXPERT`].
    pub fn expert(&self) -> Option<u16> {
        (self.expert_idx != NO_EXPERT).then_some(self.expert_idx)
    }
}

impl WireMessage for TileMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Tile;
    const NAME: &'static str = "TileMessage";
    const SCALAR_LEN: usize = 8 + 8 + 4 + 4 + 2;
    const HEADER_LEN: usize = 34;

    fn payload(&self) -> &Bytes {
        &self.tile_bytes
    }

    fn put_scalars(&self, dst: &mut BytesMut) {
        dst.put_u64(self.model_id);
        dst.put_u64(self.tile_id);
        dst.put_u32(self.tile_kind);
        dst.put_u32(self.layer_idx);
        dst.put_u16(self.expert_idx);
    }

    fn from_scalars(mut scalars: &[u8], body: Bytes) -> Self {
        Self {
            model_id: scalars.get_u64(),
            tile_id: scalars.get_u64(),
            tile_kind: scalars.get_u32(),
            layer_idx: scalars.get_u32(),
            expert_idx: scalars.get_u16(),
            tile_bytes: body,
        }
    }
}
