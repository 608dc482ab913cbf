//! Partial-result reporting messages.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tensorwire_frame::MessageType;

use crate::wire::WireMessage;

/// Number of redundant replicas in the 2-of-3 quorum.
pub const VOTE_GROUPS: u8 = 3;

/// A partial result tensor reported by one vote group.
///
/// Header: `session_id`, `step_id`, `tile_id` (u64), `cycles_hint` (u32),
/// `vote_group` (u8), then 4 checksum bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMessage {
    pub session_id: u64,
    pub step_id: u64,
    pub tile_id: u64,
    /// Replica that produced this result, `0..VOTE_GROUPS`. Not range-checked.
    pub vote_group: u8,
    /// Partial result tensor.
    pub payload: Bytes,
    /// Optional performance hint; 0 when unknown.
    pub cycles_hint: u32,
}

impl ResultMessage {
    /// Build a result with no cycles hint.
    pub fn new(
        session_id: u64,
        step_id: u64,
        tile_id: u64,
        vote_group: u8,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            session_id,
            step_id,
            tile_id,
            vote_group,
            payload: payload.into(),
            cycles_hint: 0,
        }
    }

    pub fn with_cycles_hint(mut self, cycles_hint: u32) -> Self {
        self.cycles_hint = cycles_hint;
        self
    }

    /// Returns true if `vote_group` names one of the quorum replicas.
    pub fn has_valid_vote_group(&self) -> bool {
        self.vote_group < VOTE_GROUPS
    }
}

impl WireMessage for ResultMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Result;
    const NAME: &'static str = "ResultMessage";
    const SCALAR_LEN: usize = 8 + 8 + 8 + 4 + 1;
    const HEADER_LEN: usize = 33;

    fn payload(&self) -> &Bytes {
        &self.payload
    }

    fn put_scalars(&self, dst: &mut BytesMut) {
        dst.put_u64(self.session_id);
        dst.put_u64(self.step_id);
        dst.put_u64(self.tile_id);
        dst.put_u32(self.cycles_hint);
        dst.put_u8(self.vote_group);
    }

    fn from_scalars(mut scalars: &[u8], body: Bytes) -> Self {
        let session_id = scalars.get_u64();
        let step_id = scalars.get_u64();
        let tile_id = scalars.get_u64();
        let cycles_hint = scalars.get_u32();
        let vote_group = scalars.get_u8();
        Self {
            session_id,
            step_id,
            tile_id,
            vote_group,
            payload: body,
            cycles_hint,
        }
    }
}
