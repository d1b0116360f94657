//! Domain factories for generating identifiers.

use super::{ScheduledRoomId, SessionId, StickerId};

/// Factory for generating SessionId instances.
///
/// This factory encapsulates the logic for generating new connection
/// identifiers, separating the generation concern from parsing in SessionId.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating StickerId instances.
pub struct StickerIdFactory;

impl StickerIdFactory {
    /// Generate a new StickerId with a random UUID v4.
    pub fn generate() -> StickerId {
        StickerId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating ScheduledRoomId instances.
pub struct ScheduledRoomIdFactory;

impl ScheduledRoomIdFactory {
    /// Generate a new ScheduledRoomId with a random UUID v4.
    pub fn generate() -> ScheduledRoomId {
        ScheduledRoomId::from_uuid(uuid::Uuid::new_v4())
    }
}
