//! Shared application state.

use std::sync::Arc;

use crate::domain::{
    ConnectionRepository, MediaStore, RoomRepository, ScheduledRoomRepository, StickerRepository,
};

/// Shared application state
pub struct AppState {
    /// Room Registry
    pub rooms: Arc<dyn RoomRepository>,
    /// Every live connection (global broadcasts)
    pub connections: Arc<dyn ConnectionRepository>,
    /// Sticker Registry
    pub stickers: Arc<StickerRepository>,
    /// Scheduled-Room Board
    pub scheduled_rooms: Arc<ScheduledRoomRepository>,
    /// Attachment blobs (`/uploads`)
    pub uploads: Arc<dyn MediaStore>,
    /// Sticker blobs (`/stickers`)
    pub sticker_store: Arc<dyn MediaStore>,
    pub max_upload_bytes: usize,
    pub max_sticker_bytes: usize,
}
