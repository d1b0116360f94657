//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod media;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{
    Attachment, ChatMessage, JoinOutcome, LeaveOutcome, Member, Room, ScheduledRoom, Sticker,
};
pub use error::{MediaStoreError, RoomError, SessionError, ValueObjectError};
pub use event::{EventReceiver, EventSender, ServerEvent};
pub use factory::{ScheduledRoomIdFactory, SessionIdFactory, StickerIdFactory};
pub use media::{MediaBlob, MediaConstraints, MediaKind, MediaStore, StoredMedia};
pub use repository::{
    CatalogEntry, CatalogRepository, ConnectionRepository, MemberSnapshot, RoomRepository,
    RoomSnapshot, ScheduledRoomRepository, StickerRepository,
};
pub use session::{Session, SessionState};
pub use value_object::{
    DisplayName, MessageContent, RoomName, ScheduledRoomId, ScheduledTime, SessionId, StickerId,
    Timestamp,
};
