//! Repository traits defined by the domain layer.
//!
//! The use case layer depends on these traits only; the in-memory
//! implementations live in `infrastructure::repository`.

use std::fmt;

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, JoinOutcome, LeaveOutcome, Member, ScheduledRoom, Sticker},
    error::RoomError,
    event::{EventSender, ServerEvent},
    value_object::{DisplayName, RoomName, ScheduledRoomId, SessionId, StickerId, Timestamp},
};

/// Read-only view of a room for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub name: RoomName,
    pub created_at: Timestamp,
    pub members: Vec<MemberSnapshot>,
    pub message_count: usize,
}

impl RoomSnapshot {
    pub fn user_count(&self) -> usize {
        self.members.len()
    }
}

/// Read-only view of a room member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    pub name: DisplayName,
    pub joined_at: Timestamp,
}

/// Room Registry: room name -> room state.
///
/// Every mutating call is atomic with respect to other calls on the same
/// room, and the events it emits reach members in history order.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Join `room`, creating it if needed
    async fn join(&self, room: RoomName, member: Member) -> JoinOutcome;

    /// Append a member's message to `room` and broadcast it
    async fn post(
        &self,
        room: &RoomName,
        session_id: &SessionId,
        message: ChatMessage,
    ) -> Result<(), RoomError>;

    /// Leave `room`; the room is removed when its last member leaves.
    ///
    /// A closing room releases only the attachment urls it posted first.
    async fn leave(
        &self,
        room: &RoomName,
        session_id: &SessionId,
        timestamp: Timestamp,
    ) -> Result<LeaveOutcome, RoomError>;

    async fn get_room(&self, room: &RoomName) -> Option<RoomSnapshot>;

    /// All rooms, sorted by name
    async fn list_rooms(&self) -> Vec<RoomSnapshot>;
}

/// Registry of every live connection, used for global broadcasts
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn register(&self, session_id: SessionId, sender: EventSender, connected_at: Timestamp);

    /// Returns false if the session was not registered
    async fn unregister(&self, session_id: &SessionId) -> bool;

    /// Send to one connection; false if unknown or closed
    async fn send_to(&self, session_id: &SessionId, event: ServerEvent) -> bool;

    /// Send to every connection; returns the number of successful deliveries
    async fn broadcast(&self, event: ServerEvent) -> usize;

    async fn count(&self) -> usize;
}

/// Entry of a process-wide ordered list that is broadcast on every change
pub trait CatalogEntry: Clone + Send + Sync + 'static {
    type Id: PartialEq + fmt::Display + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Event carrying the full list
    fn list_event(entries: Vec<Self>) -> ServerEvent;
}

impl CatalogEntry for Sticker {
    type Id = StickerId;

    fn id(&self) -> &StickerId {
        &self.id
    }

    fn list_event(entries: Vec<Self>) -> ServerEvent {
        ServerEvent::Stickers(entries)
    }
}

impl CatalogEntry for ScheduledRoom {
    type Id = ScheduledRoomId;

    fn id(&self) -> &ScheduledRoomId {
        &self.id
    }

    fn list_event(entries: Vec<Self>) -> ServerEvent {
        ServerEvent::ScheduledRooms(entries)
    }
}

/// Process-wide ordered list (Sticker Registry, Scheduled-Room Board).
///
/// Mutations broadcast the full list to every connection; the list order is
/// insertion order minus removals.
#[async_trait]
pub trait CatalogRepository<T: CatalogEntry>: Send + Sync {
    /// Append and broadcast; returns the new list
    async fn add(&self, entry: T) -> Vec<T>;

    /// Remove and broadcast; `None` (and no broadcast) if the id is unknown
    async fn remove(&self, id: &T::Id) -> Option<T>;

    async fn list(&self) -> Vec<T>;

    /// Send the current list to one connection only
    async fn send_current(&self, session_id: &SessionId);
}

/// Sticker Registry
pub type StickerRepository = dyn CatalogRepository<Sticker>;

/// Scheduled-Room Board
pub type ScheduledRoomRepository = dyn CatalogRepository<ScheduledRoom>;
