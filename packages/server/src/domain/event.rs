//! Outbound events delivered to a connection.

use tokio::sync::mpsc;

use super::entity::{ChatMessage, ScheduledRoom, Sticker};

/// Event pushed to a single connection's outbound queue.
///
/// Every variant maps to one named event of the wire protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full room history, sent once to a joining session
    ChatHistory(Vec<ChatMessage>),
    /// A message appended to the room history
    Message(ChatMessage),
    /// Number of sessions currently joined to the room
    UserCount(usize),
    /// Current scheduled-room board
    ScheduledRooms(Vec<ScheduledRoom>),
    /// Current sticker palette
    Stickers(Vec<Sticker>),
}

/// Sending half of a connection's outbound queue.
///
/// Unbounded so that fan-out under a registry lock never waits on a slow socket.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Receiving half of a connection's outbound queue.
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;
