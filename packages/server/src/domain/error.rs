//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} bytes (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} bytes (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// ScheduledTime validation error
    #[error("ScheduledTime cannot be empty")]
    ScheduledTimeEmpty,

    /// ScheduledTime too long error
    #[error("ScheduledTime cannot exceed {max} bytes (got {actual})")]
    ScheduledTimeTooLong { max: usize, actual: usize },

    /// Identifier is not a valid UUID
    #[error("Identifier must be a valid UUID (got: {0})")]
    InvalidId(String),

    /// A user message carries neither text, attachment nor sticker
    #[error("Message must contain text, an attachment or a sticker")]
    MessageBodyEmpty,
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The room does not exist (or was closed while waiting for it)
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// The session is not a member of the room
    #[error("Session {session_id} is not a member of room '{room}'")]
    NotAMember { room: String, session_id: String },
}

/// Errors related to the session state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session already joined a room
    #[error("Session has already joined room '{0}'")]
    AlreadyInRoom(String),

    /// The session has not joined any room yet
    #[error("Session has not joined a room")]
    NotInRoom,

    /// The session is terminated
    #[error("Session is disconnected")]
    Disconnected,
}

/// Errors returned by a media store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaStoreError {
    /// Blob exceeds the size cap
    #[error("File too large: maximum {max} bytes allowed (got {actual})")]
    TooLarge { max: usize, actual: usize },

    /// Blob kind is not accepted
    #[error("File type '{0}' is not allowed")]
    WrongKind(String),

    /// URL does not point into this store
    #[error("URL '{0}' does not belong to this media store")]
    ForeignUrl(String),

    /// Underlying IO failure
    #[error("Media store IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MediaStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
