//! Core domain models for the chat application.

use super::{
    error::RoomError,
    event::{EventSender, ServerEvent},
    value_object::{
        DisplayName, MessageContent, RoomName, ScheduledRoomId, ScheduledTime, SessionId,
        StickerId, Timestamp,
    },
};

/// Represents a chat room with its members and message history
#[derive(Debug)]
pub struct Room {
    /// Room identifier
    pub name: RoomName,
    /// Sessions currently joined, in join order
    members: Vec<Member>,
    /// Message history in the room, oldest first
    messages: Vec<ChatMessage>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Set once the last member left; a closed room accepts nothing
    closed: bool,
}

/// Result of a successful join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// History as it was before the join notice was appended
    pub history: Vec<ChatMessage>,
    /// Membership count after the join
    pub user_count: usize,
}

/// Result of a successful leave
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    /// Membership count after the leave
    pub user_count: usize,
    /// Attachment URLs of a room that was closed by this leave
    pub released_attachments: Option<Vec<String>>,
}

impl Room {
    /// Create a new empty room with the given name and creation timestamp
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            members: Vec::new(),
            messages: Vec::new(),
            created_at,
            closed: false,
        }
    }

    /// Add a member to the room.
    ///
    /// The joiner first receives the history as it was, then every member
    /// (joiner included) receives the join notice and the new count.
    pub fn join(&mut self, member: Member, timestamp: Timestamp) -> JoinOutcome {
        let history = self.messages.clone();
        member.deliver(ServerEvent::ChatHistory(history.clone()));

        let notice = ChatMessage::system(format!("{} joined the room", member.name), timestamp);
        self.members.push(member);
        self.append(notice);
        self.broadcast_user_count();

        JoinOutcome {
            history,
            user_count: self.members.len(),
        }
    }

    /// Append a message sent by a member and broadcast it to every member.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NotAMember` if the session is not joined here
    pub fn post(&mut self, session_id: &SessionId, message: ChatMessage) -> Result<(), RoomError> {
        if self.get_member(session_id).is_none() {
            return Err(self.not_a_member(session_id));
        }
        self.append(message);
        Ok(())
    }

    /// Remove a member, announce it, then broadcast the new count.
    ///
    /// When the last member leaves, the room is closed and the attachment
    /// URLs of its history are handed back for deletion.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NotAMember` if the session is not joined here
    pub fn leave(
        &mut self,
        session_id: &SessionId,
        timestamp: Timestamp,
    ) -> Result<LeaveOutcome, RoomError> {
        let Some(index) = self.members.iter().position(|m| &m.session_id == session_id) else {
            return Err(self.not_a_member(session_id));
        };
        let member = self.members.remove(index);

        // leave notice goes out before the updated count
        let notice = ChatMessage::system(format!("{} left the room", member.name), timestamp);
        self.append(notice);
        self.broadcast_user_count();

        let released_attachments = if self.members.is_empty() {
            self.closed = true;
            Some(self.attachment_urls())
        } else {
            None
        };

        Ok(LeaveOutcome {
            user_count: self.members.len(),
            released_attachments,
        })
    }

    /// Number of sessions currently joined
    pub fn user_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the room was closed by its last member leaving
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Message history, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Members in join order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Get a member by session ID
    pub fn get_member(&self, session_id: &SessionId) -> Option<&Member> {
        self.members.iter().find(|m| &m.session_id == session_id)
    }

    /// URLs of every attachment referenced by the history
    pub fn attachment_urls(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter_map(ChatMessage::attachment)
            .map(|a| a.url.clone())
            .collect()
    }

    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message.clone());
        self.broadcast(ServerEvent::Message(message));
    }

    fn broadcast_user_count(&self) {
        self.broadcast(ServerEvent::UserCount(self.members.len()));
    }

    fn broadcast(&self, event: ServerEvent) {
        for member in &self.members {
            member.deliver(event.clone());
        }
    }

    fn not_a_member(&self, session_id: &SessionId) -> RoomError {
        RoomError::NotAMember {
            room: self.name.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

/// Represents a session joined to a chat room
#[derive(Debug, Clone)]
pub struct Member {
    /// Joined session
    pub session_id: SessionId,
    /// Display name chosen at join time
    pub name: DisplayName,
    /// Timestamp when the session joined
    pub joined_at: Timestamp,
    /// Outbound queue of the session's connection
    sender: EventSender,
}

impl Member {
    /// Create a new member
    pub fn new(
        session_id: SessionId,
        name: DisplayName,
        joined_at: Timestamp,
        sender: EventSender,
    ) -> Self {
        Self {
            session_id,
            name,
            joined_at,
            sender,
        }
    }

    /// Push an event to the member's connection.
    ///
    /// A closed queue means the connection is going away; its own
    /// disconnect handling will remove the member.
    fn deliver(&self, event: ServerEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!(
                "Outbound queue of session {} is closed, dropping event",
                self.session_id
            );
        }
    }
}

/// Reference to an uploaded media blob attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub media_type: Option<String>,
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    /// Notice generated by the server
    System { text: String, timestamp: Timestamp },
    /// Message sent by a member
    User {
        name: DisplayName,
        text: Option<MessageContent>,
        attachment: Option<Attachment>,
        sticker_url: Option<String>,
        timestamp: Timestamp,
    },
}

impl ChatMessage {
    /// Create a new system message
    pub fn system(text: String, timestamp: Timestamp) -> Self {
        Self::System { text, timestamp }
    }

    /// Attachment carried by a user message, if any
    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Self::User { attachment, .. } => attachment.as_ref(),
            Self::System { .. } => None,
        }
    }
}

/// Sticker in the global palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker {
    pub id: StickerId,
    pub url: String,
}

impl Sticker {
    pub fn new(id: StickerId, url: String) -> Self {
        Self { id, url }
    }
}

/// Announced future room shown on the landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRoom {
    pub id: ScheduledRoomId,
    pub name: RoomName,
    pub time: ScheduledTime,
}

impl ScheduledRoom {
    pub fn new(id: ScheduledRoomId, name: RoomName, time: ScheduledTime) -> Self {
        Self { id, name, time }
    }
}
