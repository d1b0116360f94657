//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, ScheduledRoom, ServerEvent, Sticker};

/// Event received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(JoinRoomPayload),
    SendMessage(SendMessagePayload),
    PublishRoom(PublishRoomPayload),
    RemoveScheduled(RemoveByIdPayload),
    RemoveSticker(RemoveByIdPayload),
}

/// Join request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub name: String,
}

/// New chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_url: Option<String>,
}

/// Scheduled room announcement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishRoomPayload {
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub time: String,
}

/// Removal request for a sticker or a scheduled room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveByIdPayload {
    pub id: String,
}

/// Event sent to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEventDto {
    ChatHistory(Vec<MessageDto>),
    Message(MessageDto),
    UserCount(usize),
    ScheduledRooms(Vec<ScheduledRoomDto>),
    Stickers(Vec<StickerDto>),
}

/// Chat message as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum MessageDto {
    System {
        text: String,
        /// Unix timestamp (milliseconds since epoch) in UTC
        timestamp: i64,
    },
    User {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sticker_url: Option<String>,
        timestamp: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerDto {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRoomDto {
    pub id: String,
    pub name: String,
    pub time: String,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        match message {
            ChatMessage::System { text, timestamp } => Self::System {
                text: text.clone(),
                timestamp: timestamp.value(),
            },
            ChatMessage::User {
                name,
                text,
                attachment,
                sticker_url,
                timestamp,
            } => Self::User {
                name: name.to_string(),
                text: text.as_ref().map(|t| t.to_string()),
                file_url: attachment.as_ref().map(|a| a.url.clone()),
                media_type: attachment.as_ref().and_then(|a| a.media_type.clone()),
                sticker_url: sticker_url.clone(),
                timestamp: timestamp.value(),
            },
        }
    }
}

impl From<&Sticker> for StickerDto {
    fn from(sticker: &Sticker) -> Self {
        Self {
            id: sticker.id.to_string(),
            url: sticker.url.clone(),
        }
    }
}

impl From<&ScheduledRoom> for ScheduledRoomDto {
    fn from(room: &ScheduledRoom) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.to_string(),
            time: room.time.as_str().to_string(),
        }
    }
}

impl From<&ServerEvent> for ServerEventDto {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::ChatHistory(messages) => {
                Self::ChatHistory(messages.iter().map(MessageDto::from).collect())
            }
            ServerEvent::Message(message) => Self::Message(message.into()),
            ServerEvent::UserCount(count) => Self::UserCount(*count),
            ServerEvent::ScheduledRooms(rooms) => {
                Self::ScheduledRooms(rooms.iter().map(ScheduledRoomDto::from).collect())
            }
            ServerEvent::Stickers(stickers) => {
                Self::Stickers(stickers.iter().map(StickerDto::from).collect())
            }
        }
    }
}
