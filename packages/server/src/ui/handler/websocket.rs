//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{EventSender, Session},
    infrastructure::dto::websocket::{ClientEvent, SendMessagePayload, ServerEventDto},
    ui::state::AppState,
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, JoinRoomUseCase,
        PublishScheduledRoomUseCase, RemoveScheduledRoomUseCase, RemoveStickerUseCase,
        SendMessageInput, SendMessageUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Outbound queue of this connection. Rooms and catalogs push into it.
    let (tx, mut rx) = mpsc::unbounded_channel();

    let connect_usecase = ConnectSessionUseCase::new(
        state.connections.clone(),
        state.stickers.clone(),
        state.scheduled_rooms.clone(),
    );
    let session = connect_usecase.execute(tx.clone()).await;
    let session_id = session.id();
    let session = Arc::new(Mutex::new(session));

    // Spawn a task to receive events from this client
    let state_clone = state.clone();
    let session_clone = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on session {}: {}", session_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from {}: {}", session_id, text.as_str());
                    match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(event) => {
                            dispatch(&state_clone, &session_clone, &tx, event).await;
                        }
                        Err(e) => {
                            tracing::warn!("Ignoring malformed event from {}: {}", session_id, e);
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Session {} requested close", session_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&ServerEventDto::from(&event)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event for {}: {}", session_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectSessionUseCase::new(
        state.rooms.clone(),
        state.connections.clone(),
        state.uploads.clone(),
    );
    let mut session = session.lock().await;
    disconnect_usecase.execute(&mut session).await;
    tracing::info!("Session {} closed", session_id);
}

/// Run the use case for one client event. Failures are logged and dropped.
async fn dispatch(
    state: &AppState,
    session: &Mutex<Session>,
    sender: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::JoinRoom(payload) => {
            let mut session = session.lock().await;
            let usecase = JoinRoomUseCase::new(state.rooms.clone());
            if let Err(e) = usecase
                .execute(&mut session, sender.clone(), payload.room, payload.name)
                .await
            {
                tracing::warn!("join-room from {} rejected: {}", session.id(), e);
            }
        }
        ClientEvent::SendMessage(payload) => {
            let session = session.lock().await;
            let usecase = SendMessageUseCase::new(state.rooms.clone());
            if let Err(e) = usecase.execute(&session, payload.into()).await {
                tracing::warn!("send-message from {} dropped: {}", session.id(), e);
            }
        }
        ClientEvent::PublishRoom(payload) => {
            let usecase = PublishScheduledRoomUseCase::new(state.scheduled_rooms.clone());
            if let Err(e) = usecase.execute(payload.room, payload.time).await {
                tracing::warn!("publish-room rejected: {}", e);
            }
        }
        ClientEvent::RemoveScheduled(payload) => {
            RemoveScheduledRoomUseCase::new(state.scheduled_rooms.clone())
                .execute(&payload.id)
                .await;
        }
        ClientEvent::RemoveSticker(payload) => {
            // Blob deletion runs detached
            RemoveStickerUseCase::new(state.stickers.clone(), state.sticker_store.clone())
                .execute(&payload.id)
                .await;
        }
    }
}

impl From<SendMessagePayload> for SendMessageInput {
    fn from(payload: SendMessagePayload) -> Self {
        Self {
            text: payload.text,
            file_url: payload.file_url,
            media_type: payload.media_type,
            sticker_url: payload.sticker_url,
        }
    }
}
