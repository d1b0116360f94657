//! InMemory Connection Repository 実装
//!
//! 接続中の全クライアントの送信チャンネルを保持し、全体への配信に使う。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionRepository, EventSender, ServerEvent, SessionId, Timestamp};

/// Client connection information
pub struct ClientInfo {
    /// Outbound event channel
    pub sender: EventSender,
    /// Unix timestamp when connected (UTC, milliseconds)
    pub connected_at: Timestamp,
}

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connected_clients: Mutex<HashMap<SessionId, ClientInfo>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, session_id: SessionId, sender: EventSender, connected_at: Timestamp) {
        let mut clients = self.connected_clients.lock().await;
        clients.insert(
            session_id,
            ClientInfo {
                sender,
                connected_at,
            },
        );
    }

    async fn unregister(&self, session_id: &SessionId) -> bool {
        let mut clients = self.connected_clients.lock().await;
        let Some(info) = clients.remove(session_id) else {
            return false;
        };
        tracing::debug!(
            "Session '{}' unregistered after {} ms",
            session_id,
            Timestamp::now().value() - info.connected_at.value()
        );
        true
    }

    async fn send_to(&self, session_id: &SessionId, event: ServerEvent) -> bool {
        let clients = self.connected_clients.lock().await;
        clients
            .get(session_id)
            .is_some_and(|info| info.sender.send(event).is_ok())
    }

    async fn broadcast(&self, event: ServerEvent) -> usize {
        let clients = self.connected_clients.lock().await;
        let mut delivered = 0;
        for (id, info) in clients.iter() {
            if info.sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!("Failed to send broadcast to client '{}'", id);
            }
        }
        delivered
    }

    async fn count(&self) -> usize {
        let clients = self.connected_clients.lock().await;
        clients.len()
    }
}
