//! InMemory Catalog Repository 実装
//!
//! ステッカー一覧と予定ルーム一覧のように、プロセス全体で 1 つだけ存在し、
//! 変更のたびに全クライアントへ一覧全体を配信するリストの実装。
//!
//! 一覧の変更と配信は一覧のロックを保持したまま行うため、
//! 各クライアントには変更順どおりの一覧が届く。ロック順序は「一覧 → 接続」。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CatalogEntry, CatalogRepository, ConnectionRepository, SessionId};

/// インメモリ Catalog Repository 実装
pub struct InMemoryCatalogRepository<T> {
    entries: Mutex<Vec<T>>,
    connections: Arc<dyn ConnectionRepository>,
}

impl<T: CatalogEntry> InMemoryCatalogRepository<T> {
    /// 空の一覧で作成
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self::with_entries(Vec::new(), connections)
    }

    /// 起動時に既存の項目を読み込んで作成（配信はしない）
    pub fn with_entries(entries: Vec<T>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self {
            entries: Mutex::new(entries),
            connections,
        }
    }
}

#[async_trait]
impl<T: CatalogEntry> CatalogRepository<T> for InMemoryCatalogRepository<T> {
    async fn add(&self, entry: T) -> Vec<T> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);
        let snapshot = entries.clone();
        let delivered = self.connections.broadcast(T::list_event(snapshot.clone())).await;
        tracing::debug!("Broadcasted list of {} entries to {} clients", snapshot.len(), delivered);
        snapshot
    }

    async fn remove(&self, id: &T::Id) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let index = entries.iter().position(|e| e.id() == id)?;
        let removed = entries.remove(index);
        self.connections
            .broadcast(T::list_event(entries.clone()))
            .await;
        Some(removed)
    }

    async fn list(&self) -> Vec<T> {
        let entries = self.entries.lock().await;
        entries.clone()
    }

    async fn send_current(&self, session_id: &SessionId) {
        let entries = self.entries.lock().await;
        if !self
            .connections
            .send_to(session_id, T::list_event(entries.clone()))
            .await
        {
            tracing::warn!("Failed to send current list to session {}", session_id);
        }
    }
}
