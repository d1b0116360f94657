//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの構成
//!
//! - ルーム名 → ルームの対応表を 1 つの Mutex で保護する（参照・追加・削除の間だけ保持）
//! - 各ルームはそれぞれ専用の Mutex を持つ（別のルームの操作は互いにブロックしない）
//! - 添付ファイルの所有者表（URL → 最初に投稿されたルーム）を 1 つの Mutex で保護する
//! - ロック順序は「ルーム → 所有者表 → 対応表」。join は対応表のロックを解放してからルームをロックする
//!
//! 新しいルームは対応表のロックを保持したまま自分のロックも取得してから登録する。
//! 作成とメンバーの追加の間で join が中断されても、メンバー 0 人のルームは残らない。
//!
//! 最後のメンバーが退出したルームは、ルームのロックを保持したまま closed にしてから
//! 対応表から外す。closed なルームを掴んだ join はそのルームを外してからやり直す。
//!
//! 破棄されたルームが解放する添付ファイルは、そのルームが所有する URL だけに絞る。
//! 他のルームのアップロードを参照しただけの投稿で、相手のファイルは消えない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    ChatMessage, JoinOutcome, LeaveOutcome, Member, MemberSnapshot, Room, RoomError, RoomName,
    RoomRepository, RoomSnapshot, SessionId, Timestamp,
};

type RoomSlot = Arc<Mutex<Room>>;

/// インメモリ Room Repository 実装
///
/// HashMap をインメモリ DB として使用する実装。
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomName, RoomSlot>>,
    attachment_owners: Mutex<HashMap<String, RoomName>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のルームをロックする。なければ作成し、ロックした状態で登録する
    async fn lock_or_create(&self, name: &RoomName) -> OwnedMutexGuard<Room> {
        let slot = {
            let mut rooms = self.rooms.lock().await;
            match rooms.get(name) {
                Some(slot) => slot.clone(),
                None => {
                    let slot = Arc::new(Mutex::new(Room::new(name.clone(), Timestamp::now())));
                    rooms.insert(name.clone(), slot.clone());
                    tracing::info!("Room '{}' created", name);
                    // 登録直後で他に誰も参照していないため競合しない
                    match slot.clone().try_lock_owned() {
                        Ok(guard) => return guard,
                        Err(_) => slot,
                    }
                }
            }
        };
        slot.lock_owned().await
    }

    async fn get(&self, name: &RoomName) -> Option<RoomSlot> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).cloned()
    }

    /// 閉じたルームを対応表から外す（同名の新しいルームは残す）
    async fn unlink(&self, name: &RoomName, slot: &RoomSlot) {
        let mut rooms = self.rooms.lock().await;
        if rooms.get(name).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            rooms.remove(name);
            tracing::info!("Room '{}' destroyed", name);
        }
    }

    fn snapshot(room: &Room) -> RoomSnapshot {
        RoomSnapshot {
            name: room.name.clone(),
            created_at: room.created_at,
            members: room
                .members()
                .iter()
                .map(|m| MemberSnapshot {
                    name: m.name.clone(),
                    joined_at: m.joined_at,
                })
                .collect(),
            message_count: room.messages().len(),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, room: RoomName, member: Member) -> JoinOutcome {
        let joined_at = member.joined_at;
        loop {
            let mut guard = self.lock_or_create(&room).await;
            if guard.is_closed() {
                // 最後のメンバーの退出と競合した。残っていれば外してから取り直す
                let slot = OwnedMutexGuard::mutex(&guard).clone();
                drop(guard);
                self.unlink(&room, &slot).await;
                continue;
            }
            return guard.join(member, joined_at);
        }
    }

    async fn post(
        &self,
        room: &RoomName,
        session_id: &SessionId,
        message: ChatMessage,
    ) -> Result<(), RoomError> {
        let slot = self
            .get(room)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room.to_string()))?;
        let mut guard = slot.lock().await;
        if guard.is_closed() {
            return Err(RoomError::RoomNotFound(room.to_string()));
        }
        let url = message.attachment().map(|a| a.url.clone());
        let mut owners = self.attachment_owners.lock().await;
        guard.post(session_id, message)?;
        if let Some(url) = url {
            owners.entry(url).or_insert_with(|| room.clone());
        }
        Ok(())
    }

    async fn leave(
        &self,
        room: &RoomName,
        session_id: &SessionId,
        timestamp: Timestamp,
    ) -> Result<LeaveOutcome, RoomError> {
        let slot = self
            .get(room)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room.to_string()))?;
        let mut guard = slot.lock().await;
        if guard.is_closed() {
            return Err(RoomError::RoomNotFound(room.to_string()));
        }
        let mut owners = self.attachment_owners.lock().await;
        let mut outcome = guard.leave(session_id, timestamp)?;
        if let Some(urls) = outcome.released_attachments.take() {
            let owned = urls
                .into_iter()
                .filter(|url| owners.get(url) == Some(room) && owners.remove(url).is_some())
                .collect();
            outcome.released_attachments = Some(owned);
        }
        drop(owners);
        if guard.is_closed() {
            self.unlink(room, &slot).await;
        }
        Ok(outcome)
    }

    async fn get_room(&self, room: &RoomName) -> Option<RoomSnapshot> {
        let slot = self.get(room).await?;
        let guard = slot.lock().await;
        (!guard.is_closed()).then(|| Self::snapshot(&guard))
    }

    async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let slots: Vec<RoomSlot> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(slots.len());
        for slot in slots {
            let guard = slot.lock().await;
            if !guard.is_closed() {
                snapshots.push(Self::snapshot(&guard));
            }
        }
        snapshots.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        snapshots
    }
}
