//! UseCase: ステッカー削除処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RemoveStickerUseCase::execute() メソッド
//! - 一覧からの削除・全体配信と、画像ファイルの削除
//!
//! ### なぜこのテストが必要か
//! - 不明な ID や不正な ID の削除要求では何も起こらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：削除すると一覧が配信され、画像ファイルも削除される
//! - エッジケース：存在しない ID、UUID として不正な ID

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{MediaStore, StickerId, StickerRepository};

use super::cleanup::spawn_media_cleanup;

/// ステッカー削除のユースケース
pub struct RemoveStickerUseCase {
    stickers: Arc<StickerRepository>,
    sticker_store: Arc<dyn MediaStore>,
}

impl RemoveStickerUseCase {
    /// 新しい RemoveStickerUseCase を作成
    pub fn new(stickers: Arc<StickerRepository>, sticker_store: Arc<dyn MediaStore>) -> Self {
        Self {
            stickers,
            sticker_store,
        }
    }

    /// ステッカー削除を実行
    ///
    /// # Returns
    ///
    /// 削除した場合は画像ファイル削除タスク、何も削除しなかった場合は `None`
    pub async fn execute(&self, id: &str) -> Option<JoinHandle<()>> {
        let id = match StickerId::parse(id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("Ignoring sticker removal: {}", e);
                return None;
            }
        };

        let Some(removed) = self.stickers.remove(&id).await else {
            tracing::debug!("Sticker {} not found, nothing removed", id);
            return None;
        };

        tracing::info!("Sticker {} removed", removed.id);
        Some(spawn_media_cleanup(
            self.sticker_store.clone(),
            vec![removed.url],
        ))
    }
}
