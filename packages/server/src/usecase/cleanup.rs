//! 添付ファイル・ステッカーの実体削除
//!
//! 削除は切り離したタスクで行い、失敗はログに残すだけで呼び出し元には返さない。

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::MediaStore;

/// `urls` の blob をバックグラウンドで削除する（ベストエフォート、再試行なし）
pub fn spawn_media_cleanup(store: Arc<dyn MediaStore>, urls: Vec<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        for url in urls {
            match store.delete(&url).await {
                Ok(()) => tracing::debug!("Deleted media '{}'", url),
                Err(e) => tracing::warn!("Failed to delete media '{}': {}", url, e),
            }
        }
    })
}
