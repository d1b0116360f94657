//! UseCase: 添付ファイルのアップロード処理
//!
//! アップロードされたファイルは保存するだけで、メッセージへの添付は
//! クライアントが返された URL を `send-message` に載せて行う。

use std::sync::Arc;

use crate::domain::{MediaBlob, MediaConstraints, MediaStore, StoredMedia};

use super::error::UploadError;

/// 添付ファイルアップロードのユースケース
pub struct UploadAttachmentUseCase {
    uploads: Arc<dyn MediaStore>,
    max_size: usize,
}

impl UploadAttachmentUseCase {
    /// 新しい UploadAttachmentUseCase を作成
    pub fn new(uploads: Arc<dyn MediaStore>, max_size: usize) -> Self {
        Self { uploads, max_size }
    }

    /// 画像・動画・音声ファイルを保存し、公開 URL を返す
    pub async fn execute(&self, blob: MediaBlob) -> Result<StoredMedia, UploadError> {
        let size = blob.data.len();
        let stored = self
            .uploads
            .store(blob, MediaConstraints::attachment(self.max_size))
            .await?;

        tracing::info!("Stored {} attachment at '{}' ({} bytes)", stored.kind, stored.url, size);
        Ok(stored)
    }
}
