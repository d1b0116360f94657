//! UseCase: ステッカー追加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AddStickerUseCase::execute() メソッド
//! - 画像の保存とステッカー一覧への追加・全体配信
//!
//! ### なぜこのテストが必要か
//! - 画像以外やサイズ超過のファイルがステッカーとして登録されないことを保証
//! - 保存に失敗した場合は一覧が変わらず、配信も行われないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：画像を追加すると一覧全体が全クライアントに届く
//! - 異常系：画像以外の MIME タイプ、保存先のエラー

use std::sync::Arc;

use crate::domain::{
    MediaBlob, MediaConstraints, MediaStore, Sticker, StickerIdFactory, StickerRepository,
};

use super::error::UploadError;

/// ステッカー追加のユースケース
pub struct AddStickerUseCase {
    stickers: Arc<StickerRepository>,
    /// ステッカー画像の保存先
    sticker_store: Arc<dyn MediaStore>,
    max_size: usize,
}

impl AddStickerUseCase {
    /// 新しい AddStickerUseCase を作成
    pub fn new(
        stickers: Arc<StickerRepository>,
        sticker_store: Arc<dyn MediaStore>,
        max_size: usize,
    ) -> Self {
        Self {
            stickers,
            sticker_store,
            max_size,
        }
    }

    /// ステッカー追加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Sticker)` - 追加されたステッカー（一覧は配信済み）
    /// * `Err(UploadError)` - 保存に失敗（一覧は変更されない）
    pub async fn execute(&self, blob: MediaBlob) -> Result<Sticker, UploadError> {
        let stored = self
            .sticker_store
            .store(blob, MediaConstraints::sticker(self.max_size))
            .await?;

        let sticker = Sticker::new(StickerIdFactory::generate(), stored.url);
        let list = self.stickers.add(sticker.clone()).await;

        tracing::info!(
            "Sticker {} added at '{}' ({} stickers)",
            sticker.id,
            sticker.url,
            list.len()
        );
        Ok(sticker)
    }
}
