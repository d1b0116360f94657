//! Local filesystem media store.
//!
//! Blobs live flat in one directory as `<uuid>.<ext>` and are exposed under
//! a URL prefix (`/uploads`, `/stickers`) served by the HTTP layer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};

use crate::domain::{MediaBlob, MediaConstraints, MediaStore, MediaStoreError, StoredMedia};

/// Media store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalMediaStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// `url_prefix` is the public path the directory is served under,
    /// without a trailing slash.
    pub async fn open(
        root: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Result<Self, MediaStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix, file_name)
    }

    /// Map a public URL back to a file inside the root.
    ///
    /// Only a single plain file name below the prefix is accepted, so a
    /// client-supplied URL can never point outside the directory.
    fn path_for(&self, url: &str) -> Result<PathBuf, MediaStoreError> {
        let foreign = || MediaStoreError::ForeignUrl(url.to_string());
        let file_name = url
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(foreign)?;
        let is_plain = !file_name.is_empty()
            && !file_name.starts_with('.')
            && file_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !is_plain {
            return Err(foreign());
        }
        Ok(self.root.join(file_name))
    }
}

/// File extension for a MIME type; unknown subtypes fall back to `bin`
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/webm" => "weba",
        _ => "bin",
    }
}

/// Write the whole blob and flush it
async fn write_blob<W: AsyncWrite + Unpin>(writer: &mut W, data: &[u8]) -> std::io::Result<()> {
    writer.write_all(data).await?;
    writer.flush().await
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        blob: MediaBlob,
        constraints: MediaConstraints,
    ) -> Result<StoredMedia, MediaStoreError> {
        let kind = constraints.check(&blob)?;

        let file_name = format!(
            "{}.{}",
            uuid::Uuid::new_v4(),
            extension_for(&blob.content_type)
        );
        let file_path = self.root.join(&file_name);

        let mut file = fs::File::create(&file_path).await?;
        if let Err(err) = write_blob(&mut file, &blob.data).await {
            tracing::error!("Failed to write media file {:?}: {}", file_path, err);
            drop(file);
            // Clean up partial file
            let _ = fs::remove_file(&file_path).await;
            return Err(err.into());
        }

        tracing::info!(
            "Stored {} bytes of {} as {:?}",
            blob.data.len(),
            kind,
            file_path
        );
        Ok(StoredMedia {
            url: self.url_for(&file_name),
            kind,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaStoreError> {
        let path = self.path_for(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted media file {:?}", path);
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, MediaStoreError> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut urls = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                urls.push(self.url_for(name));
            }
        }
        // read_dir order is platform dependent
        urls.sort();
        Ok(urls)
    }
}
