//! Media store abstraction for attachments and stickers.

use std::fmt;

use async_trait::async_trait;

use super::error::MediaStoreError;

/// Coarse kind of a media blob, derived from its MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Classify a MIME type such as `image/png`.
    ///
    /// Parameters (`; charset=...`) are ignored. Returns `None` for anything
    /// that is not image, video or audio.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let (top, _) = essence.split_once('/')?;
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded blob together with its declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaBlob {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
        }
    }
}

/// Acceptance rules for a store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConstraints {
    pub max_size: usize,
    pub allowed_kinds: Vec<MediaKind>,
}

impl MediaConstraints {
    /// Attachments: images, videos and audio
    pub fn attachment(max_size: usize) -> Self {
        Self {
            max_size,
            allowed_kinds: vec![MediaKind::Image, MediaKind::Video, MediaKind::Audio],
        }
    }

    /// Stickers: images only
    pub fn sticker(max_size: usize) -> Self {
        Self {
            max_size,
            allowed_kinds: vec![MediaKind::Image],
        }
    }

    /// Check a blob against the constraints.
    ///
    /// # Errors
    ///
    /// `TooLarge` when over the cap, `WrongKind` when the MIME type is not allowed
    pub fn check(&self, blob: &MediaBlob) -> Result<MediaKind, MediaStoreError> {
        if blob.data.len() > self.max_size {
            return Err(MediaStoreError::TooLarge {
                max: self.max_size,
                actual: blob.data.len(),
            });
        }
        match MediaKind::from_mime(&blob.content_type) {
            Some(kind) if self.allowed_kinds.contains(&kind) => Ok(kind),
            _ => Err(MediaStoreError::WrongKind(blob.content_type.clone())),
        }
    }
}

/// Location of a stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
    pub kind: MediaKind,
}

/// Blob storage used for chat attachments and stickers.
///
/// Implementations must be safe to call from many connections at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a blob that satisfies `constraints` and return its public URL
    async fn store(
        &self,
        blob: MediaBlob,
        constraints: MediaConstraints,
    ) -> Result<StoredMedia, MediaStoreError>;

    /// Delete the blob behind `url`. A missing file is not an error.
    async fn delete(&self, url: &str) -> Result<(), MediaStoreError>;

    /// URLs of every blob currently stored
    async fn list(&self) -> Result<Vec<String>, MediaStoreError>;
}
