//! Process-level errors returned by `run_server`.

use thiserror::Error;

use crate::domain::MediaStoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to open media store: {0}")]
    MediaStore(#[from] MediaStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
