//! Infrastructure layer: DTOs, repositories and media storage.

pub mod dto;
pub mod media;
pub mod repository;
