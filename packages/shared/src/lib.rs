//! Shared utilities for Tamariba.

pub mod logger;
pub mod time;
