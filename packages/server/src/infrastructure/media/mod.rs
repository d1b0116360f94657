//! Media store implementations.

pub mod local;

pub use local::LocalMediaStore;
