//! インメモリ実装（プロセス再起動で状態は消える）

pub mod catalog;
pub mod connection;
pub mod room;

pub use catalog::InMemoryCatalogRepository;
pub use connection::InMemoryConnectionRepository;
pub use room::InMemoryRoomRepository;
