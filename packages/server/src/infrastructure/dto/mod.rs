//! Data transfer objects for the HTTP API and the WebSocket protocol.

pub mod http;
pub mod websocket;
