//! Test fixtures shared by the integration tests.
//!
//! `TestServer` runs the real router on an ephemeral port with its own
//! temporary media directories. `WsClient` speaks the JSON event protocol.
#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tamariba_server::{
    ServerConfig,
    config::{DEFAULT_MAX_STICKER_BYTES, DEFAULT_MAX_UPLOAD_BYTES},
    ui::{build_app, build_state},
};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// How long a test waits for an expected event
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    config: ServerConfig,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with default limits
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a server after adjusting its configuration.
    ///
    /// The media directories do not exist yet when `configure` runs.
    pub async fn start_with(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let root = std::env::temp_dir().join(format!("tamariba-it-{}", uuid::Uuid::new_v4()));
        let mut config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            upload_dir: root.join("uploads"),
            sticker_dir: root.join("stickers"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sticker_bytes: DEFAULT_MAX_STICKER_BYTES,
            log_level: "debug".to_string(),
        };
        configure(&mut config);

        let state = build_state(&config)
            .await
            .expect("Failed to build server state");
        let app = build_app(state, &config);

        let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server stopped unexpectedly");
        });

        Self {
            addr,
            root,
            config,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.config.upload_dir
    }

    pub fn sticker_dir(&self) -> &PathBuf {
        &self.config.sticker_dir
    }

    /// File on disk behind a public media URL such as `/uploads/x.png`
    pub fn media_path(&self, url: &str) -> PathBuf {
        let (dir, name) = url
            .trim_start_matches('/')
            .split_once('/')
            .expect("Media URL should have a directory and a file name");
        match dir {
            "uploads" => self.upload_dir().join(name),
            "stickers" => self.sticker_dir().join(name),
            other => panic!("Unknown media directory: {other}"),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Wait until `condition` holds, polling for up to `RECV_TIMEOUT`
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Connect and consume the initial `stickers` and `scheduled-rooms` lists
    pub async fn connect(server: &TestServer) -> Self {
        let mut client = Self::connect_raw(server).await;
        client.recv_event("stickers").await;
        client.recv_event("scheduled-rooms").await;
        client
    }

    /// Connect without consuming anything
    pub async fn connect_raw(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        self.send_text(json!({ "event": event, "data": data }).to_string())
            .await;
    }

    pub async fn send_text(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Join a room and consume the joiner's own history, notice and count
    pub async fn join(&mut self, room: &str, name: &str) -> Value {
        self.send("join-room", json!({ "room": room, "name": name }))
            .await;
        let history = self.recv_event("chat-history").await;
        self.recv_event("message").await;
        self.recv_event("user-count").await;
        history
    }

    /// Next JSON frame
    pub async fn recv(&mut self) -> Value {
        tokio::time::timeout(RECV_TIMEOUT, async {
            loop {
                let frame = self
                    .stream
                    .next()
                    .await
                    .expect("WebSocket closed")
                    .expect("WebSocket error");
                if let Message::Text(text) = frame {
                    return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                }
            }
        })
        .await
        .expect("Timed out waiting for a frame")
    }

    /// Next frame, which must be `event`; returns its data
    pub async fn recv_event(&mut self, event: &str) -> Value {
        let frame = self.recv().await;
        assert_eq!(frame["event"], event, "unexpected frame: {frame}");
        frame["data"].clone()
    }

    /// True if no frame arrives within `wait`
    pub async fn is_silent_for(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.stream.next()).await.is_err()
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
