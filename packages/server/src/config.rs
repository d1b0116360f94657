//! Command line / environment configuration of the server.

use std::path::PathBuf;

use clap::Parser;

/// Default attachment size cap (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
/// Default sticker size cap (2 MiB)
pub const DEFAULT_MAX_STICKER_BYTES: usize = 2 * 1024 * 1024;

/// Real-time chat server
#[derive(Debug, Clone, Parser)]
#[command(name = "tamariba-server", version, about)]
pub struct ServerConfig {
    /// Host name or address to bind
    #[arg(long, env = "TAMARIBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind (0 picks a free port)
    #[arg(long, env = "TAMARIBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding chat attachments
    #[arg(long, env = "TAMARIBA_UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: PathBuf,

    /// Directory holding sticker images
    #[arg(long, env = "TAMARIBA_STICKER_DIR", default_value = "./stickers")]
    pub sticker_dir: PathBuf,

    /// Maximum attachment size in bytes
    #[arg(long, env = "TAMARIBA_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Maximum sticker size in bytes
    #[arg(long, env = "TAMARIBA_MAX_STICKER_BYTES", default_value_t = DEFAULT_MAX_STICKER_BYTES)]
    pub max_sticker_bytes: usize,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "TAMARIBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしで既定値が使われる
        // given (前提条件):
        let args = ["tamariba-server"];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.sticker_dir, PathBuf::from("./stickers"));
        assert_eq!(config.max_upload_bytes, 26_214_400);
        assert_eq!(config.max_sticker_bytes, 2_097_152);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_flags_override_defaults() {
        // テスト項目: フラグで設定を上書きできる
        let config = ServerConfig::try_parse_from([
            "tamariba-server",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--max-sticker-bytes",
            "1024",
        ])
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_sticker_bytes, 1024);
    }
}
