//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), each with a sensible default so the
//! relay runs with no configuration at all.

use std::net::SocketAddr;
use std::path::PathBuf;

/// File name of the generated join QR code inside the static directory.
pub const QR_FILE_NAME: &str = "qrcode.png";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Directory served at `/static` (QR code, uploads).
    pub static_dir: PathBuf,

    /// Capacity of each connection's outbound message queue.
    pub outbound_queue_capacity: usize,

    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let static_dir = PathBuf::from(
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        );

        let outbound_queue_capacity = parse_env("OUTBOUND_QUEUE_CAPACITY", 256);
        let max_upload_bytes = parse_env("MAX_UPLOAD_BYTES", 256 * 1024 * 1024);

        Ok(Self {
            listen_addr,
            static_dir,
            outbound_queue_capacity,
            max_upload_bytes,
        })
    }

    /// Directory where uploaded files are stored.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }

    /// Path of the generated join QR code PNG.
    #[must_use]
    pub fn qr_path(&self) -> PathBuf {
        self.static_dir.join(QR_FILE_NAME)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
