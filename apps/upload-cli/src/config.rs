//! Uploader configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/naspi/upload.toml`
//! - Windows: `%APPDATA%/naspi/upload.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the NASPi backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Chunk size in MiB (0 = default).
    #[serde(default = "default_chunk_size_mib")]
    pub chunk_size_mib: u64,

    /// How long a notification stays visible, in seconds.
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
}

fn default_server_url() -> String {
    naspi_protocol::constants::DEFAULT_SERVER_URL.into()
}

fn default_request_timeout_secs() -> u64 {
    naspi_protocol::constants::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_chunk_size_mib() -> u64 {
    (naspi_transfer::CHUNK_SIZE / (1024 * 1024)) as u64
}

fn default_notification_secs() -> u64 {
    naspi_upload::notify::DEFAULT_DURATION.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
            chunk_size_mib: default_chunk_size_mib(),
            notification_secs: default_notification_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the platform path, or creates a default if
    /// not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, writing defaults there if missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Chunk size in bytes; 0 lets the transmitter use its default.
    pub fn chunk_size(&self) -> usize {
        (self.chunk_size_mib as usize).saturating_mul(1024 * 1024)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("naspi")
            .join("upload.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("naspi").join("upload.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/naspi/upload.toml"))
    }
}
