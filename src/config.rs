//! Server configuration.
//!
//! Loaded from an optional YAML file (path in `LANTERN_CONFIG`), then
//! overridden by the `LISTEN` and `DOC_ROOT` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

/// Listener and per-connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:8080"
    pub listen_addr: String,
    /// Per-read idle timeout in milliseconds
    pub idle_timeout_ms: u64,
    /// Upper bound on bytes buffered while waiting for a request terminator
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory static files are served from
    pub doc_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            idle_timeout_ms: 5_000,
            max_request_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// The idle timeout armed before every read on a connection.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            doc_root: PathBuf::from("./www"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("LANTERN_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(doc_root) = std::env::var("DOC_ROOT") {
            cfg.static_files.doc_root = PathBuf::from(doc_root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    /// Checks that the document root exists and is a directory.
    pub fn validate(&self) -> Result<()> {
        let root = &self.static_files.doc_root;
        let meta = std::fs::metadata(root)
            .with_context(|| format!("Document root {} is not accessible", root.display()))?;

        if !meta.is_dir() {
            anyhow::bail!("Document root {} is not a directory", root.display());
        }

        Ok(())
    }
}
