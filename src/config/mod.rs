// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::LibraryError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `DASHVOD_VIDEOS__ROOT=/srv/videos`
pub const ENV_PREFIX: &str = "DASHVOD";

impl Config {
    /// Load configuration from specified file path (extension optional).
    /// Missing files are fine; environment variables override file values.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("videos.exclude")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("videos.root", "videos")?
            .set_default("videos.exclude", vec!["export"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", concat!("dashvod/", env!("CARGO_PKG_VERSION")))?
            .set_default("http.enable_cors", true)?
            .set_default("http.manifest_no_cache", true)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load using the first CLI argument as config path, falling back to `config`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Base URL for links handed out by the catalog endpoints
    pub fn public_base_url(&self) -> String {
        self.videos.public_base_url.as_ref().map_or_else(
            || format!("http://{}:{}", self.server.host, self.server.port),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// Canonicalize the videos root; a missing root is fatal misconfiguration
    pub fn resolve_videos_root(&self) -> Result<PathBuf, LibraryError> {
        let root = PathBuf::from(&self.videos.root);
        let canonical = root.canonicalize().map_err(|e| {
            LibraryError::Misconfigured(format!(
                "videos root '{}' is not accessible: {e}",
                root.display()
            ))
        })?;
        if !canonical.is_dir() {
            return Err(LibraryError::Misconfigured(format!(
                "videos root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/dashvod-test-config").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.videos.root, "videos");
        assert_eq!(cfg.videos.exclude, vec!["export".to_string()]);
        assert!(cfg.http.enable_cors);
        assert!(cfg.http.manifest_no_cache);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashvod.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[videos]\nroot = \"/srv/media\"\npublic_base_url = \"https://cdn.example.com/\"\n",
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.videos.root, "/srv/media");
        assert_eq!(cfg.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_public_base_url_fallback() {
        let cfg = Config::load_from("does-not-exist/dashvod-test-config").unwrap();
        assert_eq!(cfg.public_base_url(), "http://127.0.0.1:8000");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_resolve_videos_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from("does-not-exist/dashvod-test-config").unwrap();

        cfg.videos.root = dir.path().to_string_lossy().into_owned();
        let root = cfg.resolve_videos_root().unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());

        cfg.videos.root = dir.path().join("missing").to_string_lossy().into_owned();
        assert!(matches!(
            cfg.resolve_videos_root(),
            Err(LibraryError::Misconfigured(_))
        ));

        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        cfg.videos.root = file.to_string_lossy().into_owned();
        assert!(matches!(
            cfg.resolve_videos_root(),
            Err(LibraryError::Misconfigured(_))
        ));
    }
}
