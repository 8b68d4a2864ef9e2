// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub videos: VideosConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Video library configuration
#[derive(Debug, Deserialize, Clone)]
pub struct VideosConfig {
    /// Directory holding one subdirectory per video
    pub root: String,
    /// Base URL used when building manifest links (defaults to `http://host:port`)
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Directory names hidden from the `/api/videos` catalog
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_exclude() -> Vec<String> {
    vec!["export".to_string()]
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Idle gap allowed between keep-alive requests (seconds, 0 disables keep-alive)
    pub keep_alive_timeout: u64,
    /// Time allowed for a request head to arrive (seconds)
    pub read_timeout: u64,
    /// Drain deadline for open connections at shutdown (seconds)
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    /// Send no-cache headers with manifests so players never reuse a stale MPD
    pub manifest_no_cache: bool,
}
