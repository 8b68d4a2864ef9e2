// Application state module
// Immutable runtime state shared by all connections

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::library::VideoLibrary;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Video library rooted at the canonicalized videos directory
    pub library: VideoLibrary,
    /// Base URL used for catalog links
    pub public_base_url: String,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` for an already validated, canonical videos root
    pub fn new(config: &Config, videos_root: PathBuf) -> Self {
        Self {
            config: config.clone(),
            library: VideoLibrary::new(videos_root),
            public_base_url: config.public_base_url(),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
