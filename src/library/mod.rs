//! Video library module
//!
//! Read-only view of the videos root: one subdirectory per video, manifests
//! (`.mpd`) directly inside each video directory, segments anywhere below.
//! Nothing is cached; every call hits the filesystem.

pub mod path;

use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{LibraryError, Result};
use crate::logger;

/// Manifest file extension
pub const MANIFEST_EXTENSION: &str = "mpd";

/// One manifest file inside a video directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub video: String,
    pub file: String,
}

/// Catalog entry for a video that has a master manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub mpd_file: String,
    pub display_name: String,
}

/// Video library rooted at a canonical directory
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    root: PathBuf,
}

impl VideoLibrary {
    /// `root` must already be canonicalized
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the immediate subdirectories of the root, sorted
    pub async fn list_videos(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LibraryError::Misconfigured(format!(
                    "videos root '{}' disappeared",
                    self.root.display()
                ))
            } else {
                LibraryError::Io(e)
            }
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks, like a plain isdir() check
            let is_dir = fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir());
            if !is_dir {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => logger::log_warning(&format!(
                    "Skipping non UTF-8 video directory name: {raw:?}"
                )),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Every `.mpd` file across every video directory, grouped by video
    pub async fn list_manifests(&self) -> Result<Vec<ManifestEntry>> {
        let mut manifests = Vec::new();
        for video in self.list_videos().await? {
            let mut files = match self.manifests_in(&video).await {
                Ok(files) => files,
                // Directory vanished between listing and scanning
                Err(LibraryError::Io(e)) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            files.sort();
            manifests.extend(files.into_iter().map(|file| ManifestEntry {
                video: video.clone(),
                file,
            }));
        }
        Ok(manifests)
    }

    /// Videos that carry a master manifest named after their directory
    pub async fn catalog(&self, base_url: &str, exclude: &[String]) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();
        for video in self.list_videos().await? {
            if exclude.iter().any(|e| e == &video) {
                continue;
            }
            if self.master_manifest(&video).await.is_err() {
                continue;
            }
            entries.push(CatalogEntry {
                mpd_file: master_manifest_url(base_url, &video),
                display_name: path::display_name(&video),
                name: video,
            });
        }
        Ok(entries)
    }

    /// Directory of the named video; the name must match exactly
    pub async fn video_dir(&self, video: &str) -> Result<PathBuf> {
        path::validate_name(video)?;
        let dir = self.contain(&self.root.join(video)).await?;
        if !fs::metadata(&dir).await?.is_dir() {
            return Err(LibraryError::NotFound(format!("video '{video}' is not a directory")));
        }
        Ok(dir)
    }

    /// `{video}/{video}.mpd`
    pub async fn master_manifest(&self, video: &str) -> Result<PathBuf> {
        self.video_file(video, &master_manifest_name(video)).await
    }

    /// Named file directly inside a video directory. Any extension is accepted.
    pub async fn video_file(&self, video: &str, file: &str) -> Result<PathBuf> {
        let dir = self.video_dir(video).await?;
        path::validate_name(file)?;
        let candidate = dir.join(file);
        match fs::metadata(&candidate).await {
            Ok(m) if m.is_file() => {}
            Ok(_) => {
                return Err(LibraryError::NotFound(format!(
                    "'{video}/{file}' is not a file"
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LibraryError::NotFound(format!(
                    "file '{file}' missing in video '{video}'"
                )))
            }
            Err(e) => return Err(e.into()),
        }
        self.contain(&candidate).await
    }

    /// Resolve a raw (still percent-encoded) sub-path of the videos root
    pub async fn resolve(&self, raw_path: &str) -> Result<PathBuf> {
        let segments = path::split_relative(raw_path)?;
        if segments.is_empty() {
            return Err(LibraryError::NotFound("empty path".to_string()));
        }
        let candidate = segments
            .iter()
            .fold(self.root.clone(), |acc, segment| acc.join(segment));
        let resolved = self.contain(&candidate).await?;
        if !fs::metadata(&resolved).await?.is_file() {
            return Err(LibraryError::NotFound(format!("'{raw_path}' is not a file")));
        }
        Ok(resolved)
    }

    /// Read a resolved file; the handle is closed before returning
    pub async fn read(&self, file: &Path) -> Result<Vec<u8>> {
        fs::read(file).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LibraryError::NotFound(file.display().to_string())
            } else {
                LibraryError::Io(e)
            }
        })
    }

    async fn manifests_in(&self, video: &str) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(self.root.join(video)).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_manifest = path
                .extension()
                .is_some_and(|ext| ext == MANIFEST_EXTENSION);
            if !is_manifest || !fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                files.push(name);
            }
        }
        Ok(files)
    }

    /// Canonicalize `candidate` and require it to stay under the root
    async fn contain(&self, candidate: &Path) -> Result<PathBuf> {
        let canonical = match fs::canonicalize(candidate).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LibraryError::NotFound(candidate.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !canonical.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                candidate.display(),
                canonical.display()
            ));
            return Err(LibraryError::Forbidden(candidate.display().to_string()));
        }
        Ok(canonical)
    }
}

/// File name of a video's master manifest
pub fn master_manifest_name(video: &str) -> String {
    format!("{video}.{MANIFEST_EXTENSION}")
}

/// Public URL of a video's master manifest under the static mount
pub fn master_manifest_url(base_url: &str, video: &str) -> String {
    let encoded = path::encode_segment(video);
    format!("{base_url}/videos/{encoded}/{encoded}.{MANIFEST_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    /// videos/
    ///   alpha/alpha.mpd, alpha/alt.mpd, alpha/video/seg-1.m4s
    ///   beta/beta.mpd
    ///   big_buck_bunny/big_buck_bunny.mpd
    ///   empty/
    ///   export/export.mpd
    ///   notes.txt
    fn create_library() -> (tempfile::TempDir, VideoLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("videos");
        std_fs::create_dir_all(root.join("alpha/video")).unwrap();
        std_fs::create_dir_all(root.join("beta")).unwrap();
        std_fs::create_dir_all(root.join("big_buck_bunny")).unwrap();
        std_fs::create_dir_all(root.join("empty")).unwrap();
        std_fs::create_dir_all(root.join("export")).unwrap();
        std_fs::write(root.join("alpha/alpha.mpd"), b"<MPD id=\"alpha\"/>").unwrap();
        std_fs::write(root.join("alpha/alt.mpd"), b"<MPD id=\"alt\"/>").unwrap();
        std_fs::write(root.join("alpha/video/seg-1.m4s"), [0u8, 1, 2, 3]).unwrap();
        std_fs::write(root.join("beta/beta.mpd"), b"<MPD/>").unwrap();
        std_fs::write(root.join("big_buck_bunny/big_buck_bunny.mpd"), b"<MPD/>").unwrap();
        std_fs::write(root.join("export/export.mpd"), b"<MPD/>").unwrap();
        std_fs::write(root.join("notes.txt"), b"not a video").unwrap();
        std_fs::write(dir.path().join("secret.txt"), b"outside").unwrap();

        let library = VideoLibrary::new(root.canonicalize().unwrap());
        (dir, library)
    }

    #[tokio::test]
    async fn test_list_videos_only_directories_sorted() {
        let (_dir, library) = create_library();
        let videos = library.list_videos().await.unwrap();
        assert_eq!(
            videos,
            vec!["alpha", "beta", "big_buck_bunny", "empty", "export"]
        );
    }

    #[tokio::test]
    async fn test_list_videos_root_removed() {
        let (dir, library) = create_library();
        std_fs::remove_dir_all(dir.path().join("videos")).unwrap();
        assert!(matches!(
            library.list_videos().await,
            Err(LibraryError::Misconfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_list_manifests_each_once() {
        let (_dir, library) = create_library();
        let manifests = library.list_manifests().await.unwrap();
        let pairs: Vec<(&str, &str)> = manifests
            .iter()
            .map(|m| (m.video.as_str(), m.file.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("alpha", "alpha.mpd"),
                ("alpha", "alt.mpd"),
                ("beta", "beta.mpd"),
                ("big_buck_bunny", "big_buck_bunny.mpd"),
                ("export", "export.mpd"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_manifests_extension_is_exact() {
        let (dir, library) = create_library();
        std_fs::write(dir.path().join("videos/beta/LOUD.MPD"), b"<MPD/>").unwrap();
        std_fs::write(dir.path().join("videos/beta/beta.mpd.bak"), b"<MPD/>").unwrap();

        let manifests = library.list_manifests().await.unwrap();
        let beta: Vec<&str> = manifests
            .iter()
            .filter(|m| m.video == "beta")
            .map(|m| m.file.as_str())
            .collect();
        assert_eq!(beta, vec!["beta.mpd"]);
    }

    #[tokio::test]
    async fn test_catalog_excludes_and_requires_master() {
        let (_dir, library) = create_library();
        let catalog = library
            .catalog("http://localhost:8000", &["export".to_string()])
            .await
            .unwrap();
        let names: Vec<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "big_buck_bunny"]);
        assert_eq!(
            catalog[2].mpd_file,
            "http://localhost:8000/videos/big_buck_bunny/big_buck_bunny.mpd"
        );
        assert_eq!(catalog[2].display_name, "Big Buck Bunny");
    }

    #[tokio::test]
    async fn test_master_manifest() {
        let (_dir, library) = create_library();
        let path = library.master_manifest("alpha").await.unwrap();
        assert_eq!(library.read(&path).await.unwrap(), b"<MPD id=\"alpha\"/>");

        assert!(matches!(
            library.master_manifest("missing").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.master_manifest("empty").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.video_dir("notes.txt").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_video_file_accepts_any_name() {
        let (_dir, library) = create_library();
        assert!(library.video_file("alpha", "alt.mpd").await.is_ok());
        assert!(matches!(
            library.video_file("alpha", "video").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.video_file("alpha", "..").await,
            Err(LibraryError::Forbidden(_))
        ));
        assert!(matches!(
            library.video_file("..", "secret.txt").await,
            Err(LibraryError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_segment() {
        let (_dir, library) = create_library();
        let path = library.resolve("alpha/video/seg-1.m4s").await.unwrap();
        assert_eq!(library.read(&path).await.unwrap(), vec![0u8, 1, 2, 3]);

        assert!(matches!(
            library.resolve("alpha/video/seg-2.m4s").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.resolve("alpha/video").await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            library.resolve("").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_dir, library) = create_library();
        for path in ["../secret.txt", "alpha/../../secret.txt", "%2e%2e/secret.txt"] {
            assert!(
                matches!(library.resolve(path).await, Err(LibraryError::Forbidden(_))),
                "{path} escaped the root"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let (dir, library) = create_library();
        std::os::unix::fs::symlink(
            dir.path().join("secret.txt"),
            dir.path().join("videos/alpha/leak.m4s"),
        )
        .unwrap();
        assert!(matches!(
            library.resolve("alpha/leak.m4s").await,
            Err(LibraryError::Forbidden(_))
        ));
        assert!(matches!(
            library.video_file("alpha", "leak.m4s").await,
            Err(LibraryError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_new_files_visible_immediately() {
        let (dir, library) = create_library();
        assert!(library.resolve("beta/audio/seg-9.m4s").await.is_err());
        std_fs::create_dir_all(dir.path().join("videos/beta/audio")).unwrap();
        std_fs::write(dir.path().join("videos/beta/audio/seg-9.m4s"), b"fresh").unwrap();
        let path = library.resolve("beta/audio/seg-9.m4s").await.unwrap();
        assert_eq!(library.read(&path).await.unwrap(), b"fresh");
    }

    #[test]
    fn test_master_manifest_url_encodes() {
        assert_eq!(
            master_manifest_url("http://h", "my clip"),
            "http://h/videos/my%20clip/my%20clip.mpd"
        );
    }
}
