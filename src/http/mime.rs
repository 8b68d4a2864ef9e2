//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.
//! Covers the files a DASH packager emits plus a few common companions.

use std::path::Path;

/// Content type for DASH manifests
pub const DASH_MANIFEST: &str = "application/dash+xml";

/// Fallback for anything unrecognized
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension (case-insensitive)
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        // DASH manifests and segments
        "mpd" => DASH_MANIFEST,
        "m4s" => "video/iso.segment",
        "m4v" => "video/mp4",
        "m4a" => "audio/mp4",
        "mp4" | "cmfv" => "video/mp4",
        "cmfa" => "audio/mp4",
        "webm" => "video/webm",
        "weba" => "audio/webm",
        "ts" => "video/mp2t",
        "m3u8" => "application/vnd.apple.mpegurl",

        // Subtitles
        "vtt" => "text/vtt",
        "ttml" => "application/ttml+xml",

        // Text
        "xml" => "application/xml",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",

        // Images (thumbnails, posters)
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",

        // Default
        _ => OCTET_STREAM,
    }
}

/// Content type for a file path
pub fn content_type_for(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}
