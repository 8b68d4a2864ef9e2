//! HTTP cache control module
//!
//! Provides `ETag` generation, conditional request handling and the
//! `Cache-Control` policies used for manifests and segments.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single `ETag`, a comma-separated list, and the `*` wildcard.
/// Returns true if matched (should return 304).
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Cache control policy attached to a file response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds), validated by `ETag`
    Public(u32),
    /// Never reuse without asking again; also sends `Pragma` and `Expires`
    NoStore,
}

impl CachePolicy {
    /// Segments are immutable once packaged
    pub const SEGMENT: Self = Self::Public(3600);

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoStore => "no-cache, no-store, must-revalidate".to_string(),
        }
    }

    /// Whether conditional requests (`If-None-Match`) are honored
    pub const fn uses_etag(self) -> bool {
        matches!(self, Self::Public(_))
    }

    /// Policy for manifests, depending on `http.manifest_no_cache`
    pub const fn for_manifest(no_cache: bool) -> Self {
        if no_cache {
            Self::NoStore
        } else {
            Self::SEGMENT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_consistency() {
        let etag1 = generate_etag(b"same content");
        let etag2 = generate_etag(b"same content");
        assert_eq!(etag1, etag2);
        assert_ne!(etag1, generate_etag(b"other content"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(CachePolicy::SEGMENT.to_header_value(), "public, max-age=3600");
        assert_eq!(
            CachePolicy::NoStore.to_header_value(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(CachePolicy::for_manifest(true), CachePolicy::NoStore);
        assert_eq!(CachePolicy::for_manifest(false), CachePolicy::SEGMENT);
        assert!(!CachePolicy::NoStore.uses_etag());
    }
}
