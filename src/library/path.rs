//! Request path sanitization
//!
//! Turns raw URL path segments into plain file names that are safe to join
//! onto the videos root. Containment is still verified after
//! canonicalization; this is the lexical first pass.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{LibraryError, Result};

/// Characters escaped when a name is placed into a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-decode one raw URL segment and validate it as a single file name
pub fn decode_name(raw: &str) -> Result<String> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| LibraryError::NotFound(format!("non UTF-8 path segment '{raw}'")))?
        .into_owned();
    validate_name(&decoded)?;
    Ok(decoded)
}

/// Check that `name` names exactly one entry inside a directory
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." {
        return Err(LibraryError::NotFound(format!("invalid name '{name}'")));
    }
    if name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(LibraryError::Forbidden(name.to_string()));
    }
    Ok(())
}

/// Split a relative URL path into decoded segments.
///
/// Empty and `.` segments are dropped, any `..` segment is rejected outright
/// rather than normalized.
pub fn split_relative(path: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    for raw in path.split('/') {
        if raw.is_empty() || raw == "." {
            continue;
        }
        segments.push(decode_name(raw)?);
    }
    Ok(segments)
}

/// Percent-encode a name for use as one URL path segment
pub fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}

/// Human readable title: underscores become spaces, words are title-cased
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_name() {
        assert_eq!(decode_name("sample").unwrap(), "sample");
        assert_eq!(decode_name("my%20video").unwrap(), "my video");
        assert!(matches!(decode_name(""), Err(LibraryError::NotFound(_))));
        assert!(matches!(decode_name(".."), Err(LibraryError::Forbidden(_))));
        assert!(matches!(decode_name("%2e%2e"), Err(LibraryError::Forbidden(_))));
        assert!(matches!(decode_name("a%2Fb"), Err(LibraryError::Forbidden(_))));
        assert!(matches!(decode_name("a%5Cb"), Err(LibraryError::Forbidden(_))));
        assert!(matches!(decode_name("a%00"), Err(LibraryError::Forbidden(_))));
    }

    #[test]
    fn test_split_relative() {
        assert_eq!(
            split_relative("sample/video/seg-1.m4s").unwrap(),
            vec!["sample", "video", "seg-1.m4s"]
        );
        assert_eq!(
            split_relative("/sample//./init.mp4").unwrap(),
            vec!["sample", "init.mp4"]
        );
        assert!(split_relative("").unwrap().is_empty());
    }

    #[test]
    fn test_split_relative_rejects_traversal() {
        for path in [
            "../etc/passwd",
            "sample/../../secret",
            "sample/%2e%2e/%2e%2e/secret",
            "sample/..",
        ] {
            assert!(
                matches!(split_relative(path), Err(LibraryError::Forbidden(_))),
                "expected {path} to be rejected"
            );
        }
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("sample"), "sample");
        assert_eq!(encode_segment("my video#1"), "my%20video%231");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("big_buck_bunny"), "Big Buck Bunny");
        assert_eq!(display_name("SINTEL_trailer"), "Sintel Trailer");
        assert_eq!(display_name("clip2go"), "Clip2Go");
        assert_eq!(display_name(""), "");
    }
}
