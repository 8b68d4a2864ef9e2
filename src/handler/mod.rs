//! Request handler module
//!
//! Request routing dispatch, the JSON API, and manifest/segment serving.

pub mod api;
pub mod files;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
