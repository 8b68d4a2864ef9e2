//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! video library and routing.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_error_response,
    build_file_response, build_json_response, build_options_response,
};
