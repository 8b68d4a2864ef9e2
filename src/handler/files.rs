//! Manifest and segment file serving
//!
//! Every handler resolves through the video library, so the containment
//! check runs before any file is opened.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;

use crate::config::AppState;
use crate::error::LibraryError;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, CachePolicy};
use crate::library::path;
use crate::logger;

/// `GET /mpd/{video_name}`
pub async fn serve_master_manifest(
    ctx: &RequestContext<'_>,
    state: &AppState,
    raw_video: &str,
) -> Response<Full<Bytes>> {
    let resolved = match path::decode_name(raw_video) {
        Ok(video) => state.library.master_manifest(&video).await,
        Err(e) => Err(e),
    };
    serve_resolved(ctx, state, resolved).await
}

/// `GET /mpd/{video_name}/{file_name}`; the extension is not enforced
pub async fn serve_video_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    raw_video: &str,
    raw_file: &str,
) -> Response<Full<Bytes>> {
    let resolved = match (path::decode_name(raw_video), path::decode_name(raw_file)) {
        (Ok(video), Ok(file)) => state.library.video_file(&video, &file).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    serve_resolved(ctx, state, resolved).await
}

/// `GET /videos/{...path}`
pub async fn serve_static(
    ctx: &RequestContext<'_>,
    state: &AppState,
    raw_path: &str,
) -> Response<Full<Bytes>> {
    let resolved = state.library.resolve(raw_path).await;
    serve_resolved(ctx, state, resolved).await
}

async fn serve_resolved(
    ctx: &RequestContext<'_>,
    state: &AppState,
    resolved: Result<std::path::PathBuf, LibraryError>,
) -> Response<Full<Bytes>> {
    let file = match resolved {
        Ok(file) => file,
        Err(e) => return reject(ctx, &e),
    };

    let data = match state.library.read(&file).await {
        Ok(data) => data,
        Err(e) => return reject(ctx, &e),
    };

    let content_type = mime::content_type_for(&file);
    let policy = cache_policy(&file, state.config.http.manifest_no_cache);
    http::build_file_response(
        data,
        content_type,
        policy,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
    )
}

fn cache_policy(file: &Path, manifest_no_cache: bool) -> CachePolicy {
    if mime::content_type_for(file) == mime::DASH_MANIFEST {
        CachePolicy::for_manifest(manifest_no_cache)
    } else {
        CachePolicy::SEGMENT
    }
}

fn reject(ctx: &RequestContext<'_>, err: &LibraryError) -> Response<Full<Bytes>> {
    match err {
        // Common, no need to log at warning level
        LibraryError::NotFound(detail) => {
            logger::log_debug(&format!("{} not found: {detail}", ctx.path));
        }
        LibraryError::Forbidden(_) => {
            logger::log_warning(&format!("Forbidden path requested: {} ({err})", ctx.path));
        }
        LibraryError::Misconfigured(_) | LibraryError::Io(_) => {
            logger::log_error(&format!("Failed to serve {}: {err}", ctx.path));
        }
    }
    http::build_error_response(err)
}
