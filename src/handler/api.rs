//! JSON endpoints: service info, health, listings and the player catalog.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::AppState;
use crate::http;
use crate::library::{self, path, CatalogEntry};
use crate::logger;

/// Routes advertised by the service info endpoint
const ENDPOINTS: &[&str] = &[
    "/",
    "/health",
    "/videos",
    "/videos/{path}",
    "/mpd",
    "/mpd/{video_name}",
    "/mpd/{video_name}/{file_name}",
    "/api/videos",
    "/test-mpd/{video_name}",
];

#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Catalog {
    videos: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
struct ManifestProbe {
    status: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// `GET /`
pub fn service_info(is_head: bool) -> Response<Full<Bytes>> {
    let info = ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
        endpoints: ENDPOINTS,
    };
    http::build_json_response(StatusCode::OK, &info, is_head)
}

/// `GET /health`. Never touches the filesystem.
pub fn health(is_head: bool) -> Response<Full<Bytes>> {
    http::build_json_response(StatusCode::OK, &HealthStatus { status: "ok" }, is_head)
}

/// `GET /videos`
pub async fn list_videos(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.library.list_videos().await {
        Ok(videos) => http::build_json_response(StatusCode::OK, &videos, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to list videos: {e}"));
            http::build_error_response(&e)
        }
    }
}

/// `GET /mpd`
pub async fn list_manifests(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.library.list_manifests().await {
        Ok(manifests) => http::build_json_response(StatusCode::OK, &manifests, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to list manifests: {e}"));
            http::build_error_response(&e)
        }
    }
}

/// `GET /api/videos`
pub async fn catalog(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state
        .library
        .catalog(&state.public_base_url, &state.config.videos.exclude)
        .await
    {
        Ok(videos) => http::build_json_response(StatusCode::OK, &Catalog { videos }, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to build video catalog: {e}"));
            http::build_error_response(&e)
        }
    }
}

/// `GET /test-mpd/{video_name}`: reports whether the master manifest exists
pub async fn probe_manifest(state: &AppState, raw_name: &str, is_head: bool) -> Response<Full<Bytes>> {
    let video = match path::decode_name(raw_name) {
        Ok(v) => v,
        Err(e) => return http::build_error_response(&e),
    };
    let relative = format!("{video}/{}", library::master_manifest_name(&video));

    let probe = match state.library.master_manifest(&video).await {
        Ok(_) => ManifestProbe {
            status: "exists",
            path: relative,
            url: Some(library::master_manifest_url(&state.public_base_url, &video)),
        },
        Err(_) => ManifestProbe {
            status: "not_found",
            path: relative,
            url: None,
        },
    };
    http::build_json_response(StatusCode::OK, &probe, is_head)
}
