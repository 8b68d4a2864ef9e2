//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, dispatching and access logging.

use crate::config::AppState;
use crate::handler::{api, files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Everything needed from the request is copied out up front so no borrow of
/// the body type is held across an await.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let version = req.version();
    let if_none_match = header_string(&req, IF_NONE_MATCH);
    let referer = header_string(&req, REFERER);
    let user_agent = header_string(&req, USER_AGENT);
    drop(req);

    let mut response = match check_http_method(&method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match,
            };
            route_request(&ctx, &state).await
        }
    };
    http::apply_common_headers(&mut response, &state.config.http);

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = format_version(version);
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path
pub async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match ctx.path {
        "/" => return api::service_info(ctx.is_head),
        // Health check never depends on the filesystem
        "/health" => return api::health(ctx.is_head),
        "/videos" | "/videos/" => return api::list_videos(state, ctx.is_head).await,
        "/mpd" | "/mpd/" => return api::list_manifests(state, ctx.is_head).await,
        "/api/videos" => return api::catalog(state, ctx.is_head).await,
        _ => {}
    }

    if let Some(raw_name) = ctx.path.strip_prefix("/test-mpd/") {
        return api::probe_manifest(state, raw_name, ctx.is_head).await;
    }

    if let Some(rest) = ctx.path.strip_prefix("/mpd/") {
        let segments: Vec<&str> = rest.split('/').collect();
        return match segments.as_slice() {
            [video] => files::serve_master_manifest(ctx, state, video).await,
            [video, file] => files::serve_video_file(ctx, state, video, file).await,
            _ => http::build_404_response(),
        };
    }

    if let Some(rest) = ctx.path.strip_prefix("/videos/") {
        return files::serve_static(ctx, state, rest).await;
    }

    http::build_404_response()
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn format_version(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string()
}
