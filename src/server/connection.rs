// Connection handling module
// Accepts single TCP connections and serves them with hyper

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, enforcing `max_connections`.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    if let Err(e) = stream.set_nodelay(true) {
        logger::log_debug(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Serve one connection in a spawned task.
///
/// hyper's header read timer runs whenever the connection waits for a request
/// head, so it bounds both slow clients and idle keep-alive gaps. A response
/// that is already being written is never cut off.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);
    let perf = &state.config.performance;

    let mut builder = http1::Builder::new();
    builder
        .keep_alive(perf.keep_alive_timeout > 0)
        .timer(TokioTimer::new())
        .header_read_timeout(header_timeout(perf.read_timeout, perf.keep_alive_timeout));

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        }),
    );
    // Finishes the in-flight response, then closes, once shutdown starts
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Wait allowed for the next request head: `read_timeout`, shortened to
/// `keep_alive_timeout` when keep-alive is on and that is smaller.
fn header_timeout(read_timeout: u64, keep_alive_timeout: u64) -> Duration {
    let secs = if keep_alive_timeout > 0 {
        read_timeout.min(keep_alive_timeout)
    } else {
        read_timeout
    };
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_timeout() {
        assert_eq!(header_timeout(30, 75), Duration::from_secs(30));
        assert_eq!(header_timeout(30, 5), Duration::from_secs(5));
        assert_eq!(header_timeout(30, 0), Duration::from_secs(30));
    }
}
