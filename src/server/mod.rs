// Server module entry
// Listener creation, connection handling and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use listener::create_listener;

/// Accept connections until SIGTERM or Ctrl+C, then drain
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    serve(listener, state, signal::shutdown_signal()).await
}

/// Accept connections until `shutdown` resolves.
///
/// Open connections then finish their current response and close. Returns
/// once all are gone or `performance.write_timeout` seconds have passed.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_info(&format!(
        "Stopped accepting connections, draining {} active",
        active_connections.load(Ordering::SeqCst)
    ));

    let deadline = Duration::from_secs(state.config.performance.write_timeout);
    tokio::select! {
        () = graceful.shutdown() => logger::log_info("All connections closed"),
        () = tokio::time::sleep(deadline) => {
            logger::log_warning(&format!(
                "{} connections still open after {}s, closing",
                active_connections.load(Ordering::SeqCst),
                deadline.as_secs()
            ));
        }
    }

    Ok(())
}
