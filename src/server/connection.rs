// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 on it in its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

/// Serve one connection in a spawned task.
///
/// The whole connection, keep-alive requests included, is bounded by
/// [`connection_timeout`]. The counter is decremented when the task finishes.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = connection_timeout(performance);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive_enabled(performance));

        let service_state = Arc::clone(&state);
        let service = service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        });
        let conn = builder.serve_connection(io, service);

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_connection_timeout(timeout_duration.as_secs()),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Upper bound on a connection's lifetime: `max(read_timeout, write_timeout)` seconds
pub fn connection_timeout(performance: &PerformanceConfig) -> Duration {
    Duration::from_secs(performance.read_timeout.max(performance.write_timeout))
}

/// `keep_alive_timeout` is an on/off switch; 0 closes the connection after each response
pub const fn keep_alive_enabled(performance: &PerformanceConfig) -> bool {
    performance.keep_alive_timeout > 0
}
