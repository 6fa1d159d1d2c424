//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup from the logging configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Connection error and warning logging

mod format;

pub use format::AccessLogEntry;

use std::fmt::Display;
use std::net::SocketAddr;

use tracing::{debug, error, info, warn, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::error::{RequestError, StartupError};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when set. Log events go to stderr so
/// stdout carries only the startup line. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), StartupError> {
    subscriber(config, std::io::stderr)
        .try_init()
        .map_err(|e| StartupError::Logging(e.to_string()))
}

fn subscriber<W>(config: &LoggingConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("Server is running on port {}", addr.port());
    info!(
        addr = %addr,
        service = %config.service.name,
        workers = ?config.server.workers,
        max_body_size = config.http.max_body_size,
        max_connections = ?config.performance.max_connections,
        access_log = config.logging.access_log,
        "Listener bound"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_rejected(active: usize, max_connections: u64) {
    warn!("Max connections reached: {active}/{max_connections}. Connection rejected.");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    warn!("Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(seconds: u64) {
    warn!("Connection timeout after {seconds} seconds");
}

pub fn log_accept_error(err: &std::io::Error) {
    error!("Failed to accept connection: {err}");
}

/// Request errors are answered locally; the detail only goes to debug output
pub fn log_request_error(method: &hyper::Method, path: &str, err: &RequestError) {
    match err {
        RequestError::MalformedBody(source) => {
            debug!("{method} {path} rejected: {err} ({source})");
        }
        _ => debug!("{method} {path} rejected: {err}"),
    }
}

pub fn log_unmatched_path(path: &str) {
    debug!("No route for {path}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    info!(target: "access", "{}", entry.format(format));
}

/// Report a fatal startup error. Falls back to stderr when no subscriber is installed yet.
pub fn log_fatal(err: &dyn Display) {
    if tracing::dispatcher::has_been_set() {
        error!("[FATAL] {err}");
    } else {
        eprintln!("[FATAL] {err}");
    }
}
