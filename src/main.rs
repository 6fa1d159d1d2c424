//! json-echo-server: a small HTTP/1.1 service
//!
//! Endpoints:
//! - `/hello` (any method): constant JSON greeting
//! - `/echo` (POST): parses the JSON body and sends it back
//!
//! Configuration is read once at startup from defaults, an optional TOML
//! file, `ECHO_*` environment variables and CLI flags.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

use error::StartupError;

fn main() -> ExitCode {
    let args = config::CliArgs::parse();

    // Every startup failure, bind included, ends here with a non-zero exit
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &config::CliArgs) -> Result<(), StartupError> {
    let cfg = config::Config::load(args)?;
    logger::init(&cfg.logging)?;
    let addr = cfg.get_socket_addr()?;

    // Create the Tokio runtime, sized by server.workers when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg, addr))
}

async fn async_main(cfg: config::Config, addr: SocketAddr) -> Result<(), StartupError> {
    let listener = server::create_listener(addr)?;
    let bound_addr = listener.local_addr().unwrap_or(addr);
    logger::log_server_start(&bound_addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg));
    tracing::debug!(routes = ?state.routes.paths().collect::<Vec<_>>(), "Route table ready");

    server::start_server_loop(listener, state).await;
    Ok(())
}
