// Configuration module entry point
// Loads layered configuration once at startup and exposes the shared runtime state

mod cli;
mod state;
mod types;

use std::net::SocketAddr;

use crate::error::StartupError;

// Re-export public types
pub use cli::CliArgs;
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServiceConfig};

impl Config {
    /// Load configuration for the given command line.
    ///
    /// Sources in increasing priority: defaults, config file, `ECHO_*`
    /// environment variables, CLI flags.
    pub fn load(args: &CliArgs) -> Result<Self, config::ConfigError> {
        Self::load_with_overrides(&args.config, args.host.as_deref(), args.port)
    }

    /// Load configuration from specified file path (extension optional)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_overrides(config_path, None, None)
    }

    fn load_with_overrides(
        config_path: &str,
        host: Option<&str>,
        port: Option<u16>,
    ) -> Result<Self, config::ConfigError> {
        Self::load_layers(config_path, environment(), host, port)
    }

    fn load_layers(
        config_path: &str,
        env: config::Environment,
        host: Option<&str>,
        port: Option<u16>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("service.name", "Rust server")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Tokio-Hyper/1.0")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.max_json_depth", 10_000)?
            .set_override_option("server.host", host)?
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::InvalidAddress { addr, source })
    }
}

/// `ECHO_<SECTION>__<KEY>` variables, e.g. `ECHO_SERVER__PORT=9000`
fn environment() -> config::Environment {
    config::Environment::with_prefix("ECHO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
