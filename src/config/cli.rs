// Command line arguments
// CLI flags override every other configuration source

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "json-echo-server")]
#[command(version)]
#[command(about = "HTTP service with a greeting endpoint and a JSON echo endpoint", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (extension optional, missing file is ignored)
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Address to bind to (e.g. 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}
