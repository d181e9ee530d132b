#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the crime API server.

use std::path::PathBuf;

use clap::Parser;
use crime_api_server::ServerConfig;

#[derive(Parser)]
#[command(name = "crime_api_server", about = "Crime incident HTTP API")]
struct Cli {
    /// Address to bind to (overrides `BIND_ADDR`)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,

    /// Path of the `SQLite` database (overrides `DATABASE_PATH`)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Report conflicts as 409 and missing incidents as 404 instead of 500
    #[arg(long)]
    strict_status_codes: bool,

    /// Prompt for configuration before starting
    #[arg(long)]
    interactive: bool,
}

impl Cli {
    fn into_config(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = self.database {
            config.database_path = database;
        }
        config.strict_status_codes |= self.strict_status_codes;
        config
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let interactive = cli.interactive;
    let config = cli.into_config(ServerConfig::from_env());

    if interactive {
        crime_api_server::interactive::run(config).await
    } else {
        crime_api_server::run_server(config).await
    }
}
