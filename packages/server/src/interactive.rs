//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, database path, and status-code
//! style before starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the corresponding value of `defaults`. The
/// resulting [`ServerConfig`] is passed to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(defaults: ServerConfig) -> std::io::Result<()> {
    println!("Crime API Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let database_path: String = Input::new()
        .with_prompt("Database path")
        .default(defaults.database_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.database_path.display().to_string());

    let strict_status_codes = Confirm::new()
        .with_prompt("Use 409/404 for conflicts and missing incidents (instead of 500)?")
        .default(defaults.strict_status_codes)
        .interact()
        .unwrap_or(defaults.strict_status_codes);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        database_path: PathBuf::from(database_path),
        strict_status_codes,
    })
    .await
}
