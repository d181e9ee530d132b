#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for querying and editing crime incidents.
//!
//! Serves the incident code and neighborhood reference tables plus a
//! filterable incident listing, and accepts single-incident inserts and
//! deletes. All state lives in one `SQLite` database opened at startup and
//! shared by every worker through [`AppState`].

pub mod config;
pub mod error;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error::InternalError, middleware, web};
use crime_api_database::{db, ensure_schema};
use crime_api_server_models::ApiErrorBody;
use switchy_database::Database;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Incidents database connection.
    pub db: Arc<dyn Database>,
    /// Use `409`/`404` for conflicts and missing cases instead of `500`.
    pub strict_status_codes: bool,
}

/// Registers the API routes and the extractor configuration that turns
/// malformed JSON bodies into `400` responses.
///
/// The caller supplies [`AppState`] via `App::app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiErrorBody {
            error: format!("Invalid request body: {err}"),
        });
        InternalError::from_response(err, response).into()
    });

    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiErrorBody {
            error: format!("Invalid query string: {err}"),
        });
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .route("/health", web::get().to(handlers::health))
        .route("/codes", web::get().to(handlers::codes))
        .route("/neighborhoods", web::get().to(handlers::neighborhoods))
        .route("/incidents", web::get().to(handlers::incidents))
        .route("/new-incident", web::put().to(handlers::new_incident))
        .route("/remove-incident", web::delete().to(handlers::remove_incident));
}

/// Starts the crime API server.
///
/// Opens the `SQLite` database, verifies the schema, and runs the
/// Actix-Web HTTP server until it is shut down. This is a regular async
/// function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the database cannot be opened,
/// the schema check fails, or the HTTP server fails to bind or encounters
/// a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Opening database {}...", config.database_path.display());
    let db_conn =
        db::open(&config.database_path).map_err(|e| std::io::Error::other(e.to_string()))?;

    ensure_schema(db_conn.as_ref())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        strict_status_codes: config.strict_status_codes,
    });

    if config.strict_status_codes {
        log::info!("Strict status codes enabled (409 conflict, 404 not found)");
    }

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
