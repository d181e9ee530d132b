//! Server configuration.
//!
//! Values come from environment variables (`BIND_ADDR`, `PORT`,
//! `DATABASE_PATH`, `STRICT_STATUS_CODES`) with built-in defaults; the
//! binary layers command-line flags on top.

use std::path::PathBuf;

use crime_api_database::db::DEFAULT_DB_PATH;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Path of the `SQLite` incidents database.
    pub database_path: PathBuf,
    /// Report insert conflicts as `409` and missing deletes as `404`
    /// instead of `500`.
    pub strict_status_codes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            strict_status_codes: false,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment, falling back
    /// to defaults for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{p}'");
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            database_path: lookup("DATABASE_PATH").map_or(defaults.database_path, PathBuf::from),
            strict_status_codes: lookup("STRICT_STATUS_CODES")
                .is_some_and(|v| parse_flag(&v)),
        }
    }
}

/// Interprets `1`, `true`, `yes`, and `on` (any case) as enabled.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9090"),
            ("DATABASE_PATH", "/tmp/crime.sqlite3"),
            ("STRICT_STATUS_CODES", "TRUE"),
        ]));

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/tmp/crime.sqlite3"));
        assert!(config.strict_status_codes);
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "eighty"),
            ("STRICT_STATUS_CODES", "nope"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.strict_status_codes);
    }
}
