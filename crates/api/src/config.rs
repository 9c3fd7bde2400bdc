use std::path::PathBuf;

use tokenprint_core::printing::DEFAULT_PRINT_COMMAND;
use tokenprint_core::token::DEFAULT_TOKEN_TTL_SECS;
use tokenprint_core::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a single kiosk on a local network.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://tokenprint.db`).
    pub database_url: String,
    /// Directory holding uploaded documents (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Lifetime of a job token in seconds (default: 24 hours).
    pub token_ttl_secs: i64,
    /// Whether jobs must be paid before they can be printed (default: `true`).
    pub payment_required: bool,
    /// Mark every upload as paid immediately, for testing without a
    /// payment provider (default: `false`).
    pub simulate_payment: bool,
    /// Print command line; the file path is appended (default: `lp`).
    pub print_command: String,
    /// Printer name passed as `-d <name>`; system default when unset.
    pub printer_name: Option<String>,
    /// Admin session lifetime in hours (default: `12`).
    pub session_ttl_hours: i64,
    /// Add the `Secure` attribute to the session cookie (default: `false`).
    pub cookie_secure: bool,
    /// HTTP request timeout in seconds for non-print routes (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `5000`                   |
    /// | `DATABASE_URL`         | `sqlite://tokenprint.db` |
    /// | `UPLOAD_DIR`           | `uploads`                |
    /// | `MAX_UPLOAD_BYTES`     | `52428800`               |
    /// | `TOKEN_TTL_SECS`       | `86400`                  |
    /// | `PAYMENT_REQUIRED`     | `true`                   |
    /// | `SIMULATE_PAYMENT`     | `false`                  |
    /// | `PRINT_COMMAND`        | `lp`                     |
    /// | `PRINTER_NAME`         | unset                    |
    /// | `SESSION_TTL_HOURS`    | `12`                     |
    /// | `COOKIE_SECURE`        | `false`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    ///
    /// # Panics
    ///
    /// Panics if a numeric or boolean variable cannot be parsed, so that
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tokenprint.db".into());

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let token_ttl_secs: i64 = std::env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .expect("TOKEN_TTL_SECS must be a valid i64");

        let print_command =
            std::env::var("PRINT_COMMAND").unwrap_or_else(|_| DEFAULT_PRINT_COMMAND.into());

        let printer_name = std::env::var("PRINTER_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let session_ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "12".into())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            upload_dir,
            max_upload_bytes,
            token_ttl_secs,
            payment_required: bool_from_env("PAYMENT_REQUIRED", true),
            simulate_payment: bool_from_env("SIMULATE_PAYMENT", false),
            print_command,
            printer_name,
            session_ttl_hours,
            cookie_secure: bool_from_env("COOKIE_SECURE", false),
            request_timeout_secs,
        }
    }
}

/// Read a boolean flag, accepting `true/false`, `1/0`, `yes/no`, `on/off`.
fn bool_from_env(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value).unwrap_or_else(|| panic!("{name} must be a boolean")),
        Err(_) => default,
    }
}

/// Parse a human-friendly boolean. Also used for HTML form checkboxes.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
