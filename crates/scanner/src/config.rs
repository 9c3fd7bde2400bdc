use std::time::Duration;

/// Default capture command: one 640x480 JPEG frame on stdout.
pub const DEFAULT_CAPTURE_COMMAND: &str = "fswebcam -q --no-banner -r 640x480 -";

/// Scanner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Base URL of the tokenprint server (default: `http://localhost:5000`).
    pub server_url: String,
    /// Command that writes one image frame to stdout.
    pub capture_command: String,
    /// Delay between frames (default: 100 ms).
    pub scan_interval: Duration,
    /// How long a token is ignored after the server answered for it (default: 3 s).
    pub cooldown: Duration,
}

impl ScannerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                |
    /// |----------------------|----------------------------------------|
    /// | `SERVER_URL`         | `http://localhost:5000`                |
    /// | `CAPTURE_COMMAND`    | `fswebcam -q --no-banner -r 640x480 -` |
    /// | `SCAN_INTERVAL_MS`   | `100`                                  |
    /// | `SCAN_COOLDOWN_SECS` | `3`                                    |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable cannot be parsed.
    pub fn from_env() -> Self {
        let server_url = std::env::var("SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into())
            .trim_end_matches('/')
            .to_string();

        let capture_command =
            std::env::var("CAPTURE_COMMAND").unwrap_or_else(|_| DEFAULT_CAPTURE_COMMAND.into());

        let scan_interval_ms: u64 = std::env::var("SCAN_INTERVAL_MS")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("SCAN_INTERVAL_MS must be a valid u64");

        let cooldown_secs: u64 = std::env::var("SCAN_COOLDOWN_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("SCAN_COOLDOWN_SECS must be a valid u64");

        Self {
            server_url,
            capture_command,
            scan_interval: Duration::from_millis(scan_interval_ms),
            cooldown: Duration::from_secs(cooldown_secs),
        }
    }
}
