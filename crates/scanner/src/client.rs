//! HTTP client for `POST /api/v1/print/{token}`.

use async_trait::async_trait;
use serde::Deserialize;

/// Errors talking to the tokenprint server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// The server's answer to a print request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintReply {
    /// The job was printed.
    Printed,
    /// The server refused or failed the job (not paid, expired, printer error, ...).
    Rejected {
        status: u16,
        code: String,
        message: String,
    },
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Asks the server to print a scanned token.
#[async_trait]
pub trait PrintTrigger: Send + Sync {
    async fn request_print(&self, token: &str) -> Result<PrintReply, ClientError>;
}

/// [`PrintTrigger`] backed by the tokenprint HTTP API.
pub struct PrintClient {
    client: reqwest::Client,
    server_url: String,
}

impl PrintClient {
    /// * `server_url` - Base URL, e.g. `http://localhost:5000`.
    pub fn new(server_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the print endpoint for `token`.
    pub fn print_url(&self, token: &str) -> String {
        format!("{}/api/v1/print/{token}", self.server_url)
    }
}

#[async_trait]
impl PrintTrigger for PrintClient {
    async fn request_print(&self, token: &str) -> Result<PrintReply, ClientError> {
        let response = self.client.post(self.print_url(token)).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(PrintReply::Printed);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => (parsed.code, parsed.error),
            Err(_) => ("UNKNOWN".to_string(), body),
        };
        Ok(PrintReply::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
