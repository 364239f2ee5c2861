//! Blocking HTTP client with retries for transcript downloads.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{HarvesterError, Result};

const USER_AGENT: &str = concat!("hansard-harvester/", env!("CARGO_PKG_VERSION"));

/// Attempts per request, first try included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Create a client with the harvester's timeout and user agent.
///
/// # Errors
/// Returns `Http` if the TLS backend cannot be initialised.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Fetch a URL as text, retrying transient failures.
///
/// Server errors, connection failures and timeouts are retried with
/// exponential backoff (`base_delay`, then doubling). A 404 is not an
/// error: it means the document does not exist and yields `None`.
///
/// # Errors
/// Returns `Http` for other client errors, `RetriesExhausted` when every
/// attempt failed transiently.
pub fn fetch_text(client: &Client, url: &str, base_delay: Duration) -> Result<Option<String>> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = base_delay.saturating_mul(1 << (attempt - 1));
            tracing::debug!(url = %url, attempt, delay_ms = delay.as_millis(), "Retrying after delay");
            thread::sleep(delay);
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::NOT_FOUND {
                    tracing::debug!(url = %url, "Document not found");
                    return Ok(None);
                }

                if status.is_server_error() {
                    tracing::warn!(
                        url = %url,
                        status = %status,
                        attempt = attempt + 1,
                        max_attempts = MAX_ATTEMPTS,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                let response = response.error_for_status()?;
                return Ok(Some(response.text()?));
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!(
                    url = %url,
                    error = %e,
                    attempt = attempt + 1,
                    max_attempts = MAX_ATTEMPTS,
                    "Connection error, will retry"
                );
                last_error = Some(e.to_string());
            }
            Err(e) => return Err(HarvesterError::Http(e)),
        }
    }

    Err(HarvesterError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}
