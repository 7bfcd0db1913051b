//! Core Twitter API utilities.
//!
//! This module contains low-level API utilities for making authenticated
//! requests to the Twitter API, including automatic waiting on rate-limit
//! (429) responses.

use log::{debug, error, info, warn};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fallback wait when a 429 response carries no usable reset header.
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Builds the Authorization header for OAuth 2.0 App-only authentication.
///
/// # Parameters
///
/// - `bearer_token`: the App-only Bearer Token
///
/// # Returns
///
/// A properly formatted Authorization header string.
pub(crate) fn build_bearer_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum length before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    // Replace control characters and newlines to prevent log injection
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' => ' ',
            '\r' => ' ',
            '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.len() > max_len {
        // Walk back to a character boundary so multibyte text cannot make a
        // logging helper panic
        let mut cut = max_len;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... [truncated, {} total bytes]",
            &sanitized[..cut],
            text.len()
        )
    } else {
        sanitized
    }
}

/// Computes how long to wait before retrying a rate-limited request.
///
/// Uses the `x-rate-limit-reset` value (a Unix timestamp) when present and in
/// the future, with one extra second of slack; otherwise falls back to
/// [`DEFAULT_RATE_LIMIT_WAIT`].
pub(crate) fn rate_limit_wait(reset: Option<u64>, now: u64) -> Duration {
    match reset {
        Some(reset) if reset > now => Duration::from_secs(reset - now + 1),
        _ => DEFAULT_RATE_LIMIT_WAIT,
    }
}

/// Reads the `x-rate-limit-reset` header of a 429 response.
fn rate_limit_reset(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

/// Makes a request to the Twitter API, waiting out rate limits.
///
/// This helper function handles the common pattern of sending a prepared
/// request to the Twitter API: on a 429 Too Many Requests response it sleeps
/// until the rate-limit window resets and retries, and on any other
/// non-success status it returns an error carrying the status and a sanitized
/// excerpt of the response body.
///
/// # Parameters
///
/// - `request_builder`: A configured reqwest::RequestBuilder ready to send
/// - `operation_name`: Human-readable name for the operation (for logging)
///
/// # Returns
///
/// - `Ok(String)`: The API response body on success
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the request fails
pub(crate) async fn execute_api_request(
    request_builder: reqwest::RequestBuilder,
    operation_name: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    debug!(
        "Making authenticated request for operation: {}",
        operation_name
    );

    loop {
        let response = request_builder
            .try_clone()
            .ok_or("Failed to clone request builder")?
            .send()
            .await?;

        let status = response.status();
        debug!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        if status.is_success() {
            let response_text = response.text().await?;
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                response_text.len()
            );
            return Ok(response_text);
        }

        // Handle 429 Too Many Requests - wait until the rate-limit window resets
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let wait = rate_limit_wait(rate_limit_reset(&response), now);
            warn!(
                "Rate limited on operation '{}' - sleeping {} seconds before retrying",
                operation_name,
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
            info!("Retrying operation '{}' after rate-limit wait", operation_name);
            continue;
        }

        // Handle other error status codes
        let error_text = response.text().await?;
        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&error_text, 200)
        );
        return Err(format!(
            "Twitter API error for operation '{}' ({})",
            operation_name, status
        )
        .into());
    }
}
