//! Shared HTTP plumbing for the providers: client construction, status
//! checking and lenient number parsing for loosely typed JSON feeds.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use super::traits::SourceError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid")
});
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x1F\x7F]").expect("control character pattern is valid")
});

/// Build the client shared by every provider
pub fn build_client(connect_timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(connect_timeout)
        .build()?;
    Ok(client)
}

/// GET a URL and return the body, treating non-2xx as a failure
pub async fn get_text(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

/// Strip a UTF-8 byte order mark if present
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Best-effort cleanup of almost-JSON: trailing commas, NUL escapes and raw
/// control characters
pub fn repair_json(text: &str) -> String {
    let without_nul = text.replace("\\u0000", "");
    let without_controls = CONTROL_CHARS.replace_all(&without_nul, "");
    TRAILING_COMMA.replace_all(&without_controls, "$1").into_owned()
}

/// Parse a JSON value that may be a number or a numeric string.
///
/// Strings may carry a `%` sign and Turkish separators (`1.234,56`).
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_localized(s)?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn parse_localized(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('%')
        .trim_end_matches('%')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Comma after the last dot: dots group thousands, comma is decimal
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok()
}
