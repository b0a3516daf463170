//! This client reads the `Last-Modified` header of the published calendar file.
//!
//! It behaves like the script on the page: one request, no retries, and any failure leaves the
//! timestamp unfetched.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use reqwest::{header::LAST_MODIFIED, Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

/// The shape of `Date.prototype.toLocaleString()` in the `en-US` locale.
pub static LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response status {0}")]
    Status(StatusCode),
    #[error("response has no Last-Modified header")]
    MissingHeader,
    #[error("invalid Last-Modified value {0:?}")]
    InvalidDate(String),
}

/// The text slot showing when the calendar was last updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampSlot {
    /// Nothing to show, either not fetched yet or the fetch failed.
    #[default]
    Unfetched,
    Displayed(String),
}

impl TimestampSlot {
    pub fn text(&self) -> &str {
        match self {
            TimestampSlot::Unfetched => "",
            TimestampSlot::Displayed(text) => text,
        }
    }
}

/// Parse an HTTP date such as `Wed, 01 Jan 2025 12:00:00 GMT`.
///
/// All three HTTP date forms (IMF-fixdate, RFC 850 and asctime) are accepted, RFC 2822 dates
/// with numeric offsets and RFC 3339 values as well, browsers parse them all.
pub fn parse_http_date(value: &str) -> Result<DateTime<FixedOffset>, FetchError> {
    let value = value.trim();
    if let Ok(time) = httpdate::parse_http_date(value) {
        return Ok(DateTime::<Utc>::from(time).into());
    }
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map_err(|_| FetchError::InvalidDate(value.to_string()))
}

/// Get the last modification time of the resource at `url`.
///
/// The response body is ignored.
pub async fn fetch(client: &Client, url: Url) -> Result<DateTime<FixedOffset>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let value = response
        .headers()
        .get(LAST_MODIFIED)
        .ok_or(FetchError::MissingHeader)?;
    let value = value
        .to_str()
        .map_err(|_| FetchError::InvalidDate(String::from_utf8_lossy(value.as_bytes()).into()))?;
    parse_http_date(value)
}

/// Format a time in the given timezone the way the page displays it.
pub fn format_in<T, Tz>(time: &DateTime<T>, timezone: &Tz) -> String
where
    T: TimeZone,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(timezone)
        .format(LOCALE_FORMAT)
        .to_string()
}

pub fn format_local<T: TimeZone>(time: &DateTime<T>) -> String {
    format_in(time, &Local)
}

/// Fetch the last modification time and format it in the local timezone.
pub async fn probe(client: &Client, url: Url) -> TimestampSlot {
    probe_in(client, url, &Local).await
}

/// Fetch the last modification time and format it in the given timezone.
///
/// Failures are not propagated, the slot just stays unfetched.
pub async fn probe_in<Tz>(client: &Client, url: Url, timezone: &Tz) -> TimestampSlot
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match fetch(client, url).await {
        Ok(time) => TimestampSlot::Displayed(format_in(&time, timezone)),
        Err(err) => {
            debug!(%err, "last modification time unavailable");
            TimestampSlot::Unfetched
        }
    }
}
