//! Delay calculations for rate-limit and transport retries

use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use std::time::Duration;

use crate::config::RetryConfig;

/// Longest response body kept in error messages
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Seconds to wait as instructed by a `Retry-After` header
///
/// Accepts delta-seconds or an HTTP date. Absent or unparsable values fall
/// back to `default_secs`.
pub fn retry_after_secs(header: Option<&HeaderValue>, default_secs: u64) -> u64 {
    let Some(value) = header.and_then(|h| h.to_str().ok()).map(str::trim) else {
        return default_secs;
    };

    if let Ok(secs) = value.parse::<u64>() {
        return secs;
    }

    match DateTime::parse_from_rfc2822(value) {
        Ok(at) => {
            let remaining = at.with_timezone(&Utc) - Utc::now();
            remaining.num_seconds().max(0) as u64
        }
        Err(_) => default_secs,
    }
}

/// Exponential backoff delay before transport retry number `attempt` (1-based)
pub fn transport_delay(retry: &RetryConfig, attempt: u32) -> Duration {
    let factor = retry
        .backoff_multiplier
        .powi(attempt.saturating_sub(1) as i32);
    let delay_ms = (retry.initial_delay_ms as f64 * factor).min(retry.max_delay_ms as f64);
    Duration::from_millis(delay_ms as u64)
}

/// Truncate a response body for diagnostics
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
