//! QR payload validation
//!
//! Parsing turns an untrusted scanned string into a [`QrPayload`]; freshness
//! decides whether a payload is recent enough to accept.

use chrono::{DateTime, Duration, Utc};
use common::clock::parse_timestamp;
use common::geo::Coordinates;

use crate::error::{ScanError, ScanResult};
use crate::models::QrPayload;
use crate::models::qr_payload::RawQrPayload;

/// Maximum age of an accepted code, in milliseconds
pub const FRESHNESS_WINDOW_MS: i64 = 10_000;

/// Maximum age of an accepted code
pub fn freshness_window() -> Duration {
    Duration::milliseconds(FRESHNESS_WINDOW_MS)
}

/// Parse a scanned payload
///
/// Fails with [`ScanError::MalformedPayload`] when the input is not a JSON
/// object, or when `courseId`, `semester`, `dateTime`, `location.latitude`
/// or `location.longitude` is missing, null, blank or of the wrong type.
/// A latitude or longitude of `0.0` is a real place and is accepted.
pub fn parse(raw: &str) -> ScanResult<QrPayload> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(malformed("empty payload"));
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(malformed("payload is not a JSON object"));
    }

    let payload: RawQrPayload =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    let course_id = required_text(payload.course_id, "courseId")?;
    let semester = required_text(payload.semester, "semester")?;

    let date_time = required_text(payload.date_time, "dateTime")?;
    let issued_at = parse_timestamp(&date_time)
        .ok_or_else(|| malformed(format!("dateTime is not a timestamp: {}", date_time)))?;

    let location = payload
        .location
        .ok_or_else(|| malformed("location is required"))?;
    let latitude = location
        .latitude
        .ok_or_else(|| malformed("location.latitude is required"))?;
    let longitude = location
        .longitude
        .ok_or_else(|| malformed("location.longitude is required"))?;
    let location = Coordinates::new(latitude, longitude).map_err(|e| malformed(e.to_string()))?;

    Ok(QrPayload {
        course_id,
        semester,
        issued_at,
        location,
    })
}

/// Whether a code issued at `issued_at` is still acceptable at `now`
///
/// The window is inclusive. Codes stamped in the future are fresh.
pub fn is_fresh(issued_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now - issued_at <= window
}

fn required_text(value: Option<String>, field: &str) -> ScanResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(malformed(format!("{} is required", field))),
    }
}

fn malformed(reason: impl Into<String>) -> ScanError {
    ScanError::MalformedPayload(reason.into())
}
