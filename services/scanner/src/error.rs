//! Custom error types for the scanner service

use common::error::DocumentStoreError;
use thiserror::Error;

use crate::location::LocationError;

/// Message shown when a scan was recorded
pub const SUCCESS_MESSAGE: &str = "Attendance marked successfully!";

/// Why a scan attempt did not become an attendance record
///
/// Every variant ends the attempt; the caller shows [`ScanError::user_message`]
/// and lets the student scan again.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Payload is not JSON or lacks a required field
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Payload is older than the freshness window
    #[error("Expired code: issued {age_ms} ms ago")]
    ExpiredCode { age_ms: i64 },

    /// Geolocation collaborator failed
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    /// Student is outside the geofence
    #[error("Too far from classroom: {distance_m:.1} m away, limit is {radius_m} m")]
    TooFarFromClassroom { distance_m: f64, radius_m: f64 },

    /// Attendance store collaborator failed
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DocumentStoreError),
}

impl ScanError {
    /// Message suitable for showing to the student
    pub fn user_message(&self) -> &'static str {
        match self {
            ScanError::MalformedPayload(_) => "Invalid QR code format",
            ScanError::ExpiredCode { .. } => "QR code has expired. Please scan a new one.",
            ScanError::LocationUnavailable(_) => {
                "Unable to determine your location. Please enable location services."
            }
            ScanError::TooFarFromClassroom { .. } => {
                "You are too far from the classroom. Please move closer."
            }
            ScanError::StorageFailure(_) => "Failed to mark attendance",
        }
    }

    /// Stable machine-readable name of the failure class
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::MalformedPayload(_) => "malformed_payload",
            ScanError::ExpiredCode { .. } => "expired_code",
            ScanError::LocationUnavailable(_) => "location_unavailable",
            ScanError::TooFarFromClassroom { .. } => "too_far_from_classroom",
            ScanError::StorageFailure(_) => "storage_failure",
        }
    }
}

/// Type alias for scan results
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ScanError::MalformedPayload("x".into()).user_message(),
            "Invalid QR code format"
        );
        assert_eq!(
            ScanError::ExpiredCode { age_ms: 15_000 }.user_message(),
            "QR code has expired. Please scan a new one."
        );
        assert_eq!(
            ScanError::TooFarFromClassroom {
                distance_m: 150.0,
                radius_m: 100.0
            }
            .user_message(),
            "You are too far from the classroom. Please move closer."
        );
        assert_eq!(
            ScanError::StorageFailure(DocumentStoreError::Configuration("x".into()))
                .user_message(),
            "Failed to mark attendance"
        );
    }

    #[test]
    fn test_display_includes_details() {
        let err = ScanError::TooFarFromClassroom {
            distance_m: 150.04,
            radius_m: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Too far from classroom: 150.0 m away, limit is 100 m"
        );
        assert_eq!(err.code(), "too_far_from_classroom");
    }
}
