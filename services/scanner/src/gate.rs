//! Attendance gate
//!
//! Decides whether one scan may become an attendance record. Every function
//! here is pure: the caller supplies the current time and position.
//!
//! Flow:
//! 1. Parse the payload
//! 2. Reject codes older than the freshness window
//! 3. Re-check the position fix and measure the distance between student and classroom
//! 4. Reject students outside the geofence
//! 5. Build the record

use chrono::{DateTime, Duration, Utc};
use common::geo::{Coordinates, distance_meters};
use tracing::{debug, warn};

use crate::error::{ScanError, ScanResult};
use crate::location::LocationError;
use crate::models::{AttendanceRecord, QrPayload};
use crate::validation::{self, freshness_window, is_fresh};

/// Maximum distance between student and classroom, in meters
pub const GEOFENCE_RADIUS_M: f64 = 100.0;

/// Limits a scan has to satisfy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatePolicy {
    /// Maximum code age
    pub freshness_window: Duration,
    /// Maximum student-to-classroom distance in meters
    pub geofence_radius_m: f64,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            freshness_window: freshness_window(),
            geofence_radius_m: GEOFENCE_RADIUS_M,
        }
    }
}

/// Parse `raw` and check that the code is still fresh at `now`
pub fn check_code(raw: &str, now: DateTime<Utc>, policy: &GatePolicy) -> ScanResult<QrPayload> {
    let payload = validation::parse(raw)?;
    let age = now - payload.issued_at;

    if !is_fresh(payload.issued_at, now, policy.freshness_window) {
        debug!(
            course_id = %payload.course_id,
            age_ms = age.num_milliseconds(),
            "rejecting expired code"
        );
        return Err(ScanError::ExpiredCode {
            age_ms: age.num_milliseconds(),
        });
    }

    if age < Duration::zero() {
        warn!(
            course_id = %payload.course_id,
            ahead_ms = -age.num_milliseconds(),
            "code is stamped in the future, accepting"
        );
    }

    Ok(payload)
}

/// Check that `position` lies inside the geofence around the classroom
///
/// Returns the measured distance in meters. A student exactly on the
/// boundary is accepted. A position outside the valid coordinate range is
/// reported as an unusable fix.
pub fn check_proximity(
    payload: &QrPayload,
    position: &Coordinates,
    policy: &GatePolicy,
) -> ScanResult<f64> {
    let position = position.validated().map_err(|e| {
        debug!(error = %e, "rejecting invalid position fix");
        ScanError::LocationUnavailable(LocationError::InvalidFix(e))
    })?;
    let distance_m = distance_meters(&position, &payload.location);

    if distance_m > policy.geofence_radius_m {
        debug!(
            course_id = %payload.course_id,
            distance_m,
            radius_m = policy.geofence_radius_m,
            "rejecting scan outside geofence"
        );
        return Err(ScanError::TooFarFromClassroom {
            distance_m,
            radius_m: policy.geofence_radius_m,
        });
    }

    Ok(distance_m)
}

/// Run one scan through the gate
///
/// On success the record is well-formed and ready to persist; handing it to
/// a store is up to the caller.
pub fn submit_scan(
    raw: &str,
    current_position: Coordinates,
    student_id: &str,
    now: DateTime<Utc>,
    policy: &GatePolicy,
) -> ScanResult<AttendanceRecord> {
    let payload = check_code(raw, now, policy)?;
    check_proximity(&payload, &current_position, policy)?;

    Ok(AttendanceRecord::new(
        student_id,
        &payload,
        now,
        current_position,
    ))
}
