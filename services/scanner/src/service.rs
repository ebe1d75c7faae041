//! Attendance service
//!
//! Runs the gate against live collaborators. Validation fully passes before
//! the store is called, so a failed attempt never leaves a partial record.

use common::clock::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ScanError, ScanResult};
use crate::gate::{GatePolicy, check_code, check_proximity};
use crate::location::LocationProvider;
use crate::models::AttendanceRecord;
use crate::store::AttendanceStore;

/// Domain service that turns a scanned code into a stored attendance record
///
/// Flow:
/// 1. Parse the code and check freshness
/// 2. Ask the location provider for the device position
/// 3. Check the geofence
/// 4. Build the record stamped with the submission time
/// 5. Hand it to the attendance store (once, no retry)
pub struct AttendanceService {
    location_provider: Arc<dyn LocationProvider>,
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    policy: GatePolicy,
}

impl AttendanceService {
    /// Create a new AttendanceService with dependencies
    pub fn new(
        location_provider: Arc<dyn LocationProvider>,
        store: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            location_provider,
            store,
            clock,
            policy,
        }
    }

    /// Validate a scan and, if it passes, persist the attendance record
    #[instrument(skip(self, raw), fields(attempt_id = %Uuid::new_v4()))]
    pub async fn mark_attendance(
        &self,
        raw: &str,
        student_id: &str,
    ) -> ScanResult<AttendanceRecord> {
        let record = self.prepare_record(raw, student_id).await?;

        self.store.create(&record).await.map_err(|e| {
            warn!(error = %e, "attendance store rejected the record");
            ScanError::StorageFailure(e)
        })?;

        info!(
            course_id = %record.course_id,
            semester = %record.semester,
            "attendance marked"
        );

        Ok(record)
    }

    async fn prepare_record(&self, raw: &str, student_id: &str) -> ScanResult<AttendanceRecord> {
        let payload = check_code(raw, self.clock.now(), &self.policy)?;
        debug!(course_id = %payload.course_id, "code accepted");

        let position = self
            .location_provider
            .current_position()
            .await
            .map_err(|e| {
                warn!(error = %e, "could not obtain device position");
                ScanError::LocationUnavailable(e)
            })?;

        let distance_m = check_proximity(&payload, &position, &self.policy)?;
        debug!(distance_m, "student inside geofence");

        Ok(AttendanceRecord::new(
            student_id,
            &payload,
            self.clock.now(),
            position,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationError, MockLocationProvider};
    use crate::store::MockAttendanceStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use common::clock::FixedClock;
    use common::error::DocumentStoreError;
    use common::geo::{Coordinates, EARTH_RADIUS_M};

    const PAYLOAD: &str = r#"{"courseId":"CS101","semester":"F24","dateTime":"2024-01-01T10:00:00Z","location":{"latitude":12.34,"longitude":56.78}}"#;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn north_of_classroom(meters: f64) -> Coordinates {
        Coordinates::new(12.34 + (meters / EARTH_RADIUS_M).to_degrees(), 56.78).unwrap()
    }

    fn service(
        locator: MockLocationProvider,
        store: MockAttendanceStore,
        now: DateTime<Utc>,
    ) -> AttendanceService {
        AttendanceService::new(
            Arc::new(locator),
            Arc::new(store),
            Arc::new(FixedClock(now)),
            GatePolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_mark_attendance_success() {
        // Arrange
        let student = north_of_classroom(50.0);
        let now = issued_at() + Duration::milliseconds(5000);

        let mut locator = MockLocationProvider::new();
        locator
            .expect_current_position()
            .times(1)
            .returning(move || Ok(student));

        let mut store = MockAttendanceStore::new();
        store
            .expect_create()
            .withf(move |record| {
                record.student_id == "student-1"
                    && record.course_id == "CS101"
                    && record.location == student
            })
            .times(1)
            .returning(|_| Ok(()));

        // Act
        let record = service(locator, store, now)
            .mark_attendance(PAYLOAD, "student-1")
            .await
            .unwrap();

        // Assert
        assert_eq!(record.semester, "F24");
        assert_eq!(record.timestamp, now);
        assert_eq!(record.location, student);
    }

    #[tokio::test]
    async fn test_expired_code_skips_collaborators() {
        let mut locator = MockLocationProvider::new();
        locator.expect_current_position().never();
        let mut store = MockAttendanceStore::new();
        store.expect_create().never();

        let err = service(locator, store, issued_at() + Duration::milliseconds(15_000))
            .mark_attendance(PAYLOAD, "student-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::ExpiredCode { .. }));
    }

    #[tokio::test]
    async fn test_malformed_code_skips_collaborators() {
        let mut locator = MockLocationProvider::new();
        locator.expect_current_position().never();
        let mut store = MockAttendanceStore::new();
        store.expect_create().never();

        let err = service(locator, store, issued_at())
            .mark_attendance("", "student-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_too_far_skips_store() {
        let mut locator = MockLocationProvider::new();
        locator
            .expect_current_position()
            .times(1)
            .returning(|| Ok(north_of_classroom(150.0)));
        let mut store = MockAttendanceStore::new();
        store.expect_create().never();

        let err = service(locator, store, issued_at() + Duration::seconds(2))
            .mark_attendance(PAYLOAD, "student-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::TooFarFromClassroom { .. }));
    }

    #[tokio::test]
    async fn test_location_failure_skips_store() {
        let mut locator = MockLocationProvider::new();
        locator
            .expect_current_position()
            .times(1)
            .returning(|| Err(LocationError::PermissionDenied));
        let mut store = MockAttendanceStore::new();
        store.expect_create().never();

        let err = service(locator, store, issued_at())
            .mark_attendance(PAYLOAD, "student-1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScanError::LocationUnavailable(LocationError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn test_invalid_position_fix_skips_store() {
        for bad in [
            Coordinates {
                latitude: 12.34 + 360.0,
                longitude: 56.78,
            },
            Coordinates {
                latitude: f64::NAN,
                longitude: 56.78,
            },
        ] {
            let mut locator = MockLocationProvider::new();
            locator
                .expect_current_position()
                .times(1)
                .returning(move || Ok(bad));
            let mut store = MockAttendanceStore::new();
            store.expect_create().never();

            let err = service(locator, store, issued_at())
                .mark_attendance(PAYLOAD, "student-1")
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                ScanError::LocationUnavailable(LocationError::InvalidFix(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_once() {
        let mut locator = MockLocationProvider::new();
        locator
            .expect_current_position()
            .returning(|| Ok(north_of_classroom(10.0)));
        let mut store = MockAttendanceStore::new();
        store.expect_create().times(1).returning(|_| {
            Err(DocumentStoreError::Rejected {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let err = service(locator, store, issued_at())
            .mark_attendance(PAYLOAD, "student-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::StorageFailure(_)));
        assert_eq!(err.user_message(), "Failed to mark attendance");
    }
}
