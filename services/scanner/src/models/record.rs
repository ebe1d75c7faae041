//! Attendance record model

use chrono::{DateTime, Utc};
use common::clock::format_timestamp;
use common::geo::Coordinates;
use serde::{Serialize, Serializer};

use super::QrPayload;

/// Proof-of-presence document handed to the attendance store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    pub course_id: String,
    pub semester: String,
    /// Submission time, not the code's issue time
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// Where the student was, not where the classroom is
    pub location: Coordinates,
}

impl AttendanceRecord {
    /// Build a record for `student_id` from a validated payload
    pub fn new(
        student_id: impl Into<String>,
        payload: &QrPayload,
        timestamp: DateTime<Utc>,
        location: Coordinates,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: payload.course_id.clone(),
            semester: payload.semester.clone(),
            timestamp,
            location,
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
fn iso_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_payload() -> QrPayload {
        QrPayload {
            course_id: "CS101".to_string(),
            semester: "F24".to_string(),
            issued_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            location: Coordinates::new(12.34, 56.78).unwrap(),
        }
    }

    #[test]
    fn test_record_copies_payload_and_student_location() {
        let student_at = Coordinates::new(12.3401, 56.7801).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 5).unwrap();
        let record = AttendanceRecord::new("student-7", &sample_payload(), now, student_at);

        assert_eq!(record.student_id, "student-7");
        assert_eq!(record.course_id, "CS101");
        assert_eq!(record.semester, "F24");
        assert_eq!(record.timestamp, now);
        assert_eq!(record.location, student_at);
    }

    #[test]
    fn test_record_wire_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 5).unwrap();
        let record = AttendanceRecord::new(
            "student-7",
            &sample_payload(),
            now,
            Coordinates::new(1.5, -2.25).unwrap(),
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "studentId": "student-7",
                "courseId": "CS101",
                "semester": "F24",
                "timestamp": "2024-01-01T10:00:05.000Z",
                "location": { "latitude": 1.5, "longitude": -2.25 }
            })
        );
    }
}
