//! QR payload model

use chrono::{DateTime, Utc};
use common::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A validated QR payload
///
/// Only built by [`crate::validation::parse`]; every field is present and
/// the location is a real point on Earth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub course_id: String,
    pub semester: String,
    #[serde(rename = "dateTime")]
    pub issued_at: DateTime<Utc>,
    /// Classroom location
    pub location: Coordinates,
}

/// Wire shape of a scanned payload before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawQrPayload {
    pub course_id: Option<String>,
    pub semester: Option<String>,
    pub date_time: Option<String>,
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
