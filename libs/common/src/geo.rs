//! Geodesic helpers
//!
//! Coordinates are WGS-84 degrees. Distances use the haversine formula on a
//! spherical Earth, which is accurate enough for campus-scale geofences.

use serde::Serialize;

use crate::error::{CoordinateError, CoordinateResult};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on Earth in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> CoordinateResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Re-check a pair whose fields were set directly
    pub fn validated(self) -> CoordinateResult<Self> {
        Self::new(self.latitude, self.longitude)
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        distance_meters(self, other)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in meters
pub fn distance_meters(from: &Coordinates, to: &Coordinates) -> f64 {
    haversine_meters(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Haversine distance in meters between two latitude/longitude pairs
///
/// The result is symmetric in its two points and zero when they coincide.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}
