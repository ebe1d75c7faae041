//! Geolocation collaborator

use async_trait::async_trait;
use common::error::CoordinateError;
use common::geo::Coordinates;
use thiserror::Error;

/// Why the device position could not be obtained
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The user refused location access
    #[error("Location permission denied")]
    PermissionDenied,

    /// No fix could be acquired
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// The provider returned coordinates that are not on Earth
    #[error("Invalid position fix: {0}")]
    InvalidFix(#[from] CoordinateError),
}

/// Source of the device's current position
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current position of the device
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Provider that reports a position supplied up front
///
/// Used by the command line, where the position comes from flags.
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    position: Option<Coordinates>,
}

impl FixedLocationProvider {
    /// Provider for a known position
    pub fn new(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Provider built from optional raw degrees
    ///
    /// Both values must be present for a fix; a half-specified position is
    /// treated as no position at all.
    pub fn from_degrees(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Self, LocationError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Self::new(Coordinates::new(lat, lon)?)),
            _ => Ok(Self::default()),
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.position
            .ok_or_else(|| LocationError::Unavailable("no position supplied".to_string()))
    }
}
