//! Attendance scanner
//!
//! Validates scanned classroom QR codes and turns accepted scans into
//! attendance records: the code must parse, be fresh, and the student must be
//! standing inside the classroom geofence.

pub mod config;
pub mod error;
pub mod gate;
pub mod location;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{ScanError, ScanResult};
pub use gate::{GatePolicy, submit_scan};
pub use models::{AttendanceRecord, QrPayload};
pub use service::AttendanceService;
