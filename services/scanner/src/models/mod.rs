//! Scanner models

pub mod qr_payload;
pub mod record;

// Re-export for convenience
pub use qr_payload::QrPayload;
pub use record::AttendanceRecord;
