//! Common library for the attendance scanner
//!
//! This crate provides shared functionality used by the scanner service,
//! including geodesic distance, the wall clock, the remote document store
//! client, error types and logging setup.
//!
//! ```rust,no_run
//! use common::document_store::{DocumentStore, DocumentStoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DocumentStoreConfig::from_env()?;
//!     let store = DocumentStore::new(config)?;
//!     let created = store
//!         .create_document("attendance", &serde_json::json!({ "studentId": "s-1" }))
//!         .await?;
//!     println!("Created document {}", created.id);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod document_store;
pub mod error;
pub mod geo;
pub mod telemetry;
