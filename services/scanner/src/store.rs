//! Attendance store collaborator

use async_trait::async_trait;
use common::document_store::DocumentStore;
use common::error::DocumentStoreResult;
use tracing::info;

use crate::models::AttendanceRecord;

/// Destination for accepted attendance records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Persist one record
    async fn create(&self, record: &AttendanceRecord) -> DocumentStoreResult<()>;
}

/// Attendance store backed by a collection in the remote document database
#[derive(Debug, Clone)]
pub struct DocumentAttendanceStore {
    store: DocumentStore,
    collection_id: String,
}

impl DocumentAttendanceStore {
    /// Create a new attendance store writing into `collection_id`
    pub fn new(store: DocumentStore, collection_id: impl Into<String>) -> Self {
        Self {
            store,
            collection_id: collection_id.into(),
        }
    }
}

#[async_trait]
impl AttendanceStore for DocumentAttendanceStore {
    async fn create(&self, record: &AttendanceRecord) -> DocumentStoreResult<()> {
        let created = self
            .store
            .create_document(&self.collection_id, record)
            .await?;

        info!(
            document_id = %created.id,
            student_id = %record.student_id,
            course_id = %record.course_id,
            "attendance record stored"
        );

        Ok(())
    }
}
