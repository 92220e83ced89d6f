use serde::{Deserialize, Serialize};

use super::domain::{AttachmentId, FileAttachment, GuarantorId, GuarantorRecord};

/// An attachment as held by storage: metadata plus the raw bytes. Attachments
/// live beside the record row and are fetched independently of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttachment {
    pub meta: FileAttachment,
    pub content: Vec<u8>,
}

/// Raw storage abstraction so the service and form controller can be
/// exercised against an in-memory double. Invariants (provenance, status
/// transitions, validation) belong to the service, not here.
pub trait GuarantorRepository: Send + Sync {
    fn insert(&self, record: GuarantorRecord) -> Result<GuarantorRecord, RepositoryError>;
    fn update(&self, record: GuarantorRecord) -> Result<GuarantorRecord, RepositoryError>;
    fn fetch(&self, id: &GuarantorId) -> Result<Option<GuarantorRecord>, RepositoryError>;
    fn remove(&self, id: &GuarantorId) -> Result<bool, RepositoryError>;
    fn all(&self) -> Result<Vec<GuarantorRecord>, RepositoryError>;

    fn attachments_for(&self, id: &GuarantorId) -> Result<Vec<FileAttachment>, RepositoryError>;
    fn insert_attachment(
        &self,
        id: &GuarantorId,
        attachment: StoredAttachment,
    ) -> Result<FileAttachment, RepositoryError>;
    fn fetch_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<Option<StoredAttachment>, RepositoryError>;
    fn remove_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<bool, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
