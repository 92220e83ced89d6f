//! Guarantor record management: domain model, validation, storage contract,
//! the data-access service, the REST surface, and the page view builders.

pub mod attachments;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;
pub mod views;

pub use attachments::{
    file_type_icon, format_file_size, validate_upload, UploadFile, MAX_FILE_SIZE,
};
pub use domain::{
    Address, AttachmentId, FileAttachment, GuarantorFilters, GuarantorFormData, GuarantorId,
    GuarantorRecord, GuarantorStats, GuarantorStatus, PageRequest, Pagination, UpdateGuarantor,
};
pub use repository::{GuarantorRepository, RepositoryError, StoredAttachment};
pub use router::guarantor_router;
pub use service::{GuarantorService, GuarantorServiceError};
pub use validation::{validate, validate_fields, FieldError, ValidationReport};
pub use views::{AttachmentView, Dashboard, GuarantorDetail, GuarantorRow};
