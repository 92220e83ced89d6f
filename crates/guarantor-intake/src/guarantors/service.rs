use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::attachments::{validate_upload, UploadFile};
use super::domain::{
    AttachmentId, FileAttachment, GuarantorFilters, GuarantorFormData, GuarantorId,
    GuarantorRecord, GuarantorStats, GuarantorStatus, PageRequest, Pagination, UpdateGuarantor,
};
use super::repository::{GuarantorRepository, RepositoryError, StoredAttachment};
use super::validation::{self, FieldError};

static GUARANTOR_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ATTACHMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_guarantor_id() -> GuarantorId {
    let id = GUARANTOR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    GuarantorId(format!("grt-{id:06}"))
}

fn next_attachment_id() -> AttachmentId {
    let id = ATTACHMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttachmentId(format!("file-{id:06}"))
}

/// The data-access surface consumed by the form controller and the views:
/// guarantor CRUD, verification, dashboard queries, CSV export, and the
/// attachment lifecycle, with record invariants enforced on every path.
pub struct GuarantorService<R> {
    repository: Arc<R>,
    submitted_by: String,
}

impl<R> GuarantorService<R>
where
    R: GuarantorRepository + 'static,
{
    /// `submitted_by` is stamped onto every created record; in the deployed
    /// service it comes from configuration until an auth context exists.
    pub fn new(repository: Arc<R>, submitted_by: impl Into<String>) -> Self {
        Self {
            repository,
            submitted_by: submitted_by.into(),
        }
    }

    /// Filtered, paginated listing. An empty page is a success, never an
    /// error.
    pub fn list(
        &self,
        filters: &GuarantorFilters,
        page: PageRequest,
    ) -> Result<(Vec<GuarantorRecord>, Pagination), GuarantorServiceError> {
        let mut records: Vec<GuarantorRecord> = self
            .repository
            .all()?
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect();
        records.sort_by(|a, b| b.submission_timestamp.cmp(&a.submission_timestamp));

        let pagination = Pagination::for_total(page, records.len());
        let start = page.page.saturating_sub(1).saturating_mul(page.limit);
        let rows = records
            .into_iter()
            .skip(start)
            .take(page.limit)
            .collect();

        Ok((rows, pagination))
    }

    pub fn get(&self, id: &GuarantorId) -> Result<GuarantorRecord, GuarantorServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| GuarantorServiceError::NotFound(id.clone()))
    }

    /// Validate and store a new record. The store assigns identity and the
    /// write-once provenance fields; callers cannot influence them.
    pub fn create(
        &self,
        data: GuarantorFormData,
    ) -> Result<GuarantorRecord, GuarantorServiceError> {
        let report = validation::validate(&data);
        if !report.is_valid() {
            return Err(GuarantorServiceError::Validation(report.errors));
        }

        let record = GuarantorRecord {
            id: next_guarantor_id(),
            data,
            submission_timestamp: Utc::now(),
            submitted_by: self.submitted_by.clone(),
            record_status: GuarantorStatus::PendingVerification,
            attachments: Vec::new(),
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Merge the provided fields into an existing record. Submission
    /// timestamp, submitter, and status always come from the original.
    pub fn update(
        &self,
        id: &GuarantorId,
        update: &UpdateGuarantor,
    ) -> Result<GuarantorRecord, GuarantorServiceError> {
        let mut record = self.get(id)?;
        update.apply_to(&mut record.data);

        let report = validation::validate(&record.data);
        if !report.is_valid() {
            return Err(GuarantorServiceError::Validation(report.errors));
        }

        let stored = self.repository.update(record)?;
        Ok(stored)
    }

    pub fn delete(&self, id: &GuarantorId) -> Result<(), GuarantorServiceError> {
        if !self.repository.remove(id)? {
            return Err(GuarantorServiceError::NotFound(id.clone()));
        }
        Ok(())
    }

    /// Explicit verification transition; the only path that moves status to
    /// `Verified`.
    pub fn verify(&self, id: &GuarantorId) -> Result<GuarantorRecord, GuarantorServiceError> {
        self.transition(id, GuarantorStatus::Verified)
    }

    /// Explicit rejection transition, the counterpart of [`verify`].
    ///
    /// [`verify`]: GuarantorService::verify
    pub fn reject(&self, id: &GuarantorId) -> Result<GuarantorRecord, GuarantorServiceError> {
        self.transition(id, GuarantorStatus::Rejected)
    }

    fn transition(
        &self,
        id: &GuarantorId,
        status: GuarantorStatus,
    ) -> Result<GuarantorRecord, GuarantorServiceError> {
        let mut record = self.get(id)?;
        record.record_status = status;
        let stored = self.repository.update(record)?;
        Ok(stored)
    }

    pub fn stats(&self) -> Result<GuarantorStats, GuarantorServiceError> {
        let records = self.repository.all()?;
        let mut stats = GuarantorStats {
            total: records.len(),
            ..GuarantorStats::default()
        };
        for record in &records {
            match record.record_status {
                GuarantorStatus::PendingVerification => stats.pending_verification += 1,
                GuarantorStatus::Verified => stats.verified += 1,
                GuarantorStatus::Rejected => stats.rejected += 1,
            }
        }
        Ok(stats)
    }

    /// Most recent submissions for the dashboard, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<GuarantorRecord>, GuarantorServiceError> {
        let mut records = self.repository.all()?;
        records.sort_by(|a, b| b.submission_timestamp.cmp(&a.submission_timestamp));
        records.truncate(limit);
        Ok(records)
    }

    /// Render the filtered listing as CSV for download.
    pub fn export_csv(
        &self,
        filters: &GuarantorFilters,
    ) -> Result<String, GuarantorServiceError> {
        let records: Vec<GuarantorRecord> = self
            .repository
            .all()?
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Name", "Relationship", "City", "State", "Status", "Submitted Date"])
            .map_err(export_failure)?;
        for record in &records {
            writer
                .write_record([
                    record.data.guarantor_name.as_str(),
                    record.data.relationship_to_borrower.as_str(),
                    record.data.address.city.as_str(),
                    record.data.address.state.as_str(),
                    record.record_status.label(),
                    &record.submission_timestamp.format("%m/%d/%Y").to_string(),
                ])
                .map_err(export_failure)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()).into())
    }

    pub fn attachments(
        &self,
        id: &GuarantorId,
    ) -> Result<Vec<FileAttachment>, GuarantorServiceError> {
        self.get(id)?;
        Ok(self.repository.attachments_for(id)?)
    }

    /// Store a batch of uploads. The batch is all-or-nothing: every file must
    /// pass the policy or the whole request fails with one error per rejected
    /// file and nothing is persisted.
    pub fn upload_attachments(
        &self,
        id: &GuarantorId,
        files: Vec<UploadFile>,
    ) -> Result<Vec<FileAttachment>, GuarantorServiceError> {
        self.get(id)?;

        let mut rejections = Vec::new();
        for file in &files {
            if let Err(reason) = validate_upload(file) {
                rejections.push(FieldError {
                    field: file.filename.clone(),
                    message: reason,
                });
            }
        }
        if !rejections.is_empty() {
            return Err(GuarantorServiceError::Validation(rejections));
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let meta = FileAttachment {
                id: next_attachment_id(),
                filename: file.filename.clone(),
                file_type: file.content_type.clone(),
                file_size: file.size(),
                upload_date: Utc::now(),
            };
            let attachment = self.repository.insert_attachment(
                id,
                StoredAttachment {
                    meta,
                    content: file.content,
                },
            )?;
            stored.push(attachment);
        }

        Ok(stored)
    }

    pub fn download_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<StoredAttachment, GuarantorServiceError> {
        self.get(id)?;
        self.repository
            .fetch_attachment(id, file_id)?
            .ok_or_else(|| GuarantorServiceError::NotFound(id.clone()))
    }

    pub fn delete_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<(), GuarantorServiceError> {
        self.get(id)?;
        if !self.repository.remove_attachment(id, file_id)? {
            return Err(GuarantorServiceError::NotFound(id.clone()));
        }
        Ok(())
    }
}

fn export_failure(err: csv::Error) -> GuarantorServiceError {
    GuarantorServiceError::Repository(RepositoryError::Unavailable(err.to_string()))
}

/// Error raised by the guarantor service, one variant per error kind the
/// callers distinguish: field validation, missing record, storage failure.
#[derive(Debug, thiserror::Error)]
pub enum GuarantorServiceError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("guarantor {0} not found")]
    NotFound(GuarantorId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
