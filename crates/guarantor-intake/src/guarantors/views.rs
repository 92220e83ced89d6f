//! Serializable view builders for the list, detail, and dashboard pages.
//! Pure formatting over records; no business logic lives here.

use serde::Serialize;

use super::attachments::{file_type_icon, format_file_size};
use super::domain::{
    FileAttachment, GuarantorRecord, GuarantorStats, GuarantorStatus,
};

/// One row of the listing page.
#[derive(Debug, Clone, Serialize)]
pub struct GuarantorRow {
    pub id: String,
    pub guarantor_name: String,
    pub relationship_to_borrower: String,
    pub location: String,
    pub status: GuarantorStatus,
    pub status_label: &'static str,
    pub submitted: String,
}

impl GuarantorRow {
    pub fn from_record(record: &GuarantorRecord) -> Self {
        Self {
            id: record.id.0.clone(),
            guarantor_name: record.data.guarantor_name.clone(),
            relationship_to_borrower: record.data.relationship_to_borrower.clone(),
            location: format!("{}, {}", record.data.address.city, record.data.address.state),
            status: record.record_status,
            status_label: record.record_status.label(),
            submitted: record.submission_timestamp.format("%m/%d/%Y").to_string(),
        }
    }
}

/// Attachment entry as rendered on the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentView {
    pub id: String,
    pub filename: String,
    pub file_type: String,
    pub icon: &'static str,
    pub size_label: String,
    pub uploaded: String,
}

impl AttachmentView {
    pub fn from_attachment(attachment: &FileAttachment) -> Self {
        Self {
            id: attachment.id.0.clone(),
            filename: attachment.filename.clone(),
            file_type: attachment.file_type.clone(),
            icon: file_type_icon(&attachment.file_type),
            size_label: format_file_size(attachment.file_size),
            uploaded: attachment.upload_date.format("%m/%d/%Y").to_string(),
        }
    }
}

/// Full record view for the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct GuarantorDetail {
    #[serde(flatten)]
    pub record: GuarantorRecord,
    pub status_label: &'static str,
    pub attachment_views: Vec<AttachmentView>,
}

impl GuarantorDetail {
    pub fn from_record(record: GuarantorRecord, attachments: &[FileAttachment]) -> Self {
        Self {
            status_label: record.record_status.label(),
            attachment_views: attachments.iter().map(AttachmentView::from_attachment).collect(),
            record,
        }
    }
}

/// Dashboard payload: counters plus the most recent submissions.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: GuarantorStats,
    pub recent: Vec<GuarantorRow>,
}

impl Dashboard {
    pub fn new(stats: GuarantorStats, recent: &[GuarantorRecord]) -> Self {
        Self {
            stats,
            recent: recent.iter().map(GuarantorRow::from_record).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarantors::domain::{
        Address, AttachmentId, GuarantorFormData, GuarantorId,
    };
    use chrono::{TimeZone, Utc};

    fn record() -> GuarantorRecord {
        GuarantorRecord {
            id: GuarantorId("grt-000007".to_string()),
            data: GuarantorFormData {
                guarantor_name: "Sarah Johnson".to_string(),
                relationship_to_borrower: "Business co-owner".to_string(),
                address: Address {
                    street: "456 Oak Avenue".to_string(),
                    city: "Scottsdale".to_string(),
                    state: "AZ".to_string(),
                    zip: "85251".to_string(),
                },
                ..GuarantorFormData::default()
            },
            submission_timestamp: Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(),
            submitted_by: "LoanOfficer123".to_string(),
            record_status: GuarantorStatus::Verified,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn row_formats_location_and_status() {
        let row = GuarantorRow::from_record(&record());
        assert_eq!(row.location, "Scottsdale, AZ");
        assert_eq!(row.status_label, "Verified");
        assert_eq!(row.submitted, "01/20/2024");
    }

    #[test]
    fn detail_renders_attachment_sizes() {
        let attachment = FileAttachment {
            id: AttachmentId("file-000001".to_string()),
            filename: "drivers_license.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 256_000,
            upload_date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        };

        let detail = GuarantorDetail::from_record(record(), &[attachment]);
        assert_eq!(detail.attachment_views.len(), 1);
        assert_eq!(detail.attachment_views[0].size_label, "250 KB");
        assert_eq!(detail.attachment_views[0].icon, "file-text");
    }
}
