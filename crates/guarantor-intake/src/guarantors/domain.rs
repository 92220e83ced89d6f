use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for guarantor records, assigned by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuarantorId(pub String);

impl std::fmt::Display for GuarantorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for uploaded supporting documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub String);

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal address collected on the personal-details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The value the multi-step form collects. Optional fields are plain strings
/// where empty means "not provided", mirroring how the form inputs behave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuarantorFormData {
    pub guarantor_name: String,
    pub relationship_to_borrower: String,
    pub address: Address,
    /// Date of birth as entered, expected in `YYYY-MM-DD` form.
    pub date_of_birth: String,
    pub occupation: String,
    #[serde(default)]
    pub employer_or_business: String,
    #[serde(default)]
    pub linkedin_profile: String,
    #[serde(default)]
    pub company_registration_number: String,
    #[serde(default)]
    pub known_associations: Vec<String>,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Verification state of a submitted record. Records enter as
/// `PendingVerification` and only the explicit verify/reject operations may
/// move them; the general update path never touches this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuarantorStatus {
    PendingVerification,
    Verified,
    Rejected,
}

impl GuarantorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GuarantorStatus::PendingVerification => "Pending Verification",
            GuarantorStatus::Verified => "Verified",
            GuarantorStatus::Rejected => "Rejected",
        }
    }
}

/// A stored guarantor record: the submitted form value plus the provenance
/// fields the store assigns once at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuarantorRecord {
    pub id: GuarantorId,
    #[serde(flatten)]
    pub data: GuarantorFormData,
    pub submission_timestamp: DateTime<Utc>,
    pub submitted_by: String,
    pub record_status: GuarantorStatus,
    #[serde(default)]
    pub attachments: Vec<FileAttachment>,
}

/// Metadata for one uploaded supporting document. Attachments are created and
/// deleted whole; nothing mutates them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: AttachmentId,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
}

/// Partial update for an existing record. Only form fields may change here;
/// provenance and status are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGuarantor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guarantor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_to_borrower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_or_business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_associations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateGuarantor {
    /// Capture every field of a form value, for whole-record updates from the
    /// edit flow.
    pub fn from_form(data: &GuarantorFormData) -> Self {
        Self {
            guarantor_name: Some(data.guarantor_name.clone()),
            relationship_to_borrower: Some(data.relationship_to_borrower.clone()),
            address: Some(data.address.clone()),
            date_of_birth: Some(data.date_of_birth.clone()),
            occupation: Some(data.occupation.clone()),
            employer_or_business: Some(data.employer_or_business.clone()),
            linkedin_profile: Some(data.linkedin_profile.clone()),
            company_registration_number: Some(data.company_registration_number.clone()),
            known_associations: Some(data.known_associations.clone()),
            comments: Some(data.comments.clone()),
            phone: Some(data.phone.clone()),
            email: Some(data.email.clone()),
        }
    }

    /// Merge the provided fields into an existing form value.
    pub fn apply_to(&self, data: &mut GuarantorFormData) {
        if let Some(value) = &self.guarantor_name {
            data.guarantor_name = value.clone();
        }
        if let Some(value) = &self.relationship_to_borrower {
            data.relationship_to_borrower = value.clone();
        }
        if let Some(value) = &self.address {
            data.address = value.clone();
        }
        if let Some(value) = &self.date_of_birth {
            data.date_of_birth = value.clone();
        }
        if let Some(value) = &self.occupation {
            data.occupation = value.clone();
        }
        if let Some(value) = &self.employer_or_business {
            data.employer_or_business = value.clone();
        }
        if let Some(value) = &self.linkedin_profile {
            data.linkedin_profile = value.clone();
        }
        if let Some(value) = &self.company_registration_number {
            data.company_registration_number = value.clone();
        }
        if let Some(value) = &self.known_associations {
            data.known_associations = value.clone();
        }
        if let Some(value) = &self.comments {
            data.comments = value.clone();
        }
        if let Some(value) = &self.phone {
            data.phone = value.clone();
        }
        if let Some(value) = &self.email {
            data.email = value.clone();
        }
    }
}

/// Listing filters assembled by the list and export views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuarantorFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GuarantorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl GuarantorFilters {
    pub fn matches(&self, record: &GuarantorRecord) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                let data = &record.data;
                let hit = data.guarantor_name.to_lowercase().contains(&needle)
                    || data.relationship_to_borrower.to_lowercase().contains(&needle)
                    || data.occupation.to_lowercase().contains(&needle)
                    || data.employer_or_business.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }

        if let Some(status) = self.status {
            if record.record_status != status {
                return false;
            }
        }

        if let Some(submitted_by) = &self.submitted_by {
            if &record.submitted_by != submitted_by {
                return false;
            }
        }

        let submitted = record.submission_timestamp.date_naive();
        if let Some(from) = self.date_from {
            if submitted < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if submitted > to {
                return false;
            }
        }

        true
    }
}

/// Dashboard counters broken down by verification state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuarantorStats {
    pub total: usize,
    pub pending_verification: usize,
    pub verified: usize,
    pub rejected: usize,
}

/// One-based page selector for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }
}

/// Pagination metadata returned alongside every listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// The fields of [`PageRequest`] are public, so a zero limit can reach
    /// here without going through [`PageRequest::new`]; clamp it rather than
    /// divide by zero.
    pub fn for_total(request: PageRequest, total: usize) -> Self {
        let limit = request.limit.max(1);
        Self {
            page: request.page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> GuarantorRecord {
        GuarantorRecord {
            id: GuarantorId("grt-000001".to_string()),
            data: GuarantorFormData {
                guarantor_name: "Michael R. Davis".to_string(),
                relationship_to_borrower: "Personal guarantor for BlueRock Holdings LLC"
                    .to_string(),
                occupation: "Real Estate Investor".to_string(),
                employer_or_business: "Davis Capital Group".to_string(),
                ..GuarantorFormData::default()
            },
            submission_timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            submitted_by: "LoanOfficer123".to_string(),
            record_status: GuarantorStatus::PendingVerification,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn search_filter_is_case_insensitive_and_spans_employer() {
        let record = sample_record();

        let by_name = GuarantorFilters {
            search: Some("michael".to_string()),
            ..GuarantorFilters::default()
        };
        assert!(by_name.matches(&record));

        let by_employer = GuarantorFilters {
            search: Some("DAVIS CAPITAL".to_string()),
            ..GuarantorFilters::default()
        };
        assert!(by_employer.matches(&record));

        let miss = GuarantorFilters {
            search: Some("unrelated".to_string()),
            ..GuarantorFilters::default()
        };
        assert!(!miss.matches(&record));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let record = sample_record();
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let filters = GuarantorFilters {
            date_from: Some(day),
            date_to: Some(day),
            ..GuarantorFilters::default()
        };
        assert!(filters.matches(&record));

        let later = GuarantorFilters {
            date_from: Some(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()),
            ..GuarantorFilters::default()
        };
        assert!(!later.matches(&record));
    }

    #[test]
    fn partial_update_merges_only_provided_fields() {
        let mut data = sample_record().data;
        let update = UpdateGuarantor {
            occupation: Some("Developer".to_string()),
            ..UpdateGuarantor::default()
        };

        update.apply_to(&mut data);

        assert_eq!(data.occupation, "Developer");
        assert_eq!(data.guarantor_name, "Michael R. Davis");
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let pagination = Pagination::for_total(PageRequest::new(1, 10), 42);
        assert_eq!(pagination.total_pages, 5);

        let empty = Pagination::for_total(PageRequest::new(1, 10), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn pagination_clamps_a_hand_built_zero_limit() {
        let pagination = Pagination::for_total(PageRequest { page: 0, limit: 0 }, 7);
        assert_eq!(pagination.limit, 1);
        assert_eq!(pagination.total_pages, 7);
    }

    #[test]
    fn record_serializes_with_flattened_form_fields() {
        let record = sample_record();
        let value = serde_json::to_value(&record).expect("record serializes");

        assert_eq!(value["guarantor_name"], "Michael R. Davis");
        assert_eq!(value["record_status"], "pending_verification");
        assert!(value["address"]["street"].is_string());
    }
}
