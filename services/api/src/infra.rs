use chrono::{Duration, Utc};
use guarantor_intake::guarantors::{
    Address, AttachmentId, FileAttachment, GuarantorFormData, GuarantorId, GuarantorRecord,
    GuarantorRepository, GuarantorStatus, RepositoryError, StoredAttachment,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryGuarantorRepository {
    records: Arc<Mutex<HashMap<GuarantorId, GuarantorRecord>>>,
    attachments: Arc<Mutex<HashMap<GuarantorId, Vec<StoredAttachment>>>>,
}

impl GuarantorRepository for InMemoryGuarantorRepository {
    fn insert(&self, record: GuarantorRecord) -> Result<GuarantorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: GuarantorRecord) -> Result<GuarantorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &GuarantorId) -> Result<Option<GuarantorRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &GuarantorId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        self.attachments
            .lock()
            .expect("attachment mutex poisoned")
            .remove(id);
        Ok(guard.remove(id).is_some())
    }

    fn all(&self) -> Result<Vec<GuarantorRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn attachments_for(&self, id: &GuarantorId) -> Result<Vec<FileAttachment>, RepositoryError> {
        let guard = self.attachments.lock().expect("attachment mutex poisoned");
        Ok(guard
            .get(id)
            .map(|stored| stored.iter().map(|s| s.meta.clone()).collect())
            .unwrap_or_default())
    }

    fn insert_attachment(
        &self,
        id: &GuarantorId,
        attachment: StoredAttachment,
    ) -> Result<FileAttachment, RepositoryError> {
        let mut guard = self.attachments.lock().expect("attachment mutex poisoned");
        let meta = attachment.meta.clone();
        guard.entry(id.clone()).or_default().push(attachment);
        Ok(meta)
    }

    fn fetch_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<Option<StoredAttachment>, RepositoryError> {
        let guard = self.attachments.lock().expect("attachment mutex poisoned");
        Ok(guard
            .get(id)
            .and_then(|stored| stored.iter().find(|s| &s.meta.id == file_id).cloned()))
    }

    fn remove_attachment(
        &self,
        id: &GuarantorId,
        file_id: &AttachmentId,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.attachments.lock().expect("attachment mutex poisoned");
        let Some(stored) = guard.get_mut(id) else {
            return Ok(false);
        };
        let before = stored.len();
        stored.retain(|s| &s.meta.id != file_id);
        Ok(stored.len() < before)
    }
}

struct SeedGuarantor {
    name: &'static str,
    relationship: &'static str,
    street: &'static str,
    city: &'static str,
    state: &'static str,
    zip: &'static str,
    date_of_birth: &'static str,
    occupation: &'static str,
    employer: &'static str,
    linkedin: &'static str,
    registration: &'static str,
    associations: &'static [&'static str],
    comments: &'static str,
    phone: &'static str,
    email: &'static str,
    submitted_by: &'static str,
    days_ago: i64,
    status: GuarantorStatus,
}

const SEED_GUARANTORS: &[SeedGuarantor] = &[
    SeedGuarantor {
        name: "Michael R. Davis",
        relationship: "Personal guarantor for BlueRock Holdings LLC",
        street: "123 Main Street",
        city: "Phoenix",
        state: "AZ",
        zip: "85001",
        date_of_birth: "1978-03-22",
        occupation: "Real Estate Investor",
        employer: "Davis Capital Group",
        linkedin: "https://www.linkedin.com/in/michaeldavis",
        registration: "EIN-123456789",
        associations: &[
            "Phoenix Real Estate Association",
            "Arizona Investors Network",
        ],
        comments: "Primary contact for borrower's credit line renewal.",
        phone: "+1-602-555-0123",
        email: "michael.davis@daviscapital.com",
        submitted_by: "LoanOfficer123",
        days_ago: 1,
        status: GuarantorStatus::PendingVerification,
    },
    SeedGuarantor {
        name: "Sarah Johnson",
        relationship: "Business co-owner",
        street: "456 Oak Avenue",
        city: "Scottsdale",
        state: "AZ",
        zip: "85251",
        date_of_birth: "1985-07-12",
        occupation: "Tech Entrepreneur",
        employer: "Johnson Tech Solutions",
        linkedin: "https://www.linkedin.com/in/sarahjohnsontech",
        registration: "EIN-987654321",
        associations: &["Arizona Tech Council"],
        comments: "Co-founder with strong credit history.",
        phone: "+1-480-555-0456",
        email: "sarah@johnsontech.com",
        submitted_by: "LoanOfficer456",
        days_ago: 2,
        status: GuarantorStatus::Verified,
    },
    SeedGuarantor {
        name: "Robert Chen",
        relationship: "Family member and business advisor",
        street: "789 Desert Ridge Blvd",
        city: "Tempe",
        state: "AZ",
        zip: "85284",
        date_of_birth: "1975-11-08",
        occupation: "Financial Consultant",
        employer: "Chen Financial Advisory",
        linkedin: "https://www.linkedin.com/in/robertchen",
        registration: "",
        associations: &["Arizona CPA Society", "Financial Planning Association"],
        comments: "Experienced financial advisor with excellent credit.",
        phone: "+1-623-555-0789",
        email: "robert.chen@chenfinancial.com",
        submitted_by: "LoanOfficer789",
        days_ago: 3,
        status: GuarantorStatus::Verified,
    },
    SeedGuarantor {
        name: "Lisa Williams",
        relationship: "Investment partner",
        street: "321 Central Park Dr",
        city: "Mesa",
        state: "AZ",
        zip: "85202",
        date_of_birth: "1982-04-17",
        occupation: "Investment Manager",
        employer: "Williams Investment Group",
        linkedin: "https://www.linkedin.com/in/lisawilliamsinvest",
        registration: "EIN-456789123",
        associations: &["Arizona Investment Club"],
        comments: "Needs additional documentation for verification.",
        phone: "+1-602-555-0321",
        email: "lisa@williamsinvest.com",
        submitted_by: "LoanOfficer123",
        days_ago: 4,
        status: GuarantorStatus::Rejected,
    },
];

/// Loads a handful of representative records so the dashboard and listing
/// endpoints have something to show on a fresh in-memory store. Seed ids live
/// in a range the service's id sequence will not reach.
pub(crate) fn seed_demo_data(
    repository: &InMemoryGuarantorRepository,
) -> Result<usize, RepositoryError> {
    let now = Utc::now();

    for (index, seed) in SEED_GUARANTORS.iter().enumerate() {
        let id = GuarantorId(format!("grt-{:06}", 900_001 + index));
        let submitted = now - Duration::days(seed.days_ago);

        let mut record = GuarantorRecord {
            id: id.clone(),
            data: GuarantorFormData {
                guarantor_name: seed.name.to_string(),
                relationship_to_borrower: seed.relationship.to_string(),
                address: Address {
                    street: seed.street.to_string(),
                    city: seed.city.to_string(),
                    state: seed.state.to_string(),
                    zip: seed.zip.to_string(),
                },
                date_of_birth: seed.date_of_birth.to_string(),
                occupation: seed.occupation.to_string(),
                employer_or_business: seed.employer.to_string(),
                linkedin_profile: seed.linkedin.to_string(),
                company_registration_number: seed.registration.to_string(),
                known_associations: seed
                    .associations
                    .iter()
                    .map(|entry| entry.to_string())
                    .collect(),
                comments: seed.comments.to_string(),
                phone: seed.phone.to_string(),
                email: seed.email.to_string(),
            },
            submission_timestamp: submitted,
            submitted_by: seed.submitted_by.to_string(),
            record_status: seed.status,
            attachments: Vec::new(),
        };

        if index == 0 {
            let attachments = [
                ("drivers_license.pdf", "application/pdf", 256_000u64),
                ("business_certificate.jpg", "image/jpeg", 512_000u64),
            ];
            for (offset, (filename, file_type, file_size)) in attachments.iter().enumerate() {
                let meta = FileAttachment {
                    id: AttachmentId(format!("file-{:06}", 900_001 + offset)),
                    filename: filename.to_string(),
                    file_type: file_type.to_string(),
                    file_size: *file_size,
                    upload_date: submitted,
                };
                record.attachments.push(meta.clone());
                repository.insert_attachment(
                    &id,
                    StoredAttachment {
                        meta,
                        content: Vec::new(),
                    },
                )?;
            }
        }

        repository.insert(record)?;
    }

    Ok(SEED_GUARANTORS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_twice_conflicts_instead_of_duplicating() {
        let repository = InMemoryGuarantorRepository::default();
        let seeded = seed_demo_data(&repository).expect("first seed succeeds");
        assert_eq!(seeded, 4);
        assert!(matches!(
            seed_demo_data(&repository),
            Err(RepositoryError::Conflict)
        ));
        assert_eq!(repository.all().expect("listing succeeds").len(), 4);
    }

    #[test]
    fn seed_attachments_are_retrievable() {
        let repository = InMemoryGuarantorRepository::default();
        seed_demo_data(&repository).expect("seed succeeds");

        let id = GuarantorId("grt-900001".to_string());
        let attachments = repository
            .attachments_for(&id)
            .expect("attachment listing succeeds");
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].filename, "drivers_license.pdf");
    }
}
