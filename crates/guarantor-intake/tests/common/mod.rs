//! Shared fixtures for the integration suites: an in-memory repository and a
//! representative, fully valid form value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use guarantor_intake::guarantors::{
    Address, AttachmentId, FileAttachment, GuarantorFormData, GuarantorId, GuarantorRecord,
    GuarantorRepository, GuarantorService, RepositoryError, StoredAttachment,
};

#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<HashMap<GuarantorId, GuarantorRecord>>,
    attachments: Mutex<HashMap<GuarantorId, Vec<StoredAttachment>>>,
}

impl GuarantorRepository for InMemoryRepository {
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

pub fn service() -> GuarantorService<InMemoryRepository> {
    GuarantorService::new(Arc::new(InMemoryRepository::default()), "TestUser")
}

pub fn valid_form_data() -> GuarantorFormData {
    GuarantorFormData {
        guarantor_name: "John Doe".to_string(),
        relationship_to_borrower: "Business Partner".to_string(),
        address: Address {
            street: "123 Test Street".to_string(),
            city: "Phoenix".to_string(),
            state: "AZ".to_string(),
            zip: "85001".to_string(),
        },
        date_of_birth: "1980-01-15".to_string(),
        occupation: "Software Engineer".to_string(),
        employer_or_business: "Tech Solutions Inc".to_string(),
        linkedin_profile: "https://www.linkedin.com/in/johndoe".to_string(),
        company_registration_number: "EIN-123456789".to_string(),
        known_associations: vec![
            "Tech Association".to_string(),
            "Business Network".to_string(),
        ],
        comments: "Reliable guarantor with strong credit history".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        email: "john.doe@example.com".to_string(),
    }
}
