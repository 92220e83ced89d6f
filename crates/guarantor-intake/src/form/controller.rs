//! The multi-step intake form controller.
//!
//! Owns the in-progress form value, the current step, and the set of steps
//! whose fields last passed validation. Step-local validation gates forward
//! navigation; backward navigation and direct jumps are always allowed. New
//! (non-edit) sessions auto-save a draft after a short quiet period.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::guarantors::domain::{
    GuarantorFormData, GuarantorId, GuarantorRecord, UpdateGuarantor,
};
use crate::guarantors::repository::GuarantorRepository;
use crate::guarantors::service::{GuarantorService, GuarantorServiceError};
use crate::guarantors::validation::{self, ValidationReport};

use super::draft::{self, DraftStore};
use super::steps::{FormStep, FORM_STEPS};

/// Quiet period after the last edit before the draft is written.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

/// Result of validating one step's fields. Returned, never thrown: a failed
/// validation is ordinary feedback, not an error.
#[derive(Debug, Clone)]
pub struct StepValidation {
    pub step: FormStep,
    pub report: ValidationReport,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

enum FormMode {
    /// New record; drafts are kept in the given store until submission.
    Create { drafts: Arc<dyn DraftStore> },
    /// Editing an existing record; no draft interplay.
    Edit { id: GuarantorId },
}

/// Controller for one form session. Single-owner: all state transitions run
/// on the caller's task, and the only background work is the debounced draft
/// save, of which at most one is pending at a time.
pub struct GuarantorForm {
    data: GuarantorFormData,
    current_step: FormStep,
    completed_steps: BTreeSet<FormStep>,
    mode: FormMode,
    autosave: Option<JoinHandle<()>>,
}

impl GuarantorForm {
    /// Start a new-record session, restoring any previously auto-saved draft.
    /// A missing or unreadable draft silently yields the empty template.
    pub fn new_create(drafts: Arc<dyn DraftStore>) -> Self {
        let data = draft::load_draft(drafts.as_ref()).unwrap_or_default();
        Self {
            data,
            current_step: FormStep::Personal,
            completed_steps: BTreeSet::new(),
            mode: FormMode::Create { drafts },
            autosave: None,
        }
    }

    /// Start an edit session seeded from an existing record.
    pub fn new_edit(record: &GuarantorRecord) -> Self {
        Self {
            data: record.data.clone(),
            current_step: FormStep::Personal,
            completed_steps: BTreeSet::new(),
            mode: FormMode::Edit {
                id: record.id.clone(),
            },
            autosave: None,
        }
    }

    pub fn data(&self) -> &GuarantorFormData {
        &self.data
    }

    pub fn current_step(&self) -> FormStep {
        self.current_step
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn completed_steps(&self) -> &BTreeSet<FormStep> {
        &self.completed_steps
    }

    pub fn is_complete(&self, step: FormStep) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Progress percentage for the header bar.
    pub fn progress(&self) -> u8 {
        (((self.current_step.index() + 1) * 100) / FORM_STEPS.len()) as u8
    }

    /// Apply an edit to the form value. In create mode this (re)schedules the
    /// debounced draft save; an earlier pending save is cancelled first.
    pub fn apply(&mut self, edit: impl FnOnce(&mut GuarantorFormData)) {
        edit(&mut self.data);
        self.schedule_autosave();
    }

    /// Add a known-association entry. Whitespace-only and duplicate entries
    /// are ignored; returns whether the entry was added.
    pub fn add_association(&mut self, entry: &str) -> bool {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self
            .data
            .known_associations
            .iter()
            .any(|existing| existing == trimmed)
        {
            return false;
        }

        let entry = trimmed.to_string();
        self.apply(|data| data.known_associations.push(entry));
        true
    }

    /// Remove an association by position; out-of-range indexes are ignored.
    pub fn remove_association(&mut self, index: usize) {
        if index < self.data.known_associations.len() {
            self.apply(|data| {
                data.known_associations.remove(index);
            });
        }
    }

    /// Validate the fields owned by one step and update the completion set.
    /// Completion is not sticky: a previously complete step that fails again
    /// is demoted.
    pub fn validate_step(&mut self, step: FormStep) -> StepValidation {
        let report = validation::validate_fields(&self.data, step.fields());
        if report.is_valid() {
            self.completed_steps.insert(step);
        } else {
            self.completed_steps.remove(&step);
        }
        StepValidation { step, report }
    }

    /// Validate the current step and, if it passes, move forward. On failure
    /// the step is unchanged and the validation result carries the field
    /// errors.
    pub fn advance(&mut self) -> StepValidation {
        let outcome = self.validate_step(self.current_step);
        if outcome.is_valid() {
            if let Some(next) = self.current_step.next() {
                self.current_step = next;
            }
        }
        outcome
    }

    /// Move back one step. Never validates; a no-op on the first step.
    pub fn retreat(&mut self) {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
    }

    /// Jump to any step. The departing step is validated for completion
    /// bookkeeping only; the move itself is unconditional.
    pub fn jump_to(&mut self, step: FormStep) -> StepValidation {
        let outcome = self.validate_step(self.current_step);
        self.current_step = step;
        outcome
    }

    /// Persist the full form value to the draft slot immediately (create mode
    /// only). The current step is validated first purely for feedback.
    pub fn save_draft(&mut self) -> StepValidation {
        let outcome = self.validate_step(self.current_step);
        if let FormMode::Create { drafts } = &self.mode {
            draft::save_draft(drafts.as_ref(), &self.data);
        }
        outcome
    }

    /// Submit the form: create when new, whole-record update when editing.
    /// The full value is validated first; an invalid form never reaches the
    /// data-access layer. On any failure the form value and step are left
    /// untouched so the user can correct and retry. Success clears the draft
    /// slot and any pending auto-save.
    pub async fn submit<R>(
        &mut self,
        service: &GuarantorService<R>,
    ) -> Result<GuarantorRecord, GuarantorServiceError>
    where
        R: GuarantorRepository + 'static,
    {
        let report = validation::validate(&self.data);
        if !report.is_valid() {
            return Err(GuarantorServiceError::Validation(report.errors));
        }

        let record = match &self.mode {
            FormMode::Create { .. } => service.create(self.data.clone())?,
            FormMode::Edit { id } => {
                service.update(id, &UpdateGuarantor::from_form(&self.data))?
            }
        };

        if let FormMode::Create { drafts } = &self.mode {
            let drafts = Arc::clone(drafts);
            self.cancel_autosave();
            draft::clear_draft(drafts.as_ref());
        }

        Ok(record)
    }

    fn schedule_autosave(&mut self) {
        let FormMode::Create { drafts } = &self.mode else {
            return;
        };

        let drafts = Arc::clone(drafts);
        self.cancel_autosave();

        let snapshot = self.data.clone();
        self.autosave = Some(tokio::spawn(async move {
            tokio::time::sleep(AUTOSAVE_DELAY).await;
            draft::save_draft(drafts.as_ref(), &snapshot);
        }));
    }

    fn cancel_autosave(&mut self) {
        if let Some(pending) = self.autosave.take() {
            pending.abort();
        }
    }
}

impl Drop for GuarantorForm {
    fn drop(&mut self) {
        self.cancel_autosave();
    }
}
