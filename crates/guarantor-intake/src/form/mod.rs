//! Multi-step intake form: step table, draft persistence, and the controller
//! that sequences validation, navigation, and submission.

pub mod controller;
pub mod draft;
pub mod steps;

pub use controller::{GuarantorForm, StepValidation, AUTOSAVE_DELAY};
pub use draft::{
    clear_draft, load_draft, save_draft, DraftStore, FileDraftStore, InMemoryDraftStore,
    DRAFT_KEY,
};
pub use steps::{FormStep, FORM_STEPS};
