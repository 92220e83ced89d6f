use serde::{Deserialize, Serialize};

/// The four fixed phases of the intake form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Personal,
    Contact,
    Employment,
    Attachments,
}

/// The step sequence the navigation renders and `next`/`previous` walk.
pub const FORM_STEPS: [FormStep; 4] = [
    FormStep::Personal,
    FormStep::Contact,
    FormStep::Employment,
    FormStep::Attachments,
];

impl FormStep {
    pub fn title(&self) -> &'static str {
        match self {
            FormStep::Personal => "Personal Details",
            FormStep::Contact => "Contact & Identity",
            FormStep::Employment => "Professional Background",
            FormStep::Attachments => "Documents",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormStep::Personal => "Basic personal information",
            FormStep::Contact => "Contact details and identity verification",
            FormStep::Employment => "Employment and business information",
            FormStep::Attachments => "Supporting documents and attachments",
        }
    }

    /// Fields owned by this step; the fixed table the step validator uses.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FormStep::Personal => &[
                "guarantor_name",
                "relationship_to_borrower",
                "address",
                "date_of_birth",
            ],
            FormStep::Contact => &["phone", "email"],
            FormStep::Employment => &[
                "occupation",
                "employer_or_business",
                "linkedin_profile",
                "company_registration_number",
                "known_associations",
            ],
            FormStep::Attachments => &["comments"],
        }
    }

    pub fn index(&self) -> usize {
        FORM_STEPS
            .iter()
            .position(|step| step == self)
            .unwrap_or(0)
    }

    pub fn next(&self) -> Option<FormStep> {
        FORM_STEPS.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<FormStep> {
        self.index().checked_sub(1).and_then(|i| FORM_STEPS.get(i)).copied()
    }

    pub fn is_first(&self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_walk_in_display_order() {
        assert_eq!(FormStep::Personal.next(), Some(FormStep::Contact));
        assert_eq!(FormStep::Contact.next(), Some(FormStep::Employment));
        assert_eq!(FormStep::Employment.next(), Some(FormStep::Attachments));
        assert_eq!(FormStep::Attachments.next(), None);

        assert_eq!(FormStep::Personal.previous(), None);
        assert_eq!(FormStep::Attachments.previous(), Some(FormStep::Employment));
    }

    #[test]
    fn boundary_steps_are_flagged() {
        assert!(FormStep::Personal.is_first());
        assert!(FormStep::Attachments.is_last());
        assert!(!FormStep::Contact.is_first());
        assert!(!FormStep::Contact.is_last());
    }

    #[test]
    fn every_step_owns_at_least_one_field() {
        for step in FORM_STEPS {
            assert!(!step.fields().is_empty(), "{:?} has no fields", step);
        }
    }
}
