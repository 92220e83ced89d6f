//! Field-level validation for guarantor form values.
//!
//! Messages here are surfaced verbatim next to the offending input, so they
//! are part of the UI contract and must stay stable.

use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::GuarantorFormData;

/// A single failed field with its user-facing message. Nested address fields
/// use dotted names (`address.zip`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Outcome of validating a form value or a subset of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors attached to one field, matching nested entries by their
    /// top-level name (`address` covers `address.zip`).
    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|error| top_level(&error.field) == field)
            .collect()
    }

    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }
}

fn top_level(field: &str) -> &str {
    field.split('.').next().unwrap_or(field)
}

fn zip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap())
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").unwrap())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#]+\.[^\s]*$").unwrap())
}

/// Validate every field of the form value.
pub fn validate(data: &GuarantorFormData) -> ValidationReport {
    validate_fields(data, ALL_FIELDS)
}

/// Field names understood by [`validate_fields`].
pub const ALL_FIELDS: &[&str] = &[
    "guarantor_name",
    "relationship_to_borrower",
    "address",
    "date_of_birth",
    "occupation",
    "employer_or_business",
    "linkedin_profile",
    "company_registration_number",
    "known_associations",
    "comments",
    "phone",
    "email",
];

/// Validate only the named top-level fields; unknown names are ignored so a
/// fixed step table can never panic the form.
pub fn validate_fields(data: &GuarantorFormData, fields: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in fields {
        match *field {
            "guarantor_name" => {
                required_within(&mut report, "guarantor_name", &data.guarantor_name, 100,
                    "Name is required", "Name too long");
            }
            "relationship_to_borrower" => {
                required_within(
                    &mut report,
                    "relationship_to_borrower",
                    &data.relationship_to_borrower,
                    200,
                    "Relationship is required",
                    "Relationship description too long",
                );
            }
            "address" => validate_address(&mut report, data),
            "date_of_birth" => validate_date_of_birth(&mut report, &data.date_of_birth),
            "occupation" => {
                required_within(&mut report, "occupation", &data.occupation, 100,
                    "Occupation is required", "Occupation too long");
            }
            "employer_or_business" => {
                optional_within(&mut report, "employer_or_business", &data.employer_or_business,
                    200, "Employer/business name too long");
            }
            "linkedin_profile" => {
                let value = data.linkedin_profile.trim();
                if !value.is_empty() && !url_pattern().is_match(value) {
                    report.push("linkedin_profile", "Invalid LinkedIn URL");
                }
            }
            "company_registration_number" => {
                optional_within(
                    &mut report,
                    "company_registration_number",
                    &data.company_registration_number,
                    50,
                    "Registration number too long",
                );
            }
            "known_associations" => {
                for entry in &data.known_associations {
                    if entry.chars().count() > 200 {
                        report.push("known_associations", "Association name too long");
                    }
                }
            }
            "comments" => {
                optional_within(&mut report, "comments", &data.comments, 1000, "Comments too long");
            }
            "phone" => {
                let value = data.phone.trim();
                if !value.is_empty() && !phone_pattern().is_match(value) {
                    report.push("phone", "Invalid phone format");
                }
            }
            "email" => {
                let value = data.email.trim();
                if !value.is_empty() && !email_pattern().is_match(value) {
                    report.push("email", "Invalid email format");
                }
            }
            _ => {}
        }
    }

    report
}

fn required_within(
    report: &mut ValidationReport,
    field: &str,
    value: &str,
    max: usize,
    empty_message: &str,
    long_message: &str,
) {
    if value.trim().is_empty() {
        report.push(field, empty_message);
    } else if value.chars().count() > max {
        report.push(field, long_message);
    }
}

fn optional_within(
    report: &mut ValidationReport,
    field: &str,
    value: &str,
    max: usize,
    long_message: &str,
) {
    if value.chars().count() > max {
        report.push(field, long_message);
    }
}

fn validate_address(report: &mut ValidationReport, data: &GuarantorFormData) {
    let address = &data.address;
    required_within(report, "address.street", &address.street, 200,
        "Street address is required", "Street address too long");
    required_within(report, "address.city", &address.city, 100,
        "City is required", "City name too long");
    if address.state.chars().count() != 2 {
        report.push("address.state", "State must be 2 characters");
    }
    if !zip_pattern().is_match(address.zip.trim()) {
        report.push("address.zip", "Invalid ZIP code format");
    }
}

fn validate_date_of_birth(report: &mut ValidationReport, value: &str) {
    let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d");
    let valid = match parsed {
        Ok(date) => date < Utc::now().date_naive(),
        Err(_) => false,
    };
    if !valid {
        report.push("date_of_birth", "Invalid date format or future date not allowed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarantors::domain::Address;
    use chrono::Duration;

    fn valid_data() -> GuarantorFormData {
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
            known_associations: vec!["Tech Association".to_string()],
            comments: "Reliable guarantor".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            email: "john.doe@example.com".to_string(),
        }
    }

    #[test]
    fn fully_populated_data_passes() {
        assert!(validate(&valid_data()).is_valid());
    }

    #[test]
    fn empty_name_reports_required_message() {
        let mut data = valid_data();
        data.guarantor_name = String::new();

        let report = validate(&data);
        let errors = report.errors_for("guarantor_name");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Name is required");
    }

    #[test]
    fn zip_format_accepts_five_and_nine_digit_forms() {
        let mut data = valid_data();

        data.address.zip = "1234".to_string();
        assert!(!validate(&data).is_valid());

        data.address.zip = "85001".to_string();
        assert!(validate(&data).is_valid());

        data.address.zip = "85001-1234".to_string();
        assert!(validate(&data).is_valid());
    }

    #[test]
    fn future_date_of_birth_is_rejected() {
        let mut data = valid_data();
        let next_year = Utc::now().date_naive() + Duration::days(365);
        data.date_of_birth = next_year.format("%Y-%m-%d").to_string();

        let report = validate(&data);
        assert_eq!(
            report.errors_for("date_of_birth")[0].message,
            "Invalid date format or future date not allowed"
        );
    }

    #[test]
    fn unparseable_date_of_birth_is_rejected() {
        let mut data = valid_data();
        data.date_of_birth = "not-a-date".to_string();
        assert!(!validate(&data).is_valid());
    }

    #[test]
    fn empty_optional_fields_are_always_valid() {
        let mut data = valid_data();
        data.employer_or_business = String::new();
        data.linkedin_profile = String::new();
        data.company_registration_number = String::new();
        data.comments = String::new();
        data.phone = String::new();
        data.email = String::new();

        assert!(validate(&data).is_valid());
    }

    #[test]
    fn malformed_optional_fields_fail_when_present() {
        let mut data = valid_data();
        data.phone = "call me maybe".to_string();
        data.email = "not-an-email".to_string();
        data.linkedin_profile = "linkedin.com/in/johndoe".to_string();

        let report = validate(&data);
        assert_eq!(report.errors_for("phone")[0].message, "Invalid phone format");
        assert_eq!(report.errors_for("email")[0].message, "Invalid email format");
        assert_eq!(
            report.errors_for("linkedin_profile")[0].message,
            "Invalid LinkedIn URL"
        );
    }

    #[test]
    fn subset_validation_ignores_fields_outside_the_list() {
        let mut data = valid_data();
        data.guarantor_name = String::new();

        let report = validate_fields(&data, &["phone", "email"]);
        assert!(report.is_valid());
    }

    #[test]
    fn state_code_must_be_two_characters() {
        let mut data = valid_data();
        data.address.state = "Ariz".to_string();

        let report = validate(&data);
        assert_eq!(
            report.errors_for("address")[0].field,
            "address.state"
        );
    }
}
