//! Shipping Details

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Shipping form fields that are validated before checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    /// Recipient name
    Name,

    /// Contact email
    Email,

    /// Street address
    Address,

    /// City
    City,

    /// Postal code
    PostalCode,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShippingField::Name => "name",
            ShippingField::Email => "email",
            ShippingField::Address => "address",
            ShippingField::City => "city",
            ShippingField::PostalCode => "postal code",
        })
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field is empty or whitespace.
    Missing,

    /// The email address does not look like one.
    InvalidEmail,
}

/// A single inline form error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field
    pub field: ShippingField,

    /// What is wrong with it
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::InvalidEmail => write!(f, "{} is not a valid email address", self.field),
        }
    }
}

/// Every problem found on a shipping form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("shipping details are incomplete ({} problem(s))", .errors.len())]
pub struct ShippingFormErrors {
    errors: SmallVec<[FieldError; 5]>,
}

impl ShippingFormErrors {
    /// The individual field errors, in form order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether the given field has a problem.
    pub fn has(&self, field: ShippingField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn push(&mut self, field: ShippingField, problem: FieldProblem) {
        self.errors.push(FieldError { field, problem });
    }
}

/// Shipping details captured by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    /// Recipient name
    pub name: String,

    /// Contact email, also used as the payer email
    pub email: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// Optional contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ShippingDetails {
    /// Check that every required field is filled and the email looks valid.
    ///
    /// # Errors
    ///
    /// Returns every field problem found, not just the first.
    pub fn validate(&self) -> Result<(), ShippingFormErrors> {
        let mut errors = ShippingFormErrors::default();

        for (field, value) in [
            (ShippingField::Name, &self.name),
            (ShippingField::Email, &self.email),
            (ShippingField::Address, &self.address),
            (ShippingField::City, &self.city),
            (ShippingField::PostalCode, &self.postal_code),
        ] {
            if value.trim().is_empty() {
                errors.push(field, FieldProblem::Missing);
            } else if field == ShippingField::Email && !is_plausible_email(value.trim()) {
                errors.push(field, FieldProblem::InvalidEmail);
            }
        }

        if errors.errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether [`validate`](Self::validate) would pass.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Basic `local@domain.tld` shape check: no whitespace, one `@`, and a dot
/// inside the domain with text on both sides.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .split_once('.')
        .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ShippingDetails {
        ShippingDetails {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Marina Road".to_string(),
            city: "Lagos".to_string(),
            postal_code: "101001".to_string(),
            phone: None,
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_missing() {
        let details = ShippingDetails {
            name: "   ".to_string(),
            city: String::new(),
            ..complete()
        };

        let Err(errors) = details.validate() else {
            panic!("blank name and city must fail validation");
        };

        assert_eq!(
            errors.errors(),
            [
                FieldError {
                    field: ShippingField::Name,
                    problem: FieldProblem::Missing,
                },
                FieldError {
                    field: ShippingField::City,
                    problem: FieldProblem::Missing,
                },
            ]
        );
    }

    #[test]
    fn empty_form_reports_every_field() {
        let Err(errors) = ShippingDetails::default().validate() else {
            panic!("empty form must fail validation");
        };

        assert_eq!(errors.errors().len(), 5);
        assert!(errors.has(ShippingField::PostalCode));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in [
            "ada",
            "ada@",
            "@example.com",
            "ada@example",
            "ada@.com",
            "ada@example.",
            "ada obi@example.com",
            "ada@@example.com",
        ] {
            let details = ShippingDetails {
                email: email.to_string(),
                ..complete()
            };

            assert!(
                details
                    .validate()
                    .is_err_and(|e| e.has(ShippingField::Email)),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn plausible_emails_are_accepted() {
        for email in ["ada@example.com", "a.b+c@mail.example.ng", " ada@example.com "] {
            assert!(is_plausible_email(email.trim()), "{email} should be accepted");
        }
    }

    #[test]
    fn field_errors_render_for_display() {
        let error = FieldError {
            field: ShippingField::PostalCode,
            problem: FieldProblem::Missing,
        };

        assert_eq!(error.to_string(), "postal code is required");
    }
}
