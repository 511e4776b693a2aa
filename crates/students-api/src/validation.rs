//! Request payload validation.
//!
//! Field rules are evaluated as explicit declarative constraints on the
//! payload itself, before any storage call, and every violated field is
//! reported rather than just the first.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Incoming student payload for create and update.
///
/// Deserialization is lenient: absent fields default to the empty
/// string or zero and are then rejected by validation, so a missing
/// field is a validation failure rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentPayload {
    /// Accepted but never trusted; on update the path id always wins.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Validation rule a field can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Field is absent or the zero value.
    Required,
    /// Field does not look like an email address.
    Email,
}

/// A single field-level violation: which field broke which rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Rule::Required => write!(f, "field {} is a required field", self.field),
            Rule::Email => write!(f, "field {} is not a valid email", self.field),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

impl StudentPayload {
    /// Evaluates every field rule and returns all violations.
    ///
    /// `age == 0` counts as absent, so a legitimately-zero age is
    /// rejected; negative ages pass here and are left to the schema's
    /// `CHECK(age > 0)` constraint.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.name.is_empty() {
            violations.push(FieldViolation {
                field: "Name",
                rule: Rule::Required,
            });
        }

        if self.email.is_empty() {
            violations.push(FieldViolation {
                field: "Email",
                rule: Rule::Required,
            });
        } else if !email_regex().is_match(&self.email) {
            violations.push(FieldViolation {
                field: "Email",
                rule: Rule::Email,
            });
        }

        if self.age == 0 {
            violations.push(FieldViolation {
                field: "Age",
                rule: Rule::Required,
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, age: i64) -> StudentPayload {
        StudentPayload {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[test]
    fn test_valid_payload_has_no_violations() {
        assert!(payload("Ada", "ada@example.com", 28).validate().is_empty());
    }

    #[test]
    fn test_all_missing_fields_are_reported() {
        let violations = payload("", "", 0).validate();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].to_string(), "field Name is a required field");
        assert_eq!(violations[1].to_string(), "field Email is a required field");
        assert_eq!(violations[2].to_string(), "field Age is a required field");
    }

    #[test]
    fn test_malformed_email_is_reported() {
        let violations = payload("Ada", "not-an-email", 28).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "field Email is not a valid email"
        );
    }

    #[test]
    fn test_empty_email_is_required_not_format() {
        let violations = payload("Ada", "", 28).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, Rule::Required);
    }

    #[test]
    fn test_zero_age_is_rejected_as_required() {
        let violations = payload("Ada", "ada@example.com", 0).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "Age");
    }

    #[test]
    fn test_negative_age_passes_field_validation() {
        // Schema-level CHECK(age > 0) catches this later.
        assert!(payload("Ada", "ada@example.com", -3).validate().is_empty());
    }

    #[test]
    fn test_missing_fields_default_on_deserialize() {
        let payload: StudentPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.name, "");
        assert_eq!(payload.age, 0);
        assert_eq!(payload.validate().len(), 3);
    }
}
