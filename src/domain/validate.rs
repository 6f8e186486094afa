//! Request payload validation.
//!
//! Validation runs in the transport layer before any business logic and
//! collects every violation rather than stopping at the first.

use serde::Serialize;

use super::incident::IncidentDraft;

/// Name length bounds, in Unicode scalar values
pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 100;

/// Description length bounds, in Unicode scalar values
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 1000;

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a create/update payload.
///
/// Whitespace-only strings count as missing. Returns every violation
/// found, in field order.
pub fn validate_draft(draft: &IncidentDraft) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    check_field(
        &mut violations,
        "name",
        &draft.name,
        NAME_MIN,
        NAME_MAX,
    );
    check_field(
        &mut violations,
        "description",
        &draft.description,
        DESCRIPTION_MIN,
        DESCRIPTION_MAX,
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_field(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    if value.trim().is_empty() {
        violations.push(Violation::new(field, format!("{} is required", field)));
        return;
    }

    let len = value.chars().count();
    if len < min || len > max {
        violations.push(Violation::new(
            field,
            format!("{} must be between {} and {} characters", field, min, max),
        ));
    }
}
