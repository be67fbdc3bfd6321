//! Input validation for roster generation.
//!
//! Checks structural integrity of a [`GenerationInput`] before generation.
//! Detects:
//! - Duplicate worker and shift type IDs
//! - A missing or duplicated OFF shift type
//! - Requests referencing unknown workers, unknown shift types, or dates
//!   outside the month
//! - Manpower plans for another month or referencing unknown shift types
//! - Positive rule penalties
//!
//! Only a missing OFF shift stops generation; the generator logs the rest.

use std::collections::HashSet;

use crate::generator::GenerationInput;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// No shift type has code `OFF`.
    MissingOffShift,
    /// More than one shift type has code `OFF`.
    DuplicateOffShift,
    /// A request references a worker not in the input.
    UnknownWorker,
    /// A request or manpower entry references a shift type not in the catalogue.
    UnknownShift,
    /// A request or manpower entry falls outside the generated month.
    DateOutsideMonth,
    /// A manpower plan is for a different month.
    ManpowerMonthMismatch,
    /// A rule penalty is positive and would raise the score.
    PositivePenalty,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a generation input.
///
/// Checks:
/// 1. No duplicate worker IDs
/// 2. No duplicate shift type IDs
/// 3. Exactly one OFF shift type
/// 4. Approved requests point to known workers, known shift types, and
///    dates inside the month
/// 5. The manpower plan matches the month and only names known shift types
/// 6. Rule penalties are non-positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &GenerationInput) -> ValidationResult {
    let mut errors = Vec::new();

    let mut worker_ids = HashSet::new();
    for w in &input.workers {
        if !worker_ids.insert(w.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", w.id),
            ));
        }
    }

    let mut shift_ids = HashSet::new();
    for s in input.shifts.all() {
        if !shift_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift type ID: {}", s.id),
            ));
        }
    }

    match input.shifts.all().iter().filter(|s| s.is_off()).count() {
        0 => errors.push(ValidationError::new(
            ValidationErrorKind::MissingOffShift,
            "No shift type with code 'OFF'",
        )),
        1 => {}
        n => errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateOffShift,
            format!("{n} shift types share code 'OFF'; the first one is used"),
        )),
    }

    // Pending and rejected requests are ignored by generation.
    for r in input.requests.iter().filter(|r| r.is_approved()) {
        if !worker_ids.contains(r.worker_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownWorker,
                format!("Request '{}' references unknown worker '{}'", r.id, r.worker_id),
            ));
        }
        if !input.month.contains(r.date) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DateOutsideMonth,
                format!("Request '{}' on {} is outside {}", r.id, r.date, input.month),
            ));
        }
        if let Some(shift_id) = r.approved_preference() {
            if !shift_ids.contains(shift_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownShift,
                    format!("Request '{}' references unknown shift type '{shift_id}'", r.id),
                ));
            }
        }
    }

    if let Some(plan) = &input.manpower {
        if plan.month != input.month {
            errors.push(ValidationError::new(
                ValidationErrorKind::ManpowerMonthMismatch,
                format!("Manpower plan is for {}, not {}", plan.month, input.month),
            ));
        }
        for req in &plan.daily_requirements {
            if !input.month.contains(req.date) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DateOutsideMonth,
                    format!("Manpower entry {} is outside {}", req.date, input.month),
                ));
            }
            for shift_id in req.requirements.keys() {
                if !shift_ids.contains(shift_id.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownShift,
                        format!(
                            "Manpower entry {} references unknown shift type '{shift_id}'",
                            req.date
                        ),
                    ));
                }
            }
        }
    }

    for c in &input.rule_configs {
        if c.penalty_score > 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::PositivePenalty,
                format!(
                    "Rule '{}' has positive penalty {}",
                    c.rule_name, c.penalty_score
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DailyRequirement, ManpowerPlan, Request, SchedulingRuleConfig, ShiftType, Worker,
        YearMonth,
    };
    use chrono::NaiveDate;

    fn month() -> YearMonth {
        YearMonth::new(2024, 4).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn sample_input() -> GenerationInput {
        GenerationInput::new("org", "grp", month())
            .with_worker(Worker::new("w1"))
            .with_worker(Worker::new("w2"))
            .with_shift(ShiftType::new("d", "Day Shift", "D"))
            .with_shift(ShiftType::off("off"))
    }

    fn has(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        let input = sample_input()
            .with_request(Request::leave("r1", "w1", d(2)).approved())
            .with_rule_config(SchedulingRuleConfig::new("Max").with_penalty(-5));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_duplicate_worker_id() {
        let input = sample_input().with_worker(Worker::new("w1"));
        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("worker")));
    }

    #[test]
    fn test_off_shift_count() {
        let input = GenerationInput::new("org", "grp", month())
            .with_shift(ShiftType::new("d", "Day Shift", "D"));
        assert!(has(
            &validate_input(&input).unwrap_err(),
            ValidationErrorKind::MissingOffShift
        ));

        let input = sample_input().with_shift(ShiftType::off("off2"));
        assert!(has(
            &validate_input(&input).unwrap_err(),
            ValidationErrorKind::DuplicateOffShift
        ));
    }

    #[test]
    fn test_bad_requests() {
        let input = sample_input()
            .with_request(Request::leave("r1", "ghost", d(2)).approved())
            .with_request(Request::preference("r2", "w1", d(3), "x").approved())
            .with_request(
                Request::leave("r3", "w1", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
                    .approved(),
            );
        let errors = validate_input(&input).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::UnknownWorker));
        assert!(has(&errors, ValidationErrorKind::UnknownShift));
        assert!(has(&errors, ValidationErrorKind::DateOutsideMonth));
    }

    #[test]
    fn test_pending_requests_ignored() {
        let input = sample_input().with_request(Request::leave("r1", "ghost", d(2)));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_manpower_checks() {
        let plan = ManpowerPlan::new("org", "grp", YearMonth::new(2024, 5).unwrap())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("night", 1));
        let errors = validate_input(&sample_input().with_manpower(plan)).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::ManpowerMonthMismatch));
        assert!(has(&errors, ValidationErrorKind::UnknownShift));
    }

    #[test]
    fn test_positive_penalty() {
        let input =
            sample_input().with_rule_config(SchedulingRuleConfig::new("Max").with_penalty(5));
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::PositivePenalty);
    }
}
