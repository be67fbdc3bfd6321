//! Schedule (solution) model.
//!
//! A schedule is the aggregate result of one generation run for an
//! (organization, group, month): a score, the violation messages, and one
//! [`Assignment`] per worker mapping day keys to shift type ids.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{day_key, parse_day_key, YearMonth};

/// Day key (`"01"`..`"31"`) → shift type id. Missing days are unassigned.
pub type DayShifts = BTreeMap<String, String>;

/// Score of a schedule whose generation aborted on a missing OFF shift.
pub const FAILED_SCORE: i32 = -9999;

/// Aggregate result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Unique schedule identifier.
    pub id: String,
    pub organization_id: String,
    pub group_id: String,
    pub month: YearMonth,
    pub status: ScheduleStatus,
    pub generated_at: DateTime<Utc>,
    /// Sum of penalty scores of all violations. Starts at 0; lower is worse.
    pub total_score: i32,
    /// Human-readable violation messages, in detection order.
    pub violated_rules: Vec<String>,
}

/// Lifecycle status of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Generated, not yet finalized.
    Draft,
    /// Finalized and visible to workers.
    Published,
    /// Generation aborted on a precondition.
    Failed,
}

/// One worker's shifts for the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Owning schedule.
    pub schedule_id: String,
    pub worker_id: String,
    /// Day key → shift type id.
    pub shifts: DayShifts,
}

/// A rule that was not satisfied for one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Identifier of the rule implementation.
    pub rule_id: String,
    /// Name of the config that activated the rule.
    pub rule_name: String,
    pub worker_id: String,
    /// Offending day, when the rule pins one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Human-readable description.
    pub message: String,
    /// Penalty taken from the config (non-positive).
    pub penalty_score: i32,
}

impl Schedule {
    /// Whether generation aborted.
    pub fn is_failed(&self) -> bool {
        self.status == ScheduleStatus::Failed
    }

    /// Whether no rule was violated.
    pub fn is_clean(&self) -> bool {
        self.violated_rules.is_empty()
    }

    /// Replaces score and messages from a fresh set of violations.
    pub fn apply_violations(&mut self, violations: &[Violation]) {
        self.total_score = total_penalty(violations);
        self.violated_rules = violations.iter().map(|v| v.message.clone()).collect();
    }
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new(
        id: impl Into<String>,
        schedule_id: impl Into<String>,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            schedule_id: schedule_id.into(),
            worker_id: worker_id.into(),
            shifts: DayShifts::new(),
        }
    }

    /// Sets the shift for a day.
    pub fn with_shift(mut self, day: u32, shift_type_id: impl Into<String>) -> Self {
        self.set_shift(day, shift_type_id);
        self
    }

    /// Shift type id on `day`, if assigned.
    pub fn shift_on(&self, day: u32) -> Option<&str> {
        self.shifts.get(&day_key(day)).map(String::as_str)
    }

    /// Sets the shift for a day, replacing any previous one.
    pub fn set_shift(&mut self, day: u32, shift_type_id: impl Into<String>) {
        self.shifts.insert(day_key(day), shift_type_id.into());
    }

    /// Clears the shift for a day.
    pub fn clear_shift(&mut self, day: u32) -> Option<String> {
        self.shifts.remove(&day_key(day))
    }

    /// Assigned days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (u32, &str)> {
        sorted_days(&self.shifts).into_iter()
    }

    /// Number of days assigned to `shift_type_id`.
    pub fn count_of(&self, shift_type_id: &str) -> usize {
        self.shifts.values().filter(|s| *s == shift_type_id).count()
    }
}

/// Sum of the penalty scores of `violations`.
pub fn total_penalty(violations: &[Violation]) -> i32 {
    violations.iter().map(|v| v.penalty_score).sum()
}

/// Day-number/shift pairs sorted by day. Keys that are not day numbers are skipped.
pub fn sorted_days(shifts: &DayShifts) -> Vec<(u32, &str)> {
    let mut days: Vec<(u32, &str)> = shifts
        .iter()
        .filter_map(|(k, v)| parse_day_key(k).map(|d| (d, v.as_str())))
        .collect();
    days.sort_by_key(|(d, _)| *d);
    days
}
