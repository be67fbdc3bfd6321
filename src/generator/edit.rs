//! Manual edits to an existing schedule.
//!
//! Edits mutate assignments in place and then re-run validation so the
//! schedule's score and violation list stay consistent with its cells.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationInput, ScheduleGenerator};
use crate::error::EditError;
use crate::models::{Assignment, Schedule, Violation};

/// A single-cell change to a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ShiftEdit {
    /// Assign a shift type to (worker, day).
    Set {
        worker_id: String,
        day: u32,
        shift_type_id: String,
    },
    /// Leave (worker, day) unassigned.
    Clear { worker_id: String, day: u32 },
}

impl ShiftEdit {
    pub fn set(worker_id: impl Into<String>, day: u32, shift_type_id: impl Into<String>) -> Self {
        Self::Set {
            worker_id: worker_id.into(),
            day,
            shift_type_id: shift_type_id.into(),
        }
    }

    pub fn clear(worker_id: impl Into<String>, day: u32) -> Self {
        Self::Clear {
            worker_id: worker_id.into(),
            day,
        }
    }

    fn target(&self) -> (&str, u32) {
        match self {
            Self::Set { worker_id, day, .. } | Self::Clear { worker_id, day } => (worker_id, *day),
        }
    }
}

impl ScheduleGenerator {
    /// Applies one edit, then revalidates the whole schedule.
    ///
    /// On error nothing is changed.
    pub fn apply_edit(
        &self,
        input: &GenerationInput,
        schedule: &mut Schedule,
        assignments: &mut [Assignment],
        edit: &ShiftEdit,
    ) -> Result<Vec<Violation>, EditError> {
        let (worker_id, day) = edit.target();
        if input.month.date(day).is_none() {
            return Err(EditError::DayOutOfRange {
                day,
                month: input.month.to_string(),
            });
        }
        if let ShiftEdit::Set { shift_type_id, .. } = edit {
            if !input.shifts.contains(shift_type_id) {
                return Err(EditError::UnknownShift(shift_type_id.clone()));
            }
        }
        let assignment = assignments
            .iter_mut()
            .find(|a| a.worker_id == worker_id)
            .ok_or_else(|| EditError::UnknownWorker(worker_id.to_string()))?;

        match edit {
            ShiftEdit::Set { shift_type_id, .. } => {
                assignment.set_shift(day, shift_type_id.clone())
            }
            ShiftEdit::Clear { .. } => {
                assignment.clear_shift(day);
            }
        }
        debug!(schedule_id = %schedule.id, worker = %worker_id, day, "applied shift edit");

        Ok(self.revalidate(input, schedule, assignments))
    }

    /// Recomputes score and violation messages for existing assignments.
    pub fn revalidate(
        &self,
        input: &GenerationInput,
        schedule: &mut Schedule,
        assignments: &[Assignment],
    ) -> Vec<Violation> {
        let violations = self.engine.validate_assignments(
            &input.workers,
            assignments,
            &input.shifts,
            &input.rule_configs,
        );
        schedule.apply_violations(&violations);
        violations
    }
}
