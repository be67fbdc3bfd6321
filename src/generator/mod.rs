//! Roster generation, editing, and staffing KPIs.
//!
//! # Algorithm
//!
//! `ScheduleGenerator` is a greedy, pass-based heuristic: approved leave,
//! then manpower targets, then preference-weighted residual fill, then rule
//! validation. It is not optimal, but produces a complete draft quickly and
//! scores it against the configured rules.
//!
//! # Randomness
//!
//! Every random decision draws from a caller-supplied `Rng`. Identifiers of
//! the generated schedule and assignments come from the same source, so a
//! seeded source and a fixed [`Clock`](crate::clock::Clock) give
//! byte-identical output.
//!
//! # KPI
//!
//! `StaffingKpi` measures a result against the manpower plan and the
//! approved preferences.

mod draft;
mod edit;
mod greedy;
mod input;
mod kpi;

pub use edit::ShiftEdit;
pub use greedy::ScheduleGenerator;
pub use input::GenerationInput;
pub use kpi::StaffingKpi;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::{Assignment, Schedule, ScheduleStatus, Violation, FAILED_SCORE, OFF_SHIFT_CODE};

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Draft (or failed) schedule.
    pub schedule: Schedule,
    /// One assignment per worker, in input worker order. Empty on failure.
    pub assignments: Vec<Assignment>,
    /// Structured violations behind `schedule.violated_rules`.
    pub violations: Vec<Violation>,
}

impl GenerationResult {
    /// Result for a run aborted on a missing OFF shift.
    fn failed(input: &GenerationInput, schedule_id: String, now: DateTime<Utc>) -> Self {
        Self {
            schedule: Schedule {
                id: schedule_id,
                organization_id: input.organization_id.clone(),
                group_id: input.group_id.clone(),
                month: input.month,
                status: ScheduleStatus::Failed,
                generated_at: now,
                total_score: FAILED_SCORE,
                violated_rules: vec![format!(
                    "Missing required shift type with code '{OFF_SHIFT_CODE}'"
                )],
            },
            assignments: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Whether generation aborted.
    pub fn is_failed(&self) -> bool {
        self.schedule.is_failed()
    }

    /// The assignment of one worker.
    pub fn assignment_for(&self, worker_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.worker_id == worker_id)
    }

    /// Draws new schedule and assignment ids from `rng`, keeping the shifts.
    pub fn reassign_ids<R: Rng>(&mut self, rng: &mut R) {
        self.schedule.id = new_id(rng);
        for assignment in &mut self.assignments {
            assignment.id = new_id(rng);
            assignment.schedule_id = self.schedule.id.clone();
        }
    }
}

/// A random (v4) UUID drawn from `rng`.
pub(crate) fn new_id<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearMonth;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_reassign_ids_keeps_shifts() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut result = GenerationResult {
            schedule: Schedule {
                id: "s1".into(),
                organization_id: "org".into(),
                group_id: "grp".into(),
                month: YearMonth::new(2024, 1).unwrap(),
                status: ScheduleStatus::Draft,
                generated_at: DateTime::<Utc>::UNIX_EPOCH,
                total_score: 0,
                violated_rules: Vec::new(),
            },
            assignments: vec![Assignment::new("a1", "s1", "w1").with_shift(1, "off")],
            violations: Vec::new(),
        };
        result.reassign_ids(&mut rng);

        assert_ne!(result.schedule.id, "s1");
        assert_ne!(result.assignments[0].id, "a1");
        assert_eq!(result.assignments[0].schedule_id, result.schedule.id);
        assert_eq!(result.assignments[0].shift_on(1), Some("off"));
    }

    #[test]
    fn test_new_id_is_seeded_v4() {
        let a = new_id(&mut ChaCha8Rng::seed_from_u64(3));
        let b = new_id(&mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
        let parsed = uuid::Uuid::parse_str(&a).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
