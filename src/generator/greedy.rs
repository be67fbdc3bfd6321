//! Greedy monthly roster generator.
//!
//! # Algorithm
//!
//! 1. Abort with a failed schedule if the catalogue has no OFF shift.
//! 2. Place OFF on every day covered by an approved leave request.
//! 3. Index approved shift preferences by (worker, day).
//! 4. For each planned day and shift type, pick up to the required headcount
//!    from a random shuffle of still-unassigned workers.
//! 5. Fill every remaining slot with the best-scoring candidate shift:
//!    preference bonus plus a random tiebreak. OFF is a candidate only while
//!    the day's OFF count is below `workers - required headcount`.
//! 6. Validate every worker against the enabled rules and sum penalties.
//!
//! Steps 4 and 5 draw from the caller's random source, so a seeded source
//! gives reproducible output.
//!
//! # Complexity
//! O(d * (s * w + w * s)) where d=days, s=shift types, w=workers.

use std::collections::HashMap;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::draft::DraftRoster;
use super::{new_id, GenerationInput, GenerationResult};
use crate::clock::Clock;
use crate::config::GeneratorConfig;
use crate::models::{Schedule, ScheduleStatus, ShiftType};
use crate::rules::RuleEngine;
use crate::validation::validate_input;

/// (worker id, day) → preferred shift type id.
type PreferenceIndex<'a> = HashMap<(&'a str, u32), &'a str>;

/// Greedy roster generator.
///
/// Not an exact solver: it fills slots pass by pass and then reports how
/// well the result satisfies the configured rules.
///
/// # Example
///
/// ```
/// use u_roster::clock::SystemClock;
/// use u_roster::generator::{GenerationInput, ScheduleGenerator};
/// use u_roster::models::{ShiftType, Worker, YearMonth};
///
/// let input = GenerationInput::new("org", "grp", YearMonth::new(2024, 5).unwrap())
///     .with_worker(Worker::new("w1").with_name("Ann"))
///     .with_worker(Worker::new("w2").with_name("Ben"))
///     .with_shift(ShiftType::new("d", "Day", "D").with_times("08:00", "16:00"))
///     .with_shift(ShiftType::off("off"));
///
/// let result = ScheduleGenerator::new().generate_seeded(&input, 42, &SystemClock);
/// assert!(!result.is_failed());
/// assert_eq!(result.assignments.len(), 2);
/// assert_eq!(result.assignments[0].shifts.len(), 31);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    pub(crate) engine: RuleEngine,
    config: GeneratorConfig,
}

impl ScheduleGenerator {
    /// Creates a generator with the built-in rules and default scoring.
    pub fn new() -> Self {
        Self {
            engine: RuleEngine::new(),
            config: GeneratorConfig::default(),
        }
    }

    /// Sets the scoring configuration.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the rule engine used for validation.
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates with a ChaCha8 source seeded from `seed`.
    pub fn generate_seeded(
        &self,
        input: &GenerationInput,
        seed: u64,
        clock: &dyn Clock,
    ) -> GenerationResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(input, &mut rng, clock)
    }

    /// Generates a draft schedule.
    ///
    /// Never fails: a missing OFF shift yields a result whose schedule has
    /// status `Failed`, score [`FAILED_SCORE`](crate::models::FAILED_SCORE)
    /// and a single violation message.
    pub fn generate<R: Rng>(
        &self,
        input: &GenerationInput,
        rng: &mut R,
        clock: &dyn Clock,
    ) -> GenerationResult {
        info!(
            organization = %input.organization_id,
            group = %input.group_id,
            month = %input.month,
            workers = input.workers.len(),
            shifts = input.shifts.len(),
            rules = input.enabled_rules().count(),
            has_manpower = input.manpower.is_some(),
            "generation started"
        );

        if let Err(errors) = validate_input(input) {
            for error in &errors {
                warn!(kind = ?error.kind, "{}", error.message);
            }
        }

        let schedule_id = new_id(rng);
        let Some(off) = input.shifts.off_shift() else {
            warn!(
                organization = %input.organization_id,
                group = %input.group_id,
                "no OFF shift type in catalogue; aborting generation"
            );
            return GenerationResult::failed(input, schedule_id, clock.now());
        };

        let draft = DraftRoster::new(input.workers.len(), input.month.days_in_month());
        let draft = place_leave(draft, input, &off.id);
        let preferences = preference_index(input);
        let draft = fill_manpower(draft, input, rng);
        let draft = self.fill_residual(draft, input, &off.id, &preferences, rng);
        let assignments = draft.into_assignments(&input.workers, &schedule_id, rng);

        let violations = self.engine.validate_assignments(
            &input.workers,
            &assignments,
            &input.shifts,
            &input.rule_configs,
        );

        let mut schedule = Schedule {
            id: schedule_id,
            organization_id: input.organization_id.clone(),
            group_id: input.group_id.clone(),
            month: input.month,
            status: ScheduleStatus::Draft,
            generated_at: clock.now(),
            total_score: 0,
            violated_rules: Vec::new(),
        };
        schedule.apply_violations(&violations);

        info!(
            schedule_id = %schedule.id,
            score = schedule.total_score,
            violations = violations.len(),
            "generation finished"
        );

        GenerationResult {
            schedule,
            assignments,
            violations,
        }
    }

    /// Step 5: fill every open slot.
    fn fill_residual<'a, R: Rng>(
        &self,
        mut draft: DraftRoster,
        input: &'a GenerationInput,
        off_id: &'a str,
        preferences: &PreferenceIndex<'a>,
        rng: &mut R,
    ) -> DraftRoster {
        let all: Vec<&ShiftType> = input.shifts.all().iter().collect();
        let work: Vec<&ShiftType> = input.shifts.work_shifts().collect();
        let worker_count = input.workers.len();

        for day in input.month.days() {
            let required = match (&input.manpower, input.month.date(day)) {
                (Some(plan), Some(date)) => plan.total_required(date) as usize,
                _ => 0,
            };
            let off_cap = worker_count.saturating_sub(required);
            let mut off_count = draft.count_on(day, off_id);

            for (w, worker) in input.workers.iter().enumerate() {
                if !draft.is_open(w, day) {
                    continue;
                }
                let candidates = if off_count < off_cap { &all } else { &work };
                let preferred = preferences.get(&(worker.id.as_str(), day)).copied();

                let chosen = self
                    .best_candidate(candidates, preferred, rng)
                    .or_else(|| work.choose(rng).map(|s| s.id.as_str()))
                    .unwrap_or(off_id);

                if chosen == off_id {
                    off_count += 1;
                }
                draft.fill(w, day, chosen);
            }
        }
        draft
    }

    /// Highest-scoring candidate; the first one wins ties.
    fn best_candidate<'a, R: Rng>(
        &self,
        candidates: &[&'a ShiftType],
        preferred: Option<&str>,
        rng: &mut R,
    ) -> Option<&'a str> {
        let spread = self.config.tiebreak_spread.max(1);
        let mut best: Option<(u32, &'a str)> = None;
        for shift in candidates {
            let bonus = if preferred == Some(shift.id.as_str()) {
                self.config.preference_bonus
            } else {
                0
            };
            let score = bonus + rng.random_range(0..spread);
            let better = match best {
                None => true,
                Some((top, _)) => score > top,
            };
            if better {
                best = Some((score, shift.id.as_str()));
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Step 2: approved leave forces OFF.
fn place_leave(mut draft: DraftRoster, input: &GenerationInput, off_id: &str) -> DraftRoster {
    for request in input.requests.iter().filter(|r| r.is_approved_leave()) {
        let (Some(w), Some(day)) = (
            input.worker_index(&request.worker_id),
            input.month.day_of(request.date),
        ) else {
            debug!(request = %request.id, "leave request outside roster; skipped");
            continue;
        };
        draft.place(w, day, off_id);
    }
    draft
}

/// Step 3: approved shift preferences within the month.
fn preference_index(input: &GenerationInput) -> PreferenceIndex<'_> {
    input
        .requests
        .iter()
        .filter_map(|r| {
            let shift = r.approved_preference()?;
            let day = input.month.day_of(r.date)?;
            Some(((r.worker_id.as_str(), day), shift))
        })
        .collect()
}

/// Step 4: staff each planned shift from a shuffled pool of open workers.
fn fill_manpower<R: Rng>(
    mut draft: DraftRoster,
    input: &GenerationInput,
    rng: &mut R,
) -> DraftRoster {
    let Some(plan) = &input.manpower else {
        return draft;
    };

    for day in input.month.days() {
        let Some(requirement) = input
            .month
            .date(day)
            .and_then(|date| plan.requirement_for(date))
        else {
            continue;
        };

        for (shift_id, &count) in &requirement.requirements {
            if !input.shifts.contains(shift_id) {
                warn!(
                    day,
                    shift = %shift_id,
                    "manpower plan references unknown shift type; skipped"
                );
                continue;
            }
            let mut order: Vec<usize> = (0..draft.workers()).collect();
            order.shuffle(rng);
            let picked: Vec<usize> = order
                .into_iter()
                .filter(|&w| draft.is_open(w, day))
                .take(count as usize)
                .collect();
            if picked.len() < count as usize {
                debug!(
                    day,
                    shift = %shift_id,
                    required = count,
                    available = picked.len(),
                    "not enough open workers to meet requirement"
                );
            }
            for w in picked {
                draft.fill(w, day, shift_id);
            }
        }
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{
        DailyRequirement, ManpowerPlan, Request, SchedulingRuleConfig, ShiftCatalogue, Worker,
        YearMonth, FAILED_SCORE,
    };
    use crate::rules::builtin::{MaxConsecutiveWorkDays, NightShiftFollowup};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn may() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 25, 9, 0, 0).unwrap())
    }

    fn shifts() -> ShiftCatalogue {
        ShiftCatalogue::default()
            .with_shift(ShiftType::new("d", "Day Shift", "D").with_times("08:00", "16:00"))
            .with_shift(ShiftType::new("e", "Evening", "E").with_times("16:00", "00:00"))
            .with_shift(ShiftType::new("n", "Night Duty", "N").with_times("00:00", "08:00"))
            .with_shift(ShiftType::off("off"))
    }

    fn workers(n: usize) -> Vec<Worker> {
        (1..=n)
            .map(|i| Worker::new(format!("w{i}")).with_name(format!("Worker {i}")))
            .collect()
    }

    fn input(n: usize) -> GenerationInput {
        GenerationInput::new("org", "grp", may())
            .with_workers(workers(n))
            .with_shifts(shifts())
    }

    #[test]
    fn test_every_slot_filled_once() {
        let result = ScheduleGenerator::new().generate_seeded(&input(4), 1, &clock());
        assert!(!result.is_failed());
        assert_eq!(result.schedule.status, ScheduleStatus::Draft);
        assert_eq!(result.assignments.len(), 4);
        for a in &result.assignments {
            assert_eq!(a.schedule_id, result.schedule.id);
            assert_eq!(a.shifts.len(), 31);
            assert!(a.shifts.values().all(|s| shifts().contains(s)));
        }
    }

    #[test]
    fn test_missing_off_shift_aborts() {
        let input = GenerationInput::new("org", "grp", may())
            .with_workers(workers(3))
            .with_shift(ShiftType::new("d", "Day", "D"))
            .with_request(Request::leave("r1", "w1", d(3)).approved());
        let result = ScheduleGenerator::new().generate_seeded(&input, 1, &clock());

        assert!(result.is_failed());
        assert_eq!(result.schedule.total_score, FAILED_SCORE);
        assert!(result.assignments.is_empty());
        assert_eq!(result.schedule.violated_rules.len(), 1);
        assert!(result.schedule.violated_rules[0].contains("OFF"));
    }

    #[test]
    fn test_leave_always_off() {
        // Demand everyone on day shift every day; leave must still win
        let mut plan = ManpowerPlan::new("org", "grp", may());
        for day in may().days() {
            plan = plan.with_requirement(DailyRequirement::new(d(day)).with_shift("d", 3));
        }
        let input = input(3)
            .with_manpower(plan)
            .with_request(Request::leave("r1", "w2", d(10)).approved())
            .with_request(Request::leave("r2", "w3", d(11)).approved())
            .with_request(Request::preference("r3", "w2", d(10), "d").approved())
            .with_request(Request::leave("r4", "w1", d(12)));

        for seed in 0..5 {
            let result = ScheduleGenerator::new().generate_seeded(&input, seed, &clock());
            assert_eq!(result.assignments[1].shift_on(10), Some("off"));
            assert_eq!(result.assignments[2].shift_on(11), Some("off"));
            // Pending leave has no effect
            assert_eq!(result.assignments[0].shift_on(12), Some("d"));
        }
    }

    #[test]
    fn test_manpower_targets_met() {
        let plan = ManpowerPlan::new("org", "grp", may()).with_requirement(
            DailyRequirement::new(d(1)).with_shift("d", 2).with_shift("n", 1),
        );
        let input = input(5).with_manpower(plan);
        let result = ScheduleGenerator::new().generate_seeded(&input, 3, &clock());

        let on = |shift: &str| {
            result
                .assignments
                .iter()
                .filter(|a| a.shift_on(1) == Some(shift))
                .count()
        };
        assert!(on("d") >= 2);
        assert!(on("n") >= 1);
        // 5 workers, 3 required → at most 2 OFF
        assert!(on("off") <= 2);
    }

    #[test]
    fn test_oversized_targets_fill_everyone() {
        let plan = ManpowerPlan::new("org", "grp", may()).with_requirement(
            DailyRequirement::new(d(1))
                .with_shift("d", u32::MAX)
                .with_shift("n", 1),
        );
        let input = input(3).with_manpower(plan);
        let result = ScheduleGenerator::new().generate_seeded(&input, 4, &clock());

        assert!(!result.is_failed());
        // BTreeMap order: "d" is staffed first and takes every open worker.
        assert!(result.assignments.iter().all(|a| a.shift_on(1) == Some("d")));
    }

    #[test]
    fn test_off_cap_respected() {
        // Everyone would prefer OFF, but 2 of 3 are needed
        let plan = ManpowerPlan::new("org", "grp", may())
            .with_requirement(DailyRequirement::new(d(2)).with_shift("d", 2));
        let mut input = input(3).with_manpower(plan);
        for w in 1..=3 {
            input = input.with_request(
                Request::preference(format!("p{w}"), format!("w{w}"), d(2), "off").approved(),
            );
        }
        for seed in 0..10 {
            let result = ScheduleGenerator::new().generate_seeded(&input, seed, &clock());
            let off = result
                .assignments
                .iter()
                .filter(|a| a.shift_on(2) == Some("off"))
                .count();
            assert_eq!(off, 1);
        }
    }

    #[test]
    fn test_preferences_honoured_when_free() {
        let input = input(2)
            .with_request(Request::preference("p1", "w1", d(5), "n").approved())
            .with_request(Request::preference("p2", "w2", d(5), "e").approved());
        let result = ScheduleGenerator::new().generate_seeded(&input, 9, &clock());
        assert_eq!(result.assignments[0].shift_on(5), Some("n"));
        assert_eq!(result.assignments[1].shift_on(5), Some("e"));
    }

    #[test]
    fn test_only_off_shift_in_catalogue() {
        let input = GenerationInput::new("org", "grp", may())
            .with_workers(workers(2))
            .with_shift(ShiftType::off("off"))
            .with_manpower(
                ManpowerPlan::new("org", "grp", may())
                    .with_requirement(DailyRequirement::new(d(1)).with_shift("ghost", 2)),
            );
        let result = ScheduleGenerator::new().generate_seeded(&input, 1, &clock());
        assert!(result
            .assignments
            .iter()
            .all(|a| a.shifts.values().all(|s| s == "off")));
    }

    #[test]
    fn test_violations_scored() {
        let input = input(3)
            .with_rule_config(
                SchedulingRuleConfig::for_rule(MaxConsecutiveWorkDays::ID, "Max days")
                    .with_param("maxDays", 0)
                    .with_penalty(-10),
            )
            .with_rule_config(
                SchedulingRuleConfig::for_rule(NightShiftFollowup::ID, "Night")
                    .with_penalty(-3)
                    .enabled(false),
            );
        let result = ScheduleGenerator::new().generate_seeded(&input, 5, &clock());

        // maxDays = 0: every worker with any working day violates once
        let expected: i32 = result
            .assignments
            .iter()
            .filter(|a| a.shifts.values().any(|s| s != "off"))
            .count() as i32
            * -10;
        assert_eq!(result.schedule.total_score, expected);
        assert_eq!(result.schedule.violated_rules.len(), result.violations.len());
        assert!(result.violations.iter().all(|v| v.rule_id == MaxConsecutiveWorkDays::ID));
    }

    #[test]
    fn test_same_seed_same_output() {
        let plan = ManpowerPlan::new("org", "grp", may())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("d", 2))
            .with_requirement(DailyRequirement::new(d(2)).with_shift("n", 1));
        let input = input(6)
            .with_manpower(plan)
            .with_rule_config(
                SchedulingRuleConfig::for_rule(MaxConsecutiveWorkDays::ID, "Max days")
                    .with_penalty(-5),
            );
        let clock = clock();
        let a = ScheduleGenerator::new().generate_seeded(&input, 77, &clock);
        let b = ScheduleGenerator::new().generate_seeded(&input, 77, &clock);

        assert_eq!(
            serde_json::to_string(&a.schedule).unwrap(),
            serde_json::to_string(&b.schedule).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.assignments).unwrap(),
            serde_json::to_string(&b.assignments).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let clock = clock();
        let a = ScheduleGenerator::new().generate_seeded(&input(4), 1, &clock);
        let b = ScheduleGenerator::new().generate_seeded(&input(4), 2, &clock);
        assert_ne!(a.schedule.id, b.schedule.id);
    }

    #[test]
    fn test_no_workers() {
        let result = ScheduleGenerator::new().generate_seeded(&input(0), 1, &clock());
        assert!(!result.is_failed());
        assert!(result.assignments.is_empty());
        assert_eq!(result.schedule.total_score, 0);
    }

    #[test]
    fn test_generated_at_from_clock() {
        let clock = clock();
        let result = ScheduleGenerator::new().generate_seeded(&input(1), 1, &clock);
        assert_eq!(result.schedule.generated_at, clock.now());
    }
}
