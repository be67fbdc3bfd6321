//! Staffing metrics for a generated roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Required | Sum of all planned headcounts in the month |
//! | Total Filled | Sum of min(assigned, required) per (day, shift) |
//! | Shortfall | Required minus filled, per day and in total |
//! | Fulfillment Rate | Filled / required (1.0 without a plan) |
//! | Preference Hit Rate | Approved preferences that landed as requested |
//! | Off Days | OFF days per worker |
//!
//! Overstaffing is not counted as fulfillment.

use std::collections::BTreeMap;

use super::GenerationInput;
use crate::models::Assignment;

/// Staffing indicators of one roster.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffingKpi {
    /// Sum of planned headcounts.
    pub total_required: u32,
    /// Planned slots actually staffed.
    pub total_filled: u32,
    /// `total_required - total_filled`.
    pub total_shortfall: u32,
    /// Day of month → missing headcount. Only understaffed days appear.
    pub shortfall_by_day: BTreeMap<u32, u32>,
    /// Understaffed days in ascending order.
    pub understaffed_days: Vec<u32>,
    /// Fraction of planned slots staffed (0.0..1.0).
    pub fulfillment_rate: f64,
    /// Fraction of approved preferences honoured (0.0..1.0).
    pub preference_hit_rate: f64,
    /// Worker id → number of OFF days.
    pub off_days_by_worker: BTreeMap<String, usize>,
}

impl StaffingKpi {
    /// Computes KPIs from an input and the assignments generated for it.
    pub fn calculate(input: &GenerationInput, assignments: &[Assignment]) -> Self {
        let mut total_required = 0u32;
        let mut total_filled = 0u32;
        let mut shortfall_by_day = BTreeMap::new();

        if let Some(plan) = &input.manpower {
            for requirement in &plan.daily_requirements {
                let Some(day) = input.month.day_of(requirement.date) else {
                    continue;
                };
                let mut missing = 0u32;
                for (shift_id, &required) in &requirement.requirements {
                    let assigned = assignments
                        .iter()
                        .filter(|a| a.shift_on(day) == Some(shift_id.as_str()))
                        .count() as u32;
                    let filled = assigned.min(required);
                    total_required = total_required.saturating_add(required);
                    total_filled = total_filled.saturating_add(filled);
                    missing = missing.saturating_add(required - filled);
                }
                if missing > 0 {
                    let entry = shortfall_by_day.entry(day).or_insert(0u32);
                    *entry = entry.saturating_add(missing);
                }
            }
        }

        let mut preferences = 0usize;
        let mut hits = 0usize;
        for request in &input.requests {
            let Some(shift_id) = request.approved_preference() else {
                continue;
            };
            let Some(day) = input.month.day_of(request.date) else {
                continue;
            };
            preferences += 1;
            let honoured = assignments
                .iter()
                .find(|a| a.worker_id == request.worker_id)
                .and_then(|a| a.shift_on(day))
                == Some(shift_id);
            if honoured {
                hits += 1;
            }
        }

        let off_id = input.shifts.off_shift().map(|s| s.id.as_str());
        let off_days_by_worker = assignments
            .iter()
            .map(|a| {
                let off = off_id.map(|id| a.count_of(id)).unwrap_or(0);
                (a.worker_id.clone(), off)
            })
            .collect();

        let fulfillment_rate = if total_required == 0 {
            1.0
        } else {
            total_filled as f64 / total_required as f64
        };
        let preference_hit_rate = if preferences == 0 {
            1.0
        } else {
            hits as f64 / preferences as f64
        };

        Self {
            total_required,
            total_filled,
            total_shortfall: total_required.saturating_sub(total_filled),
            understaffed_days: shortfall_by_day.keys().copied().collect(),
            shortfall_by_day,
            fulfillment_rate,
            preference_hit_rate,
            off_days_by_worker,
        }
    }

    /// Whether the roster meets the given staffing thresholds.
    pub fn meets_thresholds(&self, max_shortfall: u32, min_fulfillment: f64) -> bool {
        self.total_shortfall <= max_shortfall && self.fulfillment_rate >= min_fulfillment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRequirement, ManpowerPlan, Request, ShiftType, Worker, YearMonth};
    use chrono::NaiveDate;

    fn june() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn input() -> GenerationInput {
        GenerationInput::new("org", "grp", june())
            .with_worker(Worker::new("w1"))
            .with_worker(Worker::new("w2"))
            .with_shift(ShiftType::new("d", "Day Shift", "D"))
            .with_shift(ShiftType::off("off"))
    }

    #[test]
    fn test_kpi_shortfall() {
        let plan = ManpowerPlan::new("org", "grp", june())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("d", 2))
            .with_requirement(DailyRequirement::new(d(2)).with_shift("d", 1));
        let input = input().with_manpower(plan);
        let assignments = vec![
            Assignment::new("a1", "s", "w1").with_shift(1, "d").with_shift(2, "d"),
            Assignment::new("a2", "s", "w2").with_shift(1, "off").with_shift(2, "d"),
        ];

        let kpi = StaffingKpi::calculate(&input, &assignments);
        assert_eq!(kpi.total_required, 3);
        // Day 2 is overstaffed; the extra worker does not count.
        assert_eq!(kpi.total_filled, 2);
        assert_eq!(kpi.total_shortfall, 1);
        assert_eq!(kpi.shortfall_by_day.get(&1), Some(&1));
        assert_eq!(kpi.understaffed_days, vec![1]);
        assert!((kpi.fulfillment_rate - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.off_days_by_worker["w2"], 1);
        assert_eq!(kpi.off_days_by_worker["w1"], 0);
    }

    #[test]
    fn test_kpi_no_plan() {
        let kpi = StaffingKpi::calculate(&input(), &[]);
        assert_eq!(kpi.total_required, 0);
        assert!((kpi.fulfillment_rate - 1.0).abs() < 1e-10);
        assert!((kpi.preference_hit_rate - 1.0).abs() < 1e-10);
        assert!(kpi.understaffed_days.is_empty());
    }

    #[test]
    fn test_kpi_preference_hits() {
        let input = input()
            .with_request(Request::preference("r1", "w1", d(3), "d").approved())
            .with_request(Request::preference("r2", "w2", d(3), "d").approved())
            .with_request(Request::preference("r3", "w2", d(4), "d"));
        let assignments = vec![
            Assignment::new("a1", "s", "w1").with_shift(3, "d"),
            Assignment::new("a2", "s", "w2").with_shift(3, "off"),
        ];

        let kpi = StaffingKpi::calculate(&input, &assignments);
        assert!((kpi.preference_hit_rate - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_huge_targets_saturate() {
        let plan = ManpowerPlan::new("org", "grp", june())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("d", u32::MAX))
            .with_requirement(DailyRequirement::new(d(2)).with_shift("d", 5));
        let input = input().with_manpower(plan);
        let assignments = vec![Assignment::new("a1", "s", "w1").with_shift(1, "d")];

        let kpi = StaffingKpi::calculate(&input, &assignments);
        assert_eq!(kpi.total_required, u32::MAX);
        assert_eq!(kpi.total_filled, 1);
        assert_eq!(kpi.total_shortfall, u32::MAX - 1);
        assert_eq!(kpi.understaffed_days, vec![1, 2]);
    }

    #[test]
    fn test_meets_thresholds() {
        let plan = ManpowerPlan::new("org", "grp", june())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("d", 2));
        let input = input().with_manpower(plan);
        let assignments = vec![Assignment::new("a1", "s", "w1").with_shift(1, "d")];

        let kpi = StaffingKpi::calculate(&input, &assignments);
        assert!(kpi.meets_thresholds(1, 0.5));
        assert!(!kpi.meets_thresholds(0, 0.0));
        assert!(!kpi.meets_thresholds(1, 0.6));
    }
}
