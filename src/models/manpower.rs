//! Manpower plan model.
//!
//! Daily staffing targets per shift type for one (organization, group,
//! month). Optional input to generation: without a plan every day is filled
//! purely from preferences.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::YearMonth;

/// Staffing targets for one group and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManpowerPlan {
    pub organization_id: String,
    pub group_id: String,
    pub month: YearMonth,
    /// One entry per planned day. Days without an entry have no target.
    pub daily_requirements: Vec<DailyRequirement>,
}

/// Required headcount per shift type on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRequirement {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
    /// Shift type id → required headcount. Ordered so selection is reproducible.
    #[serde(default)]
    pub requirements: BTreeMap<String, u32>,
}

impl ManpowerPlan {
    /// Creates an empty plan.
    pub fn new(
        organization_id: impl Into<String>,
        group_id: impl Into<String>,
        month: YearMonth,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            group_id: group_id.into(),
            month,
            daily_requirements: Vec::new(),
        }
    }

    /// Document key: `{org}_{group}_{YYYY-MM}`.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.organization_id, self.group_id, self.month)
    }

    /// Adds a day's requirement.
    pub fn with_requirement(mut self, requirement: DailyRequirement) -> Self {
        self.daily_requirements.push(requirement);
        self
    }

    /// The requirement for `date`, if planned.
    pub fn requirement_for(&self, date: NaiveDate) -> Option<&DailyRequirement> {
        self.daily_requirements.iter().find(|r| r.date == date)
    }

    /// Total required headcount on `date` (0 if unplanned).
    pub fn total_required(&self, date: NaiveDate) -> u32 {
        self.requirement_for(date)
            .map(DailyRequirement::total_required)
            .unwrap_or(0)
    }
}

impl DailyRequirement {
    /// Creates a requirement with no targets.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_holiday: false,
            holiday_name: None,
            requirements: BTreeMap::new(),
        }
    }

    /// Sets the headcount for one shift type.
    pub fn with_shift(mut self, shift_type_id: impl Into<String>, count: u32) -> Self {
        self.requirements.insert(shift_type_id.into(), count);
        self
    }

    /// Marks the day as a holiday.
    pub fn holiday(mut self, name: impl Into<String>) -> Self {
        self.is_holiday = true;
        self.holiday_name = Some(name.into());
        self
    }

    /// Sum of headcounts across all shift types, saturating at `u32::MAX`.
    pub fn total_required(&self) -> u32 {
        self.requirements
            .values()
            .fold(0u32, |total, &n| total.saturating_add(n))
    }

    /// Required headcount for one shift type.
    pub fn required(&self, shift_type_id: &str) -> u32 {
        self.requirements.get(shift_type_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn plan() -> ManpowerPlan {
        ManpowerPlan::new("org", "grp", YearMonth::new(2024, 5).unwrap())
            .with_requirement(DailyRequirement::new(d(1)).with_shift("d", 2).with_shift("n", 1))
            .with_requirement(DailyRequirement::new(d(2)).with_shift("d", 1).holiday("Labour Day"))
    }

    #[test]
    fn test_totals() {
        let p = plan();
        assert_eq!(p.total_required(d(1)), 3);
        assert_eq!(p.total_required(d(2)), 1);
        assert_eq!(p.total_required(d(3)), 0);
        assert_eq!(p.requirement_for(d(1)).unwrap().required("n"), 1);
        assert_eq!(p.requirement_for(d(1)).unwrap().required("x"), 0);
    }

    #[test]
    fn test_totals_saturate() {
        let req = DailyRequirement::new(d(1))
            .with_shift("d", u32::MAX)
            .with_shift("n", 1);
        assert_eq!(req.total_required(), u32::MAX);
    }

    #[test]
    fn test_key() {
        assert_eq!(plan().key(), "org_grp_2024-05");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(plan()).unwrap();
        assert_eq!(json["month"], "2024-05");
        assert_eq!(json["dailyRequirements"][1]["isHoliday"], true);
        assert_eq!(json["dailyRequirements"][1]["holidayName"], "Labour Day");
        assert_eq!(json["dailyRequirements"][0]["requirements"]["d"], 2);
    }
}
