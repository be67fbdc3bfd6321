//! Generation input container.

use serde::{Deserialize, Serialize};

use crate::models::{
    GroupKey, ManpowerPlan, Request, SchedulingRuleConfig, ShiftCatalogue, ShiftType, Worker,
    YearMonth,
};

/// Everything one generation run reads, already fetched into memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub organization_id: String,
    pub group_id: String,
    pub month: YearMonth,
    /// Workers to roster. Assignment order follows this list.
    pub workers: Vec<Worker>,
    /// Shift types available to the organization.
    pub shifts: ShiftCatalogue,
    /// All requests for the month; only approved ones are used.
    #[serde(default)]
    pub requests: Vec<Request>,
    /// Rule configs; only enabled ones are evaluated.
    #[serde(default)]
    pub rule_configs: Vec<SchedulingRuleConfig>,
    /// Optional daily staffing targets.
    #[serde(default)]
    pub manpower: Option<ManpowerPlan>,
}

impl GenerationInput {
    /// Creates an empty input for a group and month.
    pub fn new(
        organization_id: impl Into<String>,
        group_id: impl Into<String>,
        month: YearMonth,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            group_id: group_id.into(),
            month,
            workers: Vec::new(),
            shifts: ShiftCatalogue::default(),
            requests: Vec::new(),
            rule_configs: Vec::new(),
            manpower: None,
        }
    }

    /// The group this input belongs to.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.organization_id, &self.group_id)
    }

    /// Sets the workers.
    pub fn with_workers(mut self, workers: Vec<Worker>) -> Self {
        self.workers = workers;
        self
    }

    /// Adds a worker.
    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    /// Sets the shift catalogue.
    pub fn with_shifts(mut self, shifts: ShiftCatalogue) -> Self {
        self.shifts = shifts;
        self
    }

    /// Adds a shift type.
    pub fn with_shift(mut self, shift: ShiftType) -> Self {
        self.shifts = self.shifts.with_shift(shift);
        self
    }

    /// Sets the requests.
    pub fn with_requests(mut self, requests: Vec<Request>) -> Self {
        self.requests = requests;
        self
    }

    /// Adds a request.
    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Sets the rule configs.
    pub fn with_rule_configs(mut self, configs: Vec<SchedulingRuleConfig>) -> Self {
        self.rule_configs = configs;
        self
    }

    /// Adds a rule config.
    pub fn with_rule_config(mut self, config: SchedulingRuleConfig) -> Self {
        self.rule_configs.push(config);
        self
    }

    /// Sets the manpower plan.
    pub fn with_manpower(mut self, plan: ManpowerPlan) -> Self {
        self.manpower = Some(plan);
        self
    }

    /// Index of a worker by id.
    pub fn worker_index(&self, worker_id: &str) -> Option<usize> {
        self.workers.iter().position(|w| w.id == worker_id)
    }

    /// Rule configs that are enabled.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &SchedulingRuleConfig> {
        self.rule_configs.iter().filter(|c| c.is_enabled)
    }
}
