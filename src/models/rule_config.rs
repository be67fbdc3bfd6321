//! Scheduling rule configuration records.
//!
//! A config activates one built-in rule with parameters and a penalty.
//! Configs are data; the implementations live in [`crate::rules`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed rule parameters (e.g. `maxDays`, `minHours`).
pub type RuleParams = BTreeMap<String, Value>;

/// A named, parameterized rule activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingRuleConfig {
    /// Unique config identifier.
    #[serde(default)]
    pub id: String,
    /// Stable rule identifier (e.g. `max_consecutive_work_days`).
    /// Older records carry only `rule_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Human-readable rule name.
    pub rule_name: String,
    /// Hard or soft. Informational; both apply the same penalty mechanism.
    #[serde(default)]
    pub rule_type: RuleType,
    /// Penalty added to the schedule score per violation (non-positive).
    #[serde(default)]
    pub penalty_score: i32,
    /// Disabled configs are never evaluated.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    /// Rule parameters.
    #[serde(default)]
    pub parameters: RuleParams,
}

fn default_enabled() -> bool {
    true
}

/// Rule strictness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Hard,
    #[default]
    Soft,
}

impl SchedulingRuleConfig {
    /// Creates an enabled soft config with no penalty and no parameters.
    pub fn new(rule_name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            rule_id: None,
            rule_name: rule_name.into(),
            rule_type: RuleType::Soft,
            penalty_score: 0,
            is_enabled: true,
            parameters: RuleParams::new(),
        }
    }

    /// Creates a config bound to a stable rule identifier.
    pub fn for_rule(rule_id: impl Into<String>, rule_name: impl Into<String>) -> Self {
        let mut config = Self::new(rule_name);
        config.rule_id = Some(rule_id.into());
        config
    }

    /// Sets the config id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the rule type.
    pub fn with_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = rule_type;
        self
    }

    /// Sets the penalty score.
    pub fn with_penalty(mut self, penalty_score: i32) -> Self {
        self.penalty_score = penalty_score;
        self
    }

    /// Sets a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Sets the enabled flag.
    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}
