//! Scheduler lease fields carried on a group record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a group within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKey {
    pub organization_id: String,
    pub group_id: String,
}

impl GroupKey {
    pub fn new(organization_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            group_id: group_id.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization_id, self.group_id)
    }
}

/// Lease fields as stored on the group. All absent = unclaimed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseState {
    #[serde(default)]
    pub scheduler_id: Option<String>,
    #[serde(default)]
    pub scheduler_name: Option<String>,
    #[serde(default)]
    pub lease_expires_at: Option<DateTime<Utc>>,
}

impl LeaseState {
    /// No holder.
    pub fn unclaimed() -> Self {
        Self::default()
    }

    /// Held by `holder_id` until `expires_at`.
    pub fn held(
        holder_id: impl Into<String>,
        holder_name: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            scheduler_id: Some(holder_id.into()),
            scheduler_name: Some(holder_name.into()),
            lease_expires_at: Some(expires_at),
        }
    }

    /// Active iff an expiry exists and is strictly after `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.lease_expires_at.is_some_and(|exp| exp > now)
    }

    /// Whether `user_id` holds an active lease at `now`.
    pub fn is_held_by(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        self.is_active(now) && self.scheduler_id.as_deref() == Some(user_id)
    }
}
