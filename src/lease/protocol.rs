//! Claim, renew and release transitions.
//!
//! # Algorithm
//!
//! Each transition loads the group's lease fields with their version,
//! decides against a single `now` from the clock, and commits with
//! compare-and-swap. A lost race reloads and decides again, up to
//! `LeaseConfig::max_attempts` times, after which `StoreError::Conflict`
//! is surfaced.
//!
//! Contention (an active lease held by someone else) is an outcome, not an
//! error.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::LeaseStore;
use crate::clock::Clock;
use crate::config::LeaseConfig;
use crate::error::{LeaseError, StoreError};
use crate::models::{GroupKey, LeaseState};

/// A lease held by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseGrant {
    pub holder_id: String,
    pub holder_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a claim or renew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseOutcome {
    /// The caller now holds the lease.
    Granted(LeaseGrant),
    /// Not granted; carries the state that was observed, unchanged.
    Denied(LeaseState),
}

impl LeaseOutcome {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// The grant, if granted.
    pub fn grant(&self) -> Option<&LeaseGrant> {
        match self {
            Self::Granted(grant) => Some(grant),
            Self::Denied(_) => None,
        }
    }
}

/// What a transition decided for the state it read.
enum Step {
    Write(LeaseState),
    Deny,
}

/// The lease protocol over a [`LeaseStore`].
pub struct SchedulerLease<S> {
    store: S,
    clock: Arc<dyn Clock>,
    config: LeaseConfig,
}

impl<S> std::fmt::Debug for SchedulerLease<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerLease")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: LeaseStore> SchedulerLease<S> {
    /// Creates the protocol with default settings.
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            config: LeaseConfig::default(),
        }
    }

    /// Sets duration and retry settings.
    pub fn with_config(mut self, config: LeaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    /// Claims the lease if it is unclaimed or expired.
    pub fn claim(
        &self,
        key: &GroupKey,
        user_id: &str,
        user_name: &str,
        duration: Duration,
    ) -> Result<LeaseOutcome, LeaseError> {
        check_duration(duration)?;
        let outcome = self.transact(key, "claim", |current, now| {
            if current.is_active(now) {
                return Ok(Step::Deny);
            }
            let expires_at = expiry(now, duration)?;
            Ok(Step::Write(LeaseState::held(user_id, user_name, expires_at)))
        })?;
        match &outcome {
            LeaseOutcome::Granted(grant) => info!(
                group = %key,
                holder = %user_id,
                expires_at = %grant.expires_at,
                "lease claimed"
            ),
            LeaseOutcome::Denied(state) => info!(
                group = %key,
                user = %user_id,
                holder = ?state.scheduler_id,
                "lease claim denied"
            ),
        }
        Ok(outcome)
    }

    /// Extends the caller's own active lease to `now + duration`.
    ///
    /// A non-holder is denied. So is the holder once the lease has expired;
    /// it has to be claimed again.
    pub fn renew(
        &self,
        key: &GroupKey,
        user_id: &str,
        duration: Duration,
    ) -> Result<LeaseOutcome, LeaseError> {
        check_duration(duration)?;
        let outcome = self.transact(key, "renew", |current, now| {
            if !current.is_held_by(user_id, now) {
                return Ok(Step::Deny);
            }
            let mut next = current.clone();
            next.lease_expires_at = Some(expiry(now, duration)?);
            Ok(Step::Write(next))
        })?;
        match &outcome {
            LeaseOutcome::Granted(grant) => debug!(
                group = %key,
                holder = %user_id,
                expires_at = %grant.expires_at,
                "lease renewed"
            ),
            LeaseOutcome::Denied(state) => info!(
                group = %key,
                user = %user_id,
                holder = ?state.scheduler_id,
                "lease renew denied"
            ),
        }
        Ok(outcome)
    }

    /// Clears holder and expiry, whatever the current state.
    pub fn release(&self, key: &GroupKey) -> Result<(), LeaseError> {
        self.transact(key, "release", |_, _| Ok(Step::Write(LeaseState::unclaimed())))?;
        info!(group = %key, "lease released");
        Ok(())
    }

    /// The active lease, if any. Expired leases read as `None`.
    pub fn current(&self, key: &GroupKey) -> Result<Option<LeaseState>, LeaseError> {
        let state = self.store.load(key)?.value;
        Ok(state.is_active(self.clock.now()).then_some(state))
    }

    /// Whether `user_id` holds an active lease on the group.
    pub fn is_held_by(&self, key: &GroupKey, user_id: &str) -> Result<bool, LeaseError> {
        let state = self.store.load(key)?.value;
        Ok(state.is_held_by(user_id, self.clock.now()))
    }

    fn transact<F>(
        &self,
        key: &GroupKey,
        op: &'static str,
        decide: F,
    ) -> Result<LeaseOutcome, LeaseError>
    where
        F: Fn(&LeaseState, DateTime<Utc>) -> Result<Step, LeaseError>,
    {
        for attempt in 1..=self.config.max_attempts {
            let current = self.store.load(key)?;
            let now = self.clock.now();
            let next = match decide(&current.value, now)? {
                Step::Deny => return Ok(LeaseOutcome::Denied(current.value)),
                Step::Write(next) => next,
            };
            if self
                .store
                .compare_and_swap(key, current.version, next.clone())?
            {
                return Ok(match (next.scheduler_id, next.lease_expires_at) {
                    (Some(holder_id), Some(expires_at)) => LeaseOutcome::Granted(LeaseGrant {
                        holder_id,
                        holder_name: next.scheduler_name.unwrap_or_default(),
                        expires_at,
                    }),
                    _ => LeaseOutcome::Denied(LeaseState::unclaimed()),
                });
            }
            debug!(group = %key, op, attempt, "lease version conflict");
        }
        warn!(
            group = %key,
            op,
            attempts = self.config.max_attempts,
            "lease transaction gave up"
        );
        Err(StoreError::Conflict(format!("lease on {key}")).into())
    }
}

fn check_duration(duration: Duration) -> Result<(), LeaseError> {
    if duration <= Duration::zero() {
        return Err(LeaseError::InvalidDuration(duration.num_seconds()));
    }
    Ok(())
}

/// `now + duration`, or an error if that is past the representable range.
fn expiry(now: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>, LeaseError> {
    now.checked_add_signed(duration)
        .ok_or(LeaseError::InvalidDuration(duration.num_seconds()))
}
