//! Lease-guarded roster workflow.
//!
//! Ties the lease protocol, the persistence contract and the generator
//! together: only the active lease holder of a group may generate or edit
//! its schedule, and every result is persisted as one batch.

use std::sync::Arc;

use chrono::Duration;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::RosterConfig;
use crate::error::{LeaseError, ServiceError};
use crate::generator::{GenerationResult, ScheduleGenerator, ShiftEdit};
use crate::lease::{LeaseOutcome, LeaseStore, SchedulerLease};
use crate::models::{Assignment, GroupKey, Schedule, Violation, YearMonth};
use crate::store::{RosterSource, ScheduleSink};

/// Generation and editing behind the scheduler lease.
pub struct RosterService<R, L> {
    roster: R,
    lease: SchedulerLease<L>,
    generator: ScheduleGenerator,
    clock: Arc<dyn Clock>,
    config: RosterConfig,
}

impl<R, L> std::fmt::Debug for RosterService<R, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterService")
            .field("lease", &self.lease)
            .field("generator", &self.generator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R, L> RosterService<R, L>
where
    R: RosterSource + ScheduleSink,
    L: LeaseStore,
{
    /// Creates a service with the built-in rules.
    pub fn new(roster: R, lease_store: L, clock: Arc<dyn Clock>, config: RosterConfig) -> Self {
        Self {
            roster,
            lease: SchedulerLease::new(lease_store, Arc::clone(&clock))
                .with_config(config.lease.clone()),
            generator: ScheduleGenerator::new().with_config(config.generator.clone()),
            clock,
            config,
        }
    }

    /// Replaces the generator, e.g. to register custom rules.
    pub fn with_generator(mut self, generator: ScheduleGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    pub fn lease(&self) -> &SchedulerLease<L> {
        &self.lease
    }

    /// Claims the group's lease for the configured duration.
    pub fn claim(
        &self,
        key: &GroupKey,
        user_id: &str,
        user_name: &str,
    ) -> Result<LeaseOutcome, ServiceError> {
        let duration = self.lease_duration()?;
        Ok(self.lease.claim(key, user_id, user_name, duration)?)
    }

    /// Renews the caller's lease for the configured duration.
    pub fn renew(&self, key: &GroupKey, user_id: &str) -> Result<LeaseOutcome, ServiceError> {
        let duration = self.lease_duration()?;
        Ok(self.lease.renew(key, user_id, duration)?)
    }

    pub fn release(&self, key: &GroupKey) -> Result<(), ServiceError> {
        Ok(self.lease.release(key)?)
    }

    /// Generates a draft for the group and month and persists it.
    ///
    /// Uses the configured seed when set; the seed fixes the shifts, while
    /// schedule and assignment ids are still fresh on every run. A failed
    /// result (missing OFF shift) is returned but not persisted.
    pub fn generate(
        &self,
        key: &GroupKey,
        month: YearMonth,
        user_id: &str,
    ) -> Result<GenerationResult, ServiceError> {
        self.require_lease(key, user_id)?;
        let input = self.roster.load_input(key, month)?;

        let result = match self.config.generator.seed {
            Some(seed) => {
                let mut result = self
                    .generator
                    .generate_seeded(&input, seed, self.clock.as_ref());
                result.reassign_ids(&mut rand::rng());
                result
            }
            None => {
                let mut rng = ChaCha8Rng::from_rng(&mut rand::rng());
                self.generator
                    .generate(&input, &mut rng, self.clock.as_ref())
            }
        };

        if result.is_failed() {
            warn!(group = %key, month = %month, "generation failed, nothing persisted");
            return Ok(result);
        }
        self.roster
            .save_batch(&result.schedule, &result.assignments)?;
        info!(
            group = %key,
            month = %month,
            schedule_id = %result.schedule.id,
            user = %user_id,
            "schedule persisted"
        );
        Ok(result)
    }

    /// Applies one edit to a schedule of the group, revalidates and persists.
    ///
    /// `schedule` and `assignments` are updated only after the batch is
    /// saved; on any error they are left as they were.
    pub fn edit(
        &self,
        user_id: &str,
        schedule: &mut Schedule,
        assignments: &mut [Assignment],
        edit: &ShiftEdit,
    ) -> Result<Vec<Violation>, ServiceError> {
        let key = GroupKey::new(&schedule.organization_id, &schedule.group_id);
        self.require_lease(&key, user_id)?;
        let input = self.roster.load_input(&key, schedule.month)?;

        let mut edited_schedule = schedule.clone();
        let mut edited = assignments.to_vec();
        let violations = self
            .generator
            .apply_edit(&input, &mut edited_schedule, &mut edited, edit)?;
        self.roster.save_batch(&edited_schedule, &edited)?;
        *schedule = edited_schedule;
        assignments.clone_from_slice(&edited);
        info!(
            group = %key,
            schedule_id = %schedule.id,
            user = %user_id,
            score = schedule.total_score,
            "schedule edited"
        );
        Ok(violations)
    }

    fn lease_duration(&self) -> Result<Duration, LeaseError> {
        let secs = self.config.lease.duration_secs;
        self.config
            .lease
            .duration()
            .ok_or(LeaseError::InvalidDuration(secs))
    }

    fn require_lease(&self, key: &GroupKey, user_id: &str) -> Result<(), ServiceError> {
        if self.lease.is_held_by(key, user_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotLeaseHolder {
                user_id: user_id.to_string(),
                group: key.to_string(),
            })
        }
    }
}
