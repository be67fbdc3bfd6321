//! Lease storage contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::models::{GroupKey, LeaseState};

/// A value paired with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Storage of per-group lease fields with optimistic concurrency.
///
/// Every successful write bumps the version. Implementations backed by a
/// transactional store can map `compare_and_swap` onto a conditional update.
pub trait LeaseStore: Send + Sync {
    /// Reads the lease fields of a group and their current version.
    fn load(&self, key: &GroupKey) -> Result<Versioned<LeaseState>, StoreError>;

    /// Writes `next` only if the stored version still equals
    /// `expected_version`. Returns `Ok(false)` on a version mismatch.
    fn compare_and_swap(
        &self,
        key: &GroupKey,
        expected_version: u64,
        next: LeaseState,
    ) -> Result<bool, StoreError>;
}

impl<S: LeaseStore + ?Sized> LeaseStore for Arc<S> {
    fn load(&self, key: &GroupKey) -> Result<Versioned<LeaseState>, StoreError> {
        (**self).load(key)
    }

    fn compare_and_swap(
        &self,
        key: &GroupKey,
        expected_version: u64,
        next: LeaseState,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_swap(key, expected_version, next)
    }
}

/// Process-local lease store.
///
/// Groups must be registered before use; unknown groups are `NotFound`,
/// like a missing group document.
#[derive(Debug, Default)]
pub struct InMemoryLeaseStore {
    groups: Mutex<HashMap<GroupKey, Versioned<LeaseState>>>,
}

impl InMemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unclaimed group. Existing groups are left untouched.
    pub fn register_group(&self, key: GroupKey) {
        if let Ok(mut groups) = self.lock() {
            groups.entry(key).or_insert(Versioned {
                version: 0,
                value: LeaseState::unclaimed(),
            });
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GroupKey, Versioned<LeaseState>>>, StoreError> {
        self.groups
            .lock()
            .map_err(|_| StoreError::Unavailable("lease store lock poisoned".into()))
    }
}

impl LeaseStore for InMemoryLeaseStore {
    fn load(&self, key: &GroupKey) -> Result<Versioned<LeaseState>, StoreError> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("group {key}")))
    }

    fn compare_and_swap(
        &self,
        key: &GroupKey,
        expected_version: u64,
        next: LeaseState,
    ) -> Result<bool, StoreError> {
        let mut groups = self.lock()?;
        let entry = groups
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(format!("group {key}")))?;
        if entry.version != expected_version {
            return Ok(false);
        }
        entry.version += 1;
        entry.value = next;
        Ok(true)
    }
}
