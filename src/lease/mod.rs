//! Scheduler lease: an expiry-based advisory lock per group.
//!
//! At most one user may generate or edit a group's schedule at a time. The
//! holder and expiry live on the group record; every transition is a
//! read-decide-write against that record, committed with a versioned
//! compare-and-swap.
//!
//! # States
//!
//! | State | Fields |
//! |-------|--------|
//! | Unclaimed | no holder, or expiry `<=` now |
//! | Held | holder set, expiry `>` now |
//!
//! Expired leases need no sweeper: the next claim simply overwrites them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Duration;
//! use u_roster::clock::SystemClock;
//! use u_roster::lease::{InMemoryLeaseStore, SchedulerLease};
//! use u_roster::models::GroupKey;
//!
//! let key = GroupKey::new("org", "ward-a");
//! let store = InMemoryLeaseStore::new();
//! store.register_group(key.clone());
//!
//! let lease = SchedulerLease::new(store, Arc::new(SystemClock));
//! let first = lease.claim(&key, "u1", "Ann", Duration::minutes(30)).unwrap();
//! let second = lease.claim(&key, "u2", "Bob", Duration::minutes(30)).unwrap();
//! assert!(first.is_granted());
//! assert!(!second.is_granted());
//! ```

mod protocol;
mod store;

pub use protocol::{LeaseGrant, LeaseOutcome, SchedulerLease};
pub use store::{InMemoryLeaseStore, LeaseStore, Versioned};
