//! Monthly shift rostering.
//!
//! Generates a month of per-worker shift assignments for a group, scores the
//! result against configurable constraint rules, and guards generation and
//! editing behind a per-group scheduler lease.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Worker`, `ShiftType`, `Request`,
//!   `SchedulingRuleConfig`, `ManpowerPlan`, `Schedule`, `Assignment`,
//!   `LeaseState`
//! - **`rules`**: `Rule` trait, built-in rules, `RuleCatalogue`, `RuleEngine`
//! - **`generator`**: Greedy `ScheduleGenerator`, manual edits, `StaffingKpi`
//! - **`validation`**: Input integrity checks (duplicate IDs, OFF shift, references)
//! - **`lease`**: Compare-and-swap lease protocol and an in-memory store
//! - **`store`**: Persistence contract and an in-memory implementation
//! - **`service`**: `RosterService`, the lease-guarded workflow
//! - **`clock`**, **`config`**, **`error`**: Time source, TOML settings, error types
//!
//! # Determinism
//!
//! Randomness and time are explicit inputs. A seeded `Rng` plus a fixed
//! [`Clock`](clock::Clock) reproduce a schedule exactly, identifiers included.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod lease;
pub mod models;
pub mod rules;
pub mod service;
pub mod store;
pub mod validation;
