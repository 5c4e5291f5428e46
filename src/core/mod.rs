//! Core data types for power plant reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Record`]: One normalized plant row with canonical and raw fields
//! - [`Outcome`]: One assignment slot produced by a matcher
//! - [`ReconciliationEntry`]: A row of the reconciliation table used for metrics
//! - [`MatchStatus`], [`MatchType`]: Result classification types
//!
//! ## Identity
//!
//! Records carry no identifier of their own. Within a reconciliation call a
//! record is referred to by its position in its collection, and outcomes
//! keep those positions (`index_a`, `index_b`) so callers can look up the
//! remaining attributes afterwards.
//!
//! [`Record`]: record::Record
//! [`Outcome`]: outcome::Outcome
//! [`ReconciliationEntry`]: outcome::ReconciliationEntry
//! [`MatchStatus`]: types::MatchStatus
//! [`MatchType`]: types::MatchType

pub mod outcome;
pub mod record;
pub mod types;
