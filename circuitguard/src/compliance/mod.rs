//! Compliance Module
//!
//! Runs the rule matcher, groups its violations by room, derives statuses
//! and extracts missing-equipment deficits.

pub mod aggregator;
pub mod checker;
pub mod deficit;

pub use aggregator::{aggregate, aggregate_failure, assign_room, split_violations};
pub use checker::ComplianceChecker;
pub use deficit::{deficit_for, extract_missing_equipment, lookup_category};
