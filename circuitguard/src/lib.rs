//! CircuitGuard - NF C 15-100 residential wiring compliance and dimensioning
//!
//! This library checks a room-by-room equipment inventory against the
//! minimum-equipment rules of the French NF C 15-100 standard, reports the
//! missing equipment per room, and derives the electrical bill of
//! materials: circuit breakers, surge protection, panel size and cable runs.
//!
//! # Quick Start
//!
//! ```no_run
//! use circuitguard::prelude::*;
//!
//! # async fn run() -> Result<(), CircuitGuardError> {
//! let request = InstallationRequest::new(
//!     "flat-42",
//!     vec![Room::new("bedroom-1", RoomType::Bedroom)
//!         .with_area(12.0)
//!         .with_equipment(EquipmentItem::new(EquipmentKind::SimpleSocket, 2))],
//! )
//! .with_postal_code("13001");
//!
//! let guard = CircuitGuard::new(EngineConfig::default());
//! let report = guard.validate_with_dimensioning(&request).await?;
//!
//! for room in &report.compliance.room_results {
//!     println!("{}: {:?} {:?}", room.room_id, room.compliance_status, room.missing_equipment);
//! }
//! println!("{} breakers", report.dimensioning.breaker_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Compliance**: built-in rule set or a remote rule matcher, bounded by a timeout
//! - **Deficits**: "N missing items" per room, from structured or textual violations
//! - **Dimensioning**: lighting, socket, kitchen, heating, water heater and ventilation circuits
//! - **Panel & cables**: module count with 20% reserve, surge protection, cable runs

pub mod classifier;
pub mod compliance;
pub mod core;
pub mod dimensioning;
pub mod model;
pub mod rules;

// Re-export main types
pub use crate::core::{validate_request, CircuitGuard, CircuitGuardError, EngineConfig, InstallationRequest};
pub use classifier::{parent_of, EquipmentCategory, EquipmentCounts};
pub use dimensioning::Dimensioner;
pub use model::{
    CableSpec, CircuitBreakerSpec, CircuitKind, ComplianceReport, ComplianceStatus,
    DimensioningReport, DimensioningResult, ElectricalPanelSpec, EquipmentItem, EquipmentKind,
    Room, RoomType, RuleViolation, Severity, SurgeProtectorSpec,
};
pub use rules::{HttpRuleMatcher, MatchOutcome, MatcherError, RuleMatcher, RuleScope, RulesEngine};

/// Load an installation request from a JSON file (convenience wrapper).
pub fn load_request(path: &std::path::Path) -> Result<InstallationRequest, CircuitGuardError> {
    InstallationRequest::from_file(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CircuitGuard, CircuitGuardError, ComplianceReport, ComplianceStatus, DimensioningReport,
        EngineConfig, EquipmentItem, EquipmentKind, InstallationRequest, Room, RoomType,
        RuleViolation, Severity,
    };
}
