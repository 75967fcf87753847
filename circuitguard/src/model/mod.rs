//! Installation data model: rooms, equipment, violations and results.

pub mod equipment;
pub mod report;
pub mod room;
pub mod violation;

pub use equipment::{EquipmentItem, EquipmentKind, UnknownEquipmentKind};
pub use report::{
    CableSpec, CircuitBreakerSpec, CircuitKind, ComplianceReport, ComplianceStatus,
    DimensioningReport, DimensioningResult, ElectricalPanelSpec, GlobalComplianceResult,
    RoomComplianceResult, SurgeProtectorSpec,
};
pub use room::{living_area, total_area, Room, RoomType};
pub use violation::{DeficitCategory, EquipmentRequirement, RuleViolation, Severity, ViolationType};
