//! Compliance and dimensioning results returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::room::RoomType;
use super::violation::{RuleViolation, Severity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Warning,
    /// No rule evaluation is available for the room (the matcher did not answer).
    Missing,
}

impl ComplianceStatus {
    /// Status derived from a set of violations: any error makes it
    /// non-compliant, otherwise any warning makes it a warning.
    pub fn from_violations(violations: &[RuleViolation]) -> Self {
        if violations.iter().any(|v| v.severity == Severity::Error) {
            ComplianceStatus::NonCompliant
        } else if violations.iter().any(|v| v.severity == Severity::Warning) {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::Compliant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
            ComplianceStatus::Warning => "warning",
            ComplianceStatus::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomComplianceResult {
    pub room_id: String,
    pub room_type: RoomType,
    pub compliance_status: ComplianceStatus,
    pub violations: Vec<RuleViolation>,
    pub missing_equipment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalComplianceResult {
    pub overall_status: ComplianceStatus,
    pub violations: Vec<RuleViolation>,
    pub missing_equipment_summary: Vec<String>,
}

/// Outcome of the compliance path for one installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub installation_id: String,
    pub global_compliance: GlobalComplianceResult,
    pub room_results: Vec<RoomComplianceResult>,
    pub timestamp: DateTime<Utc>,
    /// Set when the rule matcher failed or timed out; the report then holds
    /// a single synthetic system violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher_error: Option<String>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.global_compliance.overall_status == ComplianceStatus::Compliant
    }

    pub fn matcher_failed(&self) -> bool {
        self.matcher_error.is_some()
    }

    /// All violations, global first then per room.
    pub fn all_violations(&self) -> impl Iterator<Item = &RuleViolation> {
        self.global_compliance
            .violations
            .iter()
            .chain(self.room_results.iter().flat_map(|r| r.violations.iter()))
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.all_violations().filter(|v| v.severity == severity).count()
    }
}

/// What a breaker protects.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CircuitKind {
    Lighting,
    StandardSockets,
    KitchenSockets,
    Specialised,
    CooktopSocket,
    Cooktop,
    Ventilation,
    Heating,
    #[default]
    Dedicated,
    WaterHeater,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitBreakerSpec {
    /// Rating in amperes.
    pub rating: u32,
    #[serde(rename = "type")]
    pub breaker_type: String,
    pub quantity: u32,
    pub description: String,
    #[serde(default)]
    pub circuit: CircuitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurgeProtectorSpec {
    #[serde(rename = "type")]
    pub spd_type: String,
    pub rating: Option<String>,
    pub quantity: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricalPanelSpec {
    #[serde(rename = "type")]
    pub panel_type: String,
    pub modules: u32,
    pub quantity: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CableSpec {
    /// Cross-section in mm² (0 for data and coaxial cables).
    pub section: f64,
    #[serde(rename = "type")]
    pub cable_type: String,
    /// Estimated length in meters.
    pub length_estimate: f64,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensioningResult {
    pub circuit_breakers: Vec<CircuitBreakerSpec>,
    pub surge_protectors: Vec<SurgeProtectorSpec>,
    pub electrical_panels: Vec<ElectricalPanelSpec>,
    pub cables: Vec<CableSpec>,
    pub installation_notes: Vec<String>,
}

impl DimensioningResult {
    pub fn breaker_count(&self) -> u32 {
        self.circuit_breakers.iter().map(|b| b.quantity).sum()
    }

    pub fn surge_protection_required(&self) -> bool {
        self.surge_protectors.iter().any(|s| s.quantity > 0)
    }
}

/// Global validation with dimensioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensioningReport {
    #[serde(flatten)]
    pub compliance: ComplianceReport,
    pub dimensioning: DimensioningResult,
}
