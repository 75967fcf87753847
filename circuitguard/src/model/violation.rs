use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    Safety,
    Installation,
    Circuit,
    Protection,
    Equipment,
    RoomSpecific,
}

/// Equipment categories a deficit can be expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeficitCategory {
    Socket,
    NetworkSocket,
    LightingPoint,
    Switch,
    #[serde(rename = "socket_32a")]
    Socket32A,
}

impl DeficitCategory {
    /// Singular English label ("socket", "32A socket", ...).
    pub fn label(&self) -> &'static str {
        match self {
            DeficitCategory::Socket => "socket",
            DeficitCategory::NetworkSocket => "network socket",
            DeficitCategory::LightingPoint => "lighting point",
            DeficitCategory::Switch => "switch",
            DeficitCategory::Socket32A => "32A socket",
        }
    }

    /// "N label", pluralized when N > 1.
    pub fn describe(&self, count: u32) -> String {
        let label = self.label();
        if count > 1 && !label.ends_with('s') {
            // "switch" takes "es"
            if label.ends_with("ch") {
                format!("{} {}es", count, label)
            } else {
                format!("{} {}s", count, label)
            }
        } else {
            format!("{} {}", count, label)
        }
    }
}

/// Structured minimum-count requirement attached to a violation by matchers
/// that can report one directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquipmentRequirement {
    pub category: DeficitCategory,
    pub required: u32,
    pub current: u32,
}

impl EquipmentRequirement {
    pub fn new(category: DeficitCategory, required: u32, current: u32) -> Self {
        Self {
            category,
            required,
            current,
        }
    }

    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.current)
    }
}

/// A rule violation as produced by a rule matcher. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleViolation {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub violation_type: ViolationType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<EquipmentRequirement>,
}

impl RuleViolation {
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.into(),
            severity,
            violation_type: ViolationType::Installation,
            message: message.into(),
            focus_node: None,
            path: None,
            value: None,
            suggested_fix: None,
            requirement: None,
        }
    }

    pub fn with_type(mut self, violation_type: ViolationType) -> Self {
        self.violation_type = violation_type;
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus_node = Some(focus.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_requirement(mut self, requirement: EquipmentRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Synthetic violation reported when the rule matcher could not run.
    pub fn system_error(detail: &str) -> Self {
        RuleViolation::new(
            "SYSTEM-ERROR",
            Severity::Error,
            format!("Erreur du système de validation : {}", detail),
        )
        .with_type(ViolationType::Safety)
        .with_fix("Vérifiez la disponibilité du moteur de règles et réessayez")
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_pluralizes() {
        assert_eq!(DeficitCategory::Socket.describe(3), "3 sockets");
        assert_eq!(DeficitCategory::Socket.describe(1), "1 socket");
        assert_eq!(DeficitCategory::Switch.describe(2), "2 switches");
        assert_eq!(DeficitCategory::Socket32A.describe(2), "2 32A sockets");
        assert_eq!(DeficitCategory::NetworkSocket.describe(1), "1 network socket");
    }

    #[test]
    fn test_shortfall_never_negative() {
        assert_eq!(EquipmentRequirement::new(DeficitCategory::Socket, 3, 5).shortfall(), 0);
        assert_eq!(EquipmentRequirement::new(DeficitCategory::Socket, 6, 3).shortfall(), 3);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        let v: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(v, Severity::Error);
    }
}
