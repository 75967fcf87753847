//! Core validation logic shared by the library API and the CLI.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceChecker;
use crate::dimensioning::{Dimensioner, DEFAULT_BREAKER_TYPE};
use crate::model::{ComplianceReport, DimensioningReport, Room};
use crate::rules::{HttpRuleMatcher, RuleMatcher, RuleScope, RulesEngine};

#[derive(Debug, thiserror::Error)]
pub enum CircuitGuardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine settings. Constructed explicitly and handed to [`CircuitGuard`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matcher_timeout_secs: u64,
    pub max_rooms: usize,
    pub max_equipment_per_room: usize,
    /// Largest quantity accepted on a single equipment line.
    pub max_quantity_per_line: u32,
    pub breaker_type: String,
    /// Remote matcher base URL; the built-in rules are used when unset.
    pub matcher_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matcher_timeout_secs: 60,
            max_rooms: 50,
            max_equipment_per_room: 100,
            max_quantity_per_line: 1000,
            breaker_type: DEFAULT_BREAKER_TYPE.to_string(),
            matcher_url: None,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, CircuitGuardError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn matcher_timeout(&self) -> Duration {
        Duration::from_secs(self.matcher_timeout_secs)
    }
}

/// A validation request: the room inventory plus dwelling facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationRequest {
    pub installation_id: String,
    pub rooms: Vec<Room>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, alias = "number_of_people", skip_serializing_if = "Option::is_none")]
    pub occupant_count: Option<u32>,
    #[serde(default)]
    pub include_dimensioning_rules: bool,
}

impl InstallationRequest {
    pub fn new(installation_id: impl Into<String>, rooms: Vec<Room>) -> Self {
        Self {
            installation_id: installation_id.into(),
            rooms,
            postal_code: None,
            occupant_count: None,
            include_dimensioning_rules: false,
        }
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn with_occupants(mut self, occupants: u32) -> Self {
        self.occupant_count = Some(occupants);
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, CircuitGuardError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn scope(&self) -> RuleScope {
        if self.include_dimensioning_rules {
            RuleScope::Full
        } else {
            RuleScope::RoomEquipment
        }
    }
}

/// Reject requests the engine must not evaluate.
pub fn validate_request(
    request: &InstallationRequest,
    config: &EngineConfig,
) -> Result<(), CircuitGuardError> {
    let invalid = |msg: String| Err(CircuitGuardError::InvalidInput(msg));

    if request.installation_id.trim().is_empty() {
        return invalid("installation_id must not be empty".to_string());
    }
    if request.rooms.len() > config.max_rooms {
        return invalid(format!(
            "{} rooms exceed the limit of {}",
            request.rooms.len(),
            config.max_rooms
        ));
    }
    if request.occupant_count == Some(0) {
        return invalid("occupant_count must be at least 1".to_string());
    }

    let mut seen = HashSet::new();
    for room in &request.rooms {
        if room.room_id.trim().is_empty() {
            return invalid("room_id must not be empty".to_string());
        }
        if !seen.insert(room.room_id.as_str()) {
            return invalid(format!("duplicate room_id '{}'", room.room_id));
        }
        if let Some(area) = room.room_area {
            if !area.is_finite() || area < 0.0 {
                return invalid(format!("room '{}' has an invalid area ({})", room.room_id, area));
            }
        }
        if room.equipment.len() > config.max_equipment_per_room {
            return invalid(format!(
                "room '{}' has {} equipment lines, limit is {}",
                room.room_id,
                room.equipment.len(),
                config.max_equipment_per_room
            ));
        }
        if let Some(item) = room
            .equipment
            .iter()
            .find(|item| item.quantity > config.max_quantity_per_line)
        {
            return invalid(format!(
                "room '{}' has a quantity of {} for {}, limit is {}",
                room.room_id, item.quantity, item.kind, config.max_quantity_per_line
            ));
        }
    }

    Ok(())
}

/// Compliance and dimensioning API used by both library callers and the CLI.
#[derive(Clone)]
pub struct CircuitGuard {
    config: EngineConfig,
    checker: ComplianceChecker,
    dimensioner: Dimensioner,
}

impl CircuitGuard {
    /// Engine backed by the built-in rules.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_matcher(config, Arc::new(RulesEngine::with_default_rules()))
    }

    pub fn with_matcher(config: EngineConfig, matcher: Arc<dyn RuleMatcher>) -> Self {
        let checker = ComplianceChecker::new(matcher, config.matcher_timeout());
        let dimensioner = Dimensioner::new(config.breaker_type.clone());
        Self {
            config,
            checker,
            dimensioner,
        }
    }

    /// Engine using the remote matcher when `matcher_url` is set.
    pub fn from_config(config: EngineConfig) -> Self {
        match config.matcher_url.clone() {
            Some(url) => {
                tracing::info!("Using remote rule matcher at {}", url);
                let matcher = HttpRuleMatcher::with_timeout(url, config.matcher_timeout());
                Self::with_matcher(config, Arc::new(matcher))
            }
            None => Self::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn matcher_name(&self) -> &str {
        self.checker.matcher_name()
    }

    /// Compliance check. Matcher failures are reported inside the report;
    /// only invalid input is an error.
    pub async fn check_compliance(
        &self,
        request: &InstallationRequest,
    ) -> Result<ComplianceReport, CircuitGuardError> {
        validate_request(request, &self.config)?;
        tracing::info!(
            "Checking compliance of '{}' ({} rooms)",
            request.installation_id,
            request.rooms.len()
        );
        Ok(self
            .checker
            .check(&request.installation_id, &request.rooms, request.scope())
            .await)
    }

    /// Room-level compliance, dimensioning, then a full-scope run whose
    /// global result becomes the report's global compliance.
    pub async fn validate_with_dimensioning(
        &self,
        request: &InstallationRequest,
    ) -> Result<DimensioningReport, CircuitGuardError> {
        validate_request(request, &self.config)?;
        tracing::info!(
            "Validating and dimensioning '{}' ({} rooms)",
            request.installation_id,
            request.rooms.len()
        );

        let mut compliance = self
            .checker
            .check(&request.installation_id, &request.rooms, RuleScope::RoomEquipment)
            .await;

        let dimensioning = self.dimensioner.dimension(
            &request.rooms,
            request.postal_code.as_deref(),
            request.occupant_count,
            compliance.global_compliance.overall_status,
        );

        if !compliance.matcher_failed() {
            let full = self
                .checker
                .check_dimensioned(
                    &request.installation_id,
                    &request.rooms,
                    request.postal_code.as_deref(),
                    &dimensioning,
                )
                .await;
            compliance.global_compliance = full.global_compliance;
            compliance.matcher_error = full.matcher_error;
        }

        Ok(DimensioningReport {
            compliance,
            dimensioning,
        })
    }

    /// Dimensioning alone, without consulting the rule matcher.
    pub fn dimension(
        &self,
        request: &InstallationRequest,
    ) -> Result<crate::model::DimensioningResult, CircuitGuardError> {
        validate_request(request, &self.config)?;
        Ok(self.dimensioner.dimension(
            &request.rooms,
            request.postal_code.as_deref(),
            request.occupant_count,
            crate::model::ComplianceStatus::Compliant,
        ))
    }
}

impl Default for CircuitGuard {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EquipmentItem, EquipmentKind, RoomType};

    fn request() -> InstallationRequest {
        InstallationRequest::new(
            "flat-1",
            vec![Room::new("b1", RoomType::Bedroom)
                .with_area(12.0)
                .with_equipment(EquipmentItem::new(EquipmentKind::SimpleSocket, 3))],
        )
    }

    #[test]
    fn test_config_defaults_and_partial_file() {
        let config = EngineConfig::default();
        assert_eq!(config.matcher_timeout_secs, 60);
        assert_eq!(config.max_rooms, 50);
        assert_eq!(config.max_equipment_per_room, 100);
        assert_eq!(config.max_quantity_per_line, 1000);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_rooms": 5, "breaker_type": "Type B"}"#).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.max_rooms, 5);
        assert_eq!(config.breaker_type, "Type B");
        assert_eq!(config.matcher_timeout_secs, 60);
    }

    #[test]
    fn test_request_aliases() {
        let json = r#"{
            "installation_id": "x",
            "rooms": [{"room_id": "r", "room_type": "LivingRoomWithKitchen", "area": 30}],
            "number_of_people": 3
        }"#;
        let request: InstallationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.occupant_count, Some(3));
        assert_eq!(request.rooms[0].room_type, RoomType::LivingRoomWithIntegratedKitchen);
        assert_eq!(request.rooms[0].room_area, Some(30.0));
        assert!(!request.include_dimensioning_rules);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let config = EngineConfig::default();
        assert!(validate_request(&request(), &config).is_ok());

        let mut dup = request();
        dup.rooms.push(Room::new("b1", RoomType::Office));
        assert!(matches!(
            validate_request(&dup, &config),
            Err(CircuitGuardError::InvalidInput(_))
        ));

        let mut negative = request();
        negative.rooms[0].room_area = Some(-1.0);
        assert!(validate_request(&negative, &config).is_err());

        let mut nan = request();
        nan.rooms[0].room_area = Some(f64::NAN);
        assert!(validate_request(&nan, &config).is_err());

        assert!(validate_request(&request().with_occupants(0), &config).is_err());

        let mut unnamed = request();
        unnamed.installation_id = " ".to_string();
        assert!(validate_request(&unnamed, &config).is_err());

        let small = EngineConfig {
            max_equipment_per_room: 0,
            ..EngineConfig::default()
        };
        assert!(validate_request(&request(), &small).is_err());
    }

    #[tokio::test]
    async fn test_huge_quantities_are_rejected() {
        let guard = CircuitGuard::default();
        let huge = InstallationRequest::new(
            "flat-1",
            vec![Room::new("b1", RoomType::Bedroom)
                .with_area(12.0)
                .with_equipment(EquipmentItem::new(EquipmentKind::SimpleSocket, 3_000_000_000))
                .with_equipment(EquipmentItem::new(EquipmentKind::SimpleSocket, 3_000_000_000))],
        );

        match validate_request(&huge, guard.config()) {
            Err(CircuitGuardError::InvalidInput(msg)) => assert!(msg.contains("limit is 1000")),
            other => panic!("expected invalid input, got {:?}", other),
        }
        assert!(matches!(guard.dimension(&huge), Err(CircuitGuardError::InvalidInput(_))));
        assert!(guard.check_compliance(&huge).await.is_err());
        assert!(guard.validate_with_dimensioning(&huge).await.is_err());

        let mut at_limit = request();
        at_limit.rooms[0].equipment[0].quantity = 1000;
        assert!(validate_request(&at_limit, guard.config()).is_ok());
    }

    #[tokio::test]
    async fn test_check_compliance_rejects_invalid_input() {
        let guard = CircuitGuard::default();
        let mut bad = request();
        bad.rooms[0].room_id.clear();
        assert!(guard.check_compliance(&bad).await.is_err());
    }

    #[tokio::test]
    async fn test_validate_with_dimensioning() {
        let guard = CircuitGuard::default();
        let report = guard
            .validate_with_dimensioning(&request().with_postal_code("75001"))
            .await
            .unwrap();
        assert_eq!(report.compliance.room_results.len(), 1);
        assert!(report.dimensioning.surge_protectors.is_empty());
        assert_eq!(report.dimensioning.electrical_panels[0].modules, 13);
    }
}
