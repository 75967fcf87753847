//! Built-in NF C 15-100 rule set.

use std::sync::Arc;

use async_trait::async_trait;

use super::inventory::{Inventory, RoomInventory};
use super::{MatchOutcome, MatcherError, RuleMatcher, RuleScope};
use crate::dimensioning::surge_protection_required;
use crate::model::{
    CircuitKind, DeficitCategory, EquipmentRequirement, RoomType, RuleViolation, Severity,
    ViolationType,
};

/// Lighting points one 16 A lighting circuit may supply.
const LIGHTING_POINTS_PER_CIRCUIT: u32 = 8;

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn severity(&self) -> Severity;

    /// Scope the rule belongs to; room rules run under every scope.
    fn scope(&self) -> RuleScope {
        RuleScope::RoomEquipment
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation>;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        use DeficitCategory::*;
        use RoomType::*;

        let mut engine = Self::new();
        let kitchens = [Kitchen, LivingRoomWithIntegratedKitchen];

        engine.add_rule(Arc::new(
            MinimumCountRule::new("NFC-15-100-KITCHEN-001", "Kitchen sockets", &kitchens, Socket, 6)
                .with_count(RequiredCount::ByArea(kitchen_sockets))
                .with_description("3 prises 2P+T sous 4 m², 6 au-delà"),
        ));
        engine.add_rule(Arc::new(
            MinimumCountRule::new("NFC-15-100-KITCHEN-002", "Cooktop socket", &kitchens, Socket32A, 1)
                .with_description("Une prise 32A dédiée à la plaque de cuisson"),
        ));
        engine.add_rule(Arc::new(
            MinimumCountRule::new("NFC-15-100-LIVING-001", "Living room sockets", &[LivingRoom], Socket, 5)
                .with_count(RequiredCount::ByArea(living_room_sockets))
                .with_description("5 prises jusqu'à 20 m², 6 jusqu'à 24 m², 7 au-delà"),
        ));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-LIVING-002",
            "Living room lighting",
            &[LivingRoom, LivingRoomWithIntegratedKitchen],
            LightingPoint,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-BEDROOM-001",
            "Bedroom sockets",
            &[Bedroom],
            Socket,
            3,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-BEDROOM-002",
            "Bedroom lighting",
            &[Bedroom],
            LightingPoint,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-BEDROOM-003",
            "Bedroom lighting switch",
            &[Bedroom],
            Switch,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-OFFICE-001",
            "Office sockets",
            &[Office],
            Socket,
            3,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-OFFICE-002",
            "Office lighting",
            &[Office],
            LightingPoint,
            1,
        )));

        let wet_rooms = [WetRoom, BathroomWithWc];
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-WETROOM-001",
            "Wet room socket",
            &wet_rooms,
            Socket,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-WETROOM-002",
            "Wet room lighting",
            &wet_rooms,
            LightingPoint,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-WETROOM-003",
            "Wet room lighting switch",
            &wet_rooms,
            Switch,
            1,
        )));
        engine.add_rule(Arc::new(MinimumCountRule::new(
            "NFC-15-100-WC-001",
            "WC lighting",
            &[Wc],
            LightingPoint,
            1,
        )));
        engine.add_rule(Arc::new(
            MinimumCountRule::new(
                "NFC-15-100-CIRCULATION-001",
                "Circulation lighting",
                &[CirculationArea],
                LightingPoint,
                1,
            )
            .with_count(RequiredCount::ByArea(circulation_equipment)),
        ));
        engine.add_rule(Arc::new(
            MinimumCountRule::new(
                "NFC-15-100-CIRCULATION-002",
                "Circulation socket",
                &[CirculationArea],
                Socket,
                1,
            )
            .with_count(RequiredCount::ByArea(circulation_equipment)),
        ));

        engine.add_rule(Arc::new(NetworkSocketRecommendationRule));
        engine.add_rule(Arc::new(InstallationMinimumRule::lighting()));
        engine.add_rule(Arc::new(InstallationMinimumRule::sockets()));
        engine.add_rule(Arc::new(SurgeProtectionRule));
        engine.add_rule(Arc::new(LightingCircuitRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn analyze(&self, inventory: &Inventory, scope: RuleScope) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        for rule in &self.rules {
            if scope.includes(rule.scope()) {
                violations.extend(rule.check(inventory));
            }
        }
        violations
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[async_trait]
impl RuleMatcher for RulesEngine {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn evaluate(
        &self,
        inventory: &Inventory,
        scope: RuleScope,
    ) -> Result<MatchOutcome, MatcherError> {
        let violations = self.analyze(inventory, scope);
        let conforms = !violations.iter().any(RuleViolation::is_error);
        Ok(MatchOutcome {
            conforms,
            violations,
        })
    }
}

// Area-dependent requirements

fn kitchen_sockets(area: Option<f64>) -> Option<u32> {
    match area {
        Some(a) if a < 4.0 => Some(3),
        _ => Some(6),
    }
}

fn living_room_sockets(area: Option<f64>) -> Option<u32> {
    match area {
        None => Some(5),
        Some(a) if a <= 20.0 => Some(5),
        Some(a) if a <= 24.0 => Some(6),
        Some(_) => Some(7),
    }
}

fn circulation_equipment(area: Option<f64>) -> Option<u32> {
    area.filter(|a| *a >= 4.0).map(|_| 1)
}

/// French noun phrase of a category, singular or plural.
pub(crate) fn noun_fr(category: DeficitCategory, count: u32) -> &'static str {
    let plural = count > 1;
    match (category, plural) {
        (DeficitCategory::Socket, false) => "prise 2P+T",
        (DeficitCategory::Socket, true) => "prises 2P+T",
        (DeficitCategory::NetworkSocket, false) => "prise réseau",
        (DeficitCategory::NetworkSocket, true) => "prises réseau",
        (DeficitCategory::LightingPoint, false) => "point d'éclairage",
        (DeficitCategory::LightingPoint, true) => "points d'éclairage",
        (DeficitCategory::Switch, false) => "interrupteur",
        (DeficitCategory::Switch, true) => "interrupteurs",
        (DeficitCategory::Socket32A, false) => "prise 32A plaque",
        (DeficitCategory::Socket32A, true) => "prises 32A plaque",
    }
}

/// How many units a [`MinimumCountRule`] requires.
#[derive(Clone, Copy)]
pub enum RequiredCount {
    Fixed(u32),
    /// Derived from the room area; `None` means the rule does not apply.
    ByArea(fn(Option<f64>) -> Option<u32>),
}

impl RequiredCount {
    fn resolve(&self, area: Option<f64>) -> Option<u32> {
        match self {
            RequiredCount::Fixed(n) => Some(*n),
            RequiredCount::ByArea(f) => f(area),
        }
    }
}

/// "Room type X needs at least N of category Y."
pub struct MinimumCountRule {
    id: String,
    name: String,
    description: String,
    severity: Severity,
    room_types: Vec<RoomType>,
    category: DeficitCategory,
    count: RequiredCount,
}

impl MinimumCountRule {
    pub fn new(
        id: &str,
        name: &str,
        room_types: &[RoomType],
        category: DeficitCategory,
        required: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("Au moins {} {}", required, noun_fr(category, required)),
            severity: Severity::Error,
            room_types: room_types.to_vec(),
            category,
            count: RequiredCount::Fixed(required),
        }
    }

    pub fn with_count(mut self, count: RequiredCount) -> Self {
        self.count = count;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn check_room(&self, room: &RoomInventory) -> Option<RuleViolation> {
        if !self.room_types.contains(&room.room_type) {
            return None;
        }
        let required = self.count.resolve(room.area)?;
        let current = room.counts.get(self.category);
        if current >= required {
            return None;
        }

        let requirement = EquipmentRequirement::new(self.category, required, current);
        let message = format!(
            "{} doit comporter au moins {} {} conformément à la NF C 15-100 (actuellement {})",
            room.room_type.label_fr(),
            required,
            noun_fr(self.category, required),
            current
        );
        let fix = format!(
            "Ajoutez {} {}",
            requirement.shortfall(),
            noun_fr(self.category, requirement.shortfall())
        );

        Some(
            RuleViolation::new(&self.id, self.severity, message)
                .with_type(ViolationType::RoomSpecific)
                .with_focus(room.focus.clone())
                .with_fix(fix)
                .with_requirement(requirement),
        )
    }
}

impl Rule for MinimumCountRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation> {
        inventory
            .rooms
            .iter()
            .filter_map(|room| self.check_room(room))
            .collect()
    }
}

/// Bedrooms and offices should have a network socket.
pub struct NetworkSocketRecommendationRule;

impl Rule for NetworkSocketRecommendationRule {
    fn id(&self) -> &str {
        "NFC-15-100-NETWORK-001"
    }

    fn name(&self) -> &str {
        "Network socket recommendation"
    }

    fn description(&self) -> &str {
        "Une prise réseau recommandée dans chaque chambre et bureau"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation> {
        inventory
            .rooms
            .iter()
            .filter(|room| matches!(room.room_type, RoomType::Bedroom | RoomType::Office))
            .filter(|room| room.counts.network_sockets == 0)
            .map(|room| {
                let subject = if room.room_type == RoomType::Bedroom {
                    "Cette chambre"
                } else {
                    "Ce bureau"
                };
                RuleViolation::new(
                    self.id(),
                    self.severity(),
                    format!(
                        "{} devrait avoir une prise réseau (recommandation NF C 15-100)",
                        subject
                    ),
                )
                .with_type(ViolationType::Equipment)
                .with_focus(room.focus.clone())
                .with_fix("Ajoutez une prise RJ45")
                .with_requirement(EquipmentRequirement::new(DeficitCategory::NetworkSocket, 1, 0))
            })
            .collect()
    }
}

/// Installation-wide minimum, evaluated only with dimensioning rules.
pub struct InstallationMinimumRule {
    id: &'static str,
    name: &'static str,
    category: DeficitCategory,
}

impl InstallationMinimumRule {
    pub fn lighting() -> Self {
        Self {
            id: "NFC-15-100-INSTALLATION-001",
            name: "Installation lighting circuit",
            category: DeficitCategory::LightingPoint,
        }
    }

    pub fn sockets() -> Self {
        Self {
            id: "NFC-15-100-INSTALLATION-002",
            name: "Installation socket circuit",
            category: DeficitCategory::Socket,
        }
    }
}

impl Rule for InstallationMinimumRule {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "L'installation doit comporter au moins un circuit de ce type"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Full
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation> {
        let current = inventory.total_counts().get(self.category);
        if current > 0 {
            return Vec::new();
        }
        vec![RuleViolation::new(
            self.id,
            Severity::Error,
            format!(
                "L'installation électrique doit comporter au moins 1 {} (actuellement 0)",
                noun_fr(self.category, 1)
            ),
        )
        .with_type(ViolationType::Circuit)
        .with_requirement(EquipmentRequirement::new(self.category, 1, 0))]
    }
}

/// A surge protector must be planned where the postal code requires one.
pub struct SurgeProtectionRule;

impl Rule for SurgeProtectionRule {
    fn id(&self) -> &str {
        "NFC-15-100-SPD-001"
    }

    fn name(&self) -> &str {
        "Surge protection"
    }

    fn description(&self) -> &str {
        "Parafoudre obligatoire dans les départements exposés à la foudre"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Full
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation> {
        let Some(dimensioning) = &inventory.dimensioning else {
            return Vec::new();
        };
        let postal_code = dimensioning.postal_code.as_deref();
        if !surge_protection_required(postal_code)
            || dimensioning.surge_protectors.iter().any(|spd| spd.quantity > 0)
        {
            return Vec::new();
        }

        let location = postal_code.map_or_else(
            || "code postal inconnu".to_string(),
            |code| format!("code postal {}", code),
        );
        vec![RuleViolation::new(
            self.id(),
            self.severity(),
            format!(
                "Parafoudre obligatoire pour cette installation ({}) mais absent du tableau",
                location
            ),
        )
        .with_type(ViolationType::Protection)
        .with_fix("Ajoutez un parafoudre Type 2 en tête du tableau électrique")]
    }
}

/// Enough 16 A lighting circuits for the installation's lighting points.
pub struct LightingCircuitRule;

impl Rule for LightingCircuitRule {
    fn id(&self) -> &str {
        "NFC-15-100-LIGHTING-CIRCUITS-001"
    }

    fn name(&self) -> &str {
        "Lighting circuits"
    }

    fn description(&self) -> &str {
        "8 points lumineux maximum par circuit d'éclairage"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Full
    }

    fn check(&self, inventory: &Inventory) -> Vec<RuleViolation> {
        let Some(dimensioning) = &inventory.dimensioning else {
            return Vec::new();
        };
        let points = inventory.total_counts().lighting_points;
        let required = points.div_ceil(LIGHTING_POINTS_PER_CIRCUIT);
        let planned = dimensioning
            .circuit_breakers
            .iter()
            .filter(|b| b.circuit == CircuitKind::Lighting)
            .fold(0u32, |acc, b| acc.saturating_add(b.quantity));
        if planned >= required {
            return Vec::new();
        }

        vec![RuleViolation::new(
            self.id(),
            self.severity(),
            format!(
                "Circuits d'éclairage insuffisants : {} requis pour {} points lumineux, {} prévu(s)",
                required, points, planned
            ),
        )
        .with_type(ViolationType::Circuit)
        .with_fix(format!(
            "Ajoutez {} disjoncteur(s) d'éclairage 16A",
            required - planned
        ))]
    }
}
