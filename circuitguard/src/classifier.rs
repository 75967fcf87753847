//! Equipment Classification Module
//!
//! Maps every equipment kind to one of the five parent categories and
//! exposes the default electrical attributes the rules and the sizing
//! engine rely on (normal-socket membership, socket multipliers, default
//! socket ratings, typical power draw).

use serde::{Deserialize, Serialize};

use crate::model::{DeficitCategory, EquipmentItem, EquipmentKind};

/// The five parent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Socket,
    NetworkSocket,
    LightingPoint,
    Switch,
    SpecializedEquipment,
}

impl EquipmentCategory {
    /// The parent kind standing for this category.
    pub fn parent_kind(&self) -> EquipmentKind {
        match self {
            EquipmentCategory::Socket => EquipmentKind::Socket,
            EquipmentCategory::NetworkSocket => EquipmentKind::NetworkSocket,
            EquipmentCategory::LightingPoint => EquipmentKind::LightingPoint,
            EquipmentCategory::Switch => EquipmentKind::Switch,
            EquipmentCategory::SpecializedEquipment => EquipmentKind::SpecializedEquipment,
        }
    }
}

impl EquipmentKind {
    /// Parent category of the kind. Exhaustive, so a new kind cannot be
    /// added without classifying it.
    pub fn category(&self) -> EquipmentCategory {
        use EquipmentKind::*;
        match self {
            Socket | SimpleSocket | DoubleSocket | TripleSocket | WaterproofSocket
            | ChildproofSocket | UsbSocket | HighCurrentSocket | TvSocket | OvenSocket
            | Dedicated20ASocket | ExtractorSocket => EquipmentCategory::Socket,

            NetworkSocket | Rj45Socket | FiberSocket | CoaxSocket => EquipmentCategory::NetworkSocket,

            LightingPoint | CeilingLighting | WallLighting | SpotLighting | EmergencyLighting
            | ExteriorLighting => EquipmentCategory::LightingPoint,

            Switch | SimpleSwitch | DoubleSwitch | TripleSwitch | DimmerSwitch
            | MotionSensorSwitch | RemoteSwitch | TimerSwitch => EquipmentCategory::Switch,

            SpecializedEquipment | ElectricHeating | WaterHeater | Ventilation | AlarmSystem
            | Intercom | ElectricOven | Dishwasher | WashingMachine | Dryer | CookingHob
            | AirConditioning | Convector | InertiaRadiator | FloorHeating | DuctedHeatPump
            | ElectricWaterHeater | InstantaneousWaterHeater | StorageWaterHeater | Vmc
            | SimpleFlowVmc | DoubleFlowVmc => EquipmentCategory::SpecializedEquipment,
        }
    }

    /// General-purpose outlet counted toward minimum-socket rules.
    pub fn is_normal_socket(&self) -> bool {
        matches!(
            self,
            EquipmentKind::Socket
                | EquipmentKind::SimpleSocket
                | EquipmentKind::DoubleSocket
                | EquipmentKind::TripleSocket
                | EquipmentKind::WaterproofSocket
                | EquipmentKind::ChildproofSocket
                | EquipmentKind::UsbSocket
        )
    }

    /// Outlets embedded in one unit when tallying normal sockets.
    pub fn socket_multiplier(&self) -> u32 {
        match self {
            EquipmentKind::DoubleSocket => 2,
            EquipmentKind::TripleSocket => 3,
            _ => 1,
        }
    }

    /// Appliances and sockets that each need a dedicated 20 A circuit.
    pub fn is_specialised_20a(&self) -> bool {
        matches!(
            self,
            EquipmentKind::Dishwasher
                | EquipmentKind::WashingMachine
                | EquipmentKind::Dryer
                | EquipmentKind::ElectricOven
                | EquipmentKind::Dedicated20ASocket
        )
    }

    pub fn is_water_heater(&self) -> bool {
        matches!(
            self,
            EquipmentKind::WaterHeater
                | EquipmentKind::ElectricWaterHeater
                | EquipmentKind::InstantaneousWaterHeater
                | EquipmentKind::StorageWaterHeater
        )
    }

    pub fn is_vmc(&self) -> bool {
        matches!(
            self,
            EquipmentKind::Vmc | EquipmentKind::SimpleFlowVmc | EquipmentKind::DoubleFlowVmc
        )
    }

    /// Heating kinds sized from an area table.
    pub fn is_area_sized_heating(&self) -> bool {
        matches!(
            self,
            EquipmentKind::Convector
                | EquipmentKind::InertiaRadiator
                | EquipmentKind::FloorHeating
                | EquipmentKind::DuctedHeatPump
                | EquipmentKind::AirConditioning
        )
    }

    /// Heating kinds that get one circuit per physical unit.
    pub fn needs_individual_heating_circuit(&self) -> bool {
        matches!(self, EquipmentKind::Convector | EquipmentKind::InertiaRadiator)
    }
}

/// Parent kind of any kind (identity on parents).
pub fn parent_of(kind: EquipmentKind) -> EquipmentKind {
    kind.category().parent_kind()
}

/// Default (current A, socket type) of specialised sockets. Oven, extractor
/// and dedicated-20A sockets always have a default; high-current and TV
/// sockets only when nothing was declared.
pub fn default_socket_rating(item: &EquipmentItem) -> (Option<u32>, Option<String>) {
    let mut current = item.declared_current();
    let mut socket_type = item.declared_socket_type().map(str::to_string);

    let fill = |current: &mut Option<u32>, socket_type: &mut Option<String>, a: u32, t: &str| {
        current.get_or_insert(a);
        socket_type.get_or_insert_with(|| t.to_string());
    };

    match item.kind {
        EquipmentKind::OvenSocket => fill(&mut current, &mut socket_type, 32, "32A"),
        EquipmentKind::ExtractorSocket => fill(&mut current, &mut socket_type, 16, "2P+T"),
        EquipmentKind::Dedicated20ASocket => fill(&mut current, &mut socket_type, 20, "20A"),
        EquipmentKind::HighCurrentSocket | EquipmentKind::TvSocket
            if current.is_none() && socket_type.is_none() =>
        {
            fill(&mut current, &mut socket_type, 20, "20A")
        }
        _ => {}
    }

    (current, socket_type)
}

/// Typical power draw (W) used when no power is declared.
pub fn typical_power_w(kind: EquipmentKind) -> f64 {
    match kind {
        EquipmentKind::SpecializedEquipment => 2000.0,
        EquipmentKind::ElectricHeating => 2000.0,
        EquipmentKind::Convector => 1500.0,
        EquipmentKind::InertiaRadiator => 1800.0,
        EquipmentKind::AirConditioning => 2500.0,
        EquipmentKind::DuctedHeatPump => 3500.0,
        EquipmentKind::FloorHeating => 3000.0,
        EquipmentKind::WaterHeater => 3000.0,
        EquipmentKind::SimpleFlowVmc => 800.0,
        EquipmentKind::DoubleFlowVmc => 1200.0,
        EquipmentKind::ElectricOven | EquipmentKind::OvenSocket => 2500.0,
        EquipmentKind::WashingMachine => 2200.0,
        EquipmentKind::Dryer => 2600.0,
        EquipmentKind::Socket => 100.0,
        EquipmentKind::NetworkSocket => 10.0,
        EquipmentKind::LightingPoint => 60.0,
        EquipmentKind::Switch => 0.0,
        _ => 100.0,
    }
}

/// Existing equipment counts of a room, per deficit category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCounts {
    pub sockets: u32,
    pub network_sockets: u32,
    pub lighting_points: u32,
    pub switches: u32,
    pub sockets_32a: u32,
}

impl EquipmentCounts {
    pub fn get(&self, category: DeficitCategory) -> u32 {
        match category {
            DeficitCategory::Socket => self.sockets,
            DeficitCategory::NetworkSocket => self.network_sockets,
            DeficitCategory::LightingPoint => self.lighting_points,
            DeficitCategory::Switch => self.switches,
            DeficitCategory::Socket32A => self.sockets_32a,
        }
    }

    /// Add another tally into this one, saturating at `u32::MAX`.
    pub fn absorb(&mut self, other: &EquipmentCounts) {
        self.sockets = self.sockets.saturating_add(other.sockets);
        self.network_sockets = self.network_sockets.saturating_add(other.network_sockets);
        self.lighting_points = self.lighting_points.saturating_add(other.lighting_points);
        self.switches = self.switches.saturating_add(other.switches);
        self.sockets_32a = self.sockets_32a.saturating_add(other.sockets_32a);
    }
}

/// Count a room's equipment. Only normal sockets count as sockets (double
/// and triple outlets count 2 and 3); oven sockets rated 32 A are counted
/// separately.
pub fn count_room_equipment(items: &[EquipmentItem]) -> EquipmentCounts {
    let mut counts = EquipmentCounts::default();

    for item in items {
        match item.kind.category() {
            EquipmentCategory::Socket => {
                if item.kind.is_normal_socket() {
                    let units = item.quantity.saturating_mul(item.kind.socket_multiplier());
                    counts.sockets = counts.sockets.saturating_add(units);
                }
                if item.kind == EquipmentKind::OvenSocket {
                    let (current, _) = default_socket_rating(item);
                    if current == Some(32) {
                        counts.sockets_32a = counts.sockets_32a.saturating_add(item.quantity);
                    }
                }
            }
            EquipmentCategory::NetworkSocket => {
                counts.network_sockets = counts.network_sockets.saturating_add(item.quantity)
            }
            EquipmentCategory::LightingPoint => {
                counts.lighting_points = counts.lighting_points.saturating_add(item.quantity)
            }
            EquipmentCategory::Switch => {
                counts.switches = counts.switches.saturating_add(item.quantity)
            }
            EquipmentCategory::SpecializedEquipment => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_mapping_is_idempotent() {
        for kind in EquipmentKind::ALL {
            let parent = parent_of(kind);
            assert_eq!(parent_of(parent), parent, "{kind}");
            assert_eq!(parent_of(kind), parent, "{kind}");
        }
    }

    #[test]
    fn test_parent_examples() {
        assert_eq!(parent_of(EquipmentKind::TripleSocket), EquipmentKind::Socket);
        assert_eq!(parent_of(EquipmentKind::CoaxSocket), EquipmentKind::NetworkSocket);
        assert_eq!(parent_of(EquipmentKind::SpotLighting), EquipmentKind::LightingPoint);
        assert_eq!(parent_of(EquipmentKind::TimerSwitch), EquipmentKind::Switch);
        assert_eq!(parent_of(EquipmentKind::DoubleFlowVmc), EquipmentKind::SpecializedEquipment);
        assert_eq!(
            parent_of(EquipmentKind::parse_lenient("Jacuzzi")),
            EquipmentKind::SpecializedEquipment
        );
    }

    #[test]
    fn test_normal_sockets_and_multipliers() {
        assert!(EquipmentKind::UsbSocket.is_normal_socket());
        assert!(!EquipmentKind::OvenSocket.is_normal_socket());
        assert!(!EquipmentKind::Dedicated20ASocket.is_normal_socket());
        assert!(!EquipmentKind::TvSocket.is_normal_socket());
        assert_eq!(EquipmentKind::DoubleSocket.socket_multiplier(), 2);
        assert_eq!(EquipmentKind::TripleSocket.socket_multiplier(), 3);
        assert_eq!(EquipmentKind::SimpleSocket.socket_multiplier(), 1);
    }

    #[test]
    fn test_default_socket_rating() {
        let oven = EquipmentItem::new(EquipmentKind::OvenSocket, 1);
        assert_eq!(default_socket_rating(&oven), (Some(32), Some("32A".to_string())));

        let tv = EquipmentItem::new(EquipmentKind::TvSocket, 1).with_spec("socketType", "TV");
        assert_eq!(default_socket_rating(&tv), (None, Some("TV".to_string())));

        let simple = EquipmentItem::new(EquipmentKind::SimpleSocket, 1);
        assert_eq!(default_socket_rating(&simple), (None, None));
    }

    #[test]
    fn test_count_room_equipment() {
        let items = vec![
            EquipmentItem::new(EquipmentKind::SimpleSocket, 2),
            EquipmentItem::new(EquipmentKind::DoubleSocket, 2),
            EquipmentItem::new(EquipmentKind::TripleSocket, 1),
            EquipmentItem::new(EquipmentKind::Dedicated20ASocket, 3),
            EquipmentItem::new(EquipmentKind::OvenSocket, 1),
            EquipmentItem::new(EquipmentKind::OvenSocket, 1).with_spec("current", 20),
            EquipmentItem::new(EquipmentKind::Rj45Socket, 1),
            EquipmentItem::new(EquipmentKind::CeilingLighting, 2),
            EquipmentItem::new(EquipmentKind::SimpleSwitch, 1),
            EquipmentItem::new(EquipmentKind::Dishwasher, 1),
        ];
        let counts = count_room_equipment(&items);
        assert_eq!(counts.sockets, 2 + 4 + 3);
        assert_eq!(counts.sockets_32a, 1);
        assert_eq!(counts.network_sockets, 1);
        assert_eq!(counts.lighting_points, 2);
        assert_eq!(counts.switches, 1);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let items = vec![
            EquipmentItem::new(EquipmentKind::TripleSocket, 2_000_000_000),
            EquipmentItem::new(EquipmentKind::SimpleSocket, 5),
            EquipmentItem::new(EquipmentKind::CeilingLighting, u32::MAX),
            EquipmentItem::new(EquipmentKind::SpotLighting, 1),
        ];
        let counts = count_room_equipment(&items);
        assert_eq!(counts.sockets, u32::MAX);
        assert_eq!(counts.lighting_points, u32::MAX);

        let mut total = counts;
        total.absorb(&counts);
        assert_eq!(total.sockets, u32::MAX);
        assert_eq!(total.switches, 0);
    }
}
