//! Equipment kinds and per-room equipment lines.
//!
//! Kind strings follow the NF C 15-100 ontology names (`SimpleSocket`,
//! `DoubleFlowVMC`, ...). Unrecognised strings never fail deserialization:
//! they fall back to [`EquipmentKind::SpecializedEquipment`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Leaf and parent equipment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquipmentKind {
    // Parents
    Socket,
    NetworkSocket,
    LightingPoint,
    Switch,
    SpecializedEquipment,

    // Sockets
    SimpleSocket,
    DoubleSocket,
    TripleSocket,
    WaterproofSocket,
    ChildproofSocket,
    UsbSocket,
    HighCurrentSocket,
    TvSocket,
    OvenSocket,
    Dedicated20ASocket,
    ExtractorSocket,

    // Switches
    SimpleSwitch,
    DoubleSwitch,
    TripleSwitch,
    DimmerSwitch,
    MotionSensorSwitch,
    RemoteSwitch,
    TimerSwitch,

    // Lighting
    CeilingLighting,
    WallLighting,
    SpotLighting,
    EmergencyLighting,
    ExteriorLighting,

    // Network
    Rj45Socket,
    FiberSocket,
    CoaxSocket,

    // Specialized equipment
    ElectricHeating,
    WaterHeater,
    Ventilation,
    AlarmSystem,
    Intercom,
    ElectricOven,
    Dishwasher,
    WashingMachine,
    Dryer,
    CookingHob,
    AirConditioning,
    Convector,
    InertiaRadiator,
    FloorHeating,
    DuctedHeatPump,
    ElectricWaterHeater,
    InstantaneousWaterHeater,
    StorageWaterHeater,
    Vmc,
    SimpleFlowVmc,
    DoubleFlowVmc,
}

impl EquipmentKind {
    /// Every kind, parents first.
    pub const ALL: [EquipmentKind; 52] = [
        EquipmentKind::Socket,
        EquipmentKind::NetworkSocket,
        EquipmentKind::LightingPoint,
        EquipmentKind::Switch,
        EquipmentKind::SpecializedEquipment,
        EquipmentKind::SimpleSocket,
        EquipmentKind::DoubleSocket,
        EquipmentKind::TripleSocket,
        EquipmentKind::WaterproofSocket,
        EquipmentKind::ChildproofSocket,
        EquipmentKind::UsbSocket,
        EquipmentKind::HighCurrentSocket,
        EquipmentKind::TvSocket,
        EquipmentKind::OvenSocket,
        EquipmentKind::Dedicated20ASocket,
        EquipmentKind::ExtractorSocket,
        EquipmentKind::SimpleSwitch,
        EquipmentKind::DoubleSwitch,
        EquipmentKind::TripleSwitch,
        EquipmentKind::DimmerSwitch,
        EquipmentKind::MotionSensorSwitch,
        EquipmentKind::RemoteSwitch,
        EquipmentKind::TimerSwitch,
        EquipmentKind::CeilingLighting,
        EquipmentKind::WallLighting,
        EquipmentKind::SpotLighting,
        EquipmentKind::EmergencyLighting,
        EquipmentKind::ExteriorLighting,
        EquipmentKind::Rj45Socket,
        EquipmentKind::FiberSocket,
        EquipmentKind::CoaxSocket,
        EquipmentKind::ElectricHeating,
        EquipmentKind::WaterHeater,
        EquipmentKind::Ventilation,
        EquipmentKind::AlarmSystem,
        EquipmentKind::Intercom,
        EquipmentKind::ElectricOven,
        EquipmentKind::Dishwasher,
        EquipmentKind::WashingMachine,
        EquipmentKind::Dryer,
        EquipmentKind::CookingHob,
        EquipmentKind::AirConditioning,
        EquipmentKind::Convector,
        EquipmentKind::InertiaRadiator,
        EquipmentKind::FloorHeating,
        EquipmentKind::DuctedHeatPump,
        EquipmentKind::ElectricWaterHeater,
        EquipmentKind::InstantaneousWaterHeater,
        EquipmentKind::StorageWaterHeater,
        EquipmentKind::Vmc,
        EquipmentKind::SimpleFlowVmc,
        EquipmentKind::DoubleFlowVmc,
    ];

    /// Ontology name of the kind, as used in request documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentKind::Socket => "Socket",
            EquipmentKind::NetworkSocket => "NetworkSocket",
            EquipmentKind::LightingPoint => "LightingPoint",
            EquipmentKind::Switch => "Switch",
            EquipmentKind::SpecializedEquipment => "SpecializedEquipment",
            EquipmentKind::SimpleSocket => "SimpleSocket",
            EquipmentKind::DoubleSocket => "DoubleSocket",
            EquipmentKind::TripleSocket => "TripleSocket",
            EquipmentKind::WaterproofSocket => "WaterproofSocket",
            EquipmentKind::ChildproofSocket => "ChildproofSocket",
            EquipmentKind::UsbSocket => "USBSocket",
            EquipmentKind::HighCurrentSocket => "HighCurrentSocket",
            EquipmentKind::TvSocket => "TVSocket",
            EquipmentKind::OvenSocket => "OvenSocket",
            EquipmentKind::Dedicated20ASocket => "Dedicated20ASocket",
            EquipmentKind::ExtractorSocket => "ExtractorSocket",
            EquipmentKind::SimpleSwitch => "SimpleSwitch",
            EquipmentKind::DoubleSwitch => "DoubleSwitch",
            EquipmentKind::TripleSwitch => "TripleSwitch",
            EquipmentKind::DimmerSwitch => "DimmerSwitch",
            EquipmentKind::MotionSensorSwitch => "MotionSensorSwitch",
            EquipmentKind::RemoteSwitch => "RemoteSwitch",
            EquipmentKind::TimerSwitch => "TimerSwitch",
            EquipmentKind::CeilingLighting => "CeilingLighting",
            EquipmentKind::WallLighting => "WallLighting",
            EquipmentKind::SpotLighting => "SpotLighting",
            EquipmentKind::EmergencyLighting => "EmergencyLighting",
            EquipmentKind::ExteriorLighting => "ExteriorLighting",
            EquipmentKind::Rj45Socket => "RJ45Socket",
            EquipmentKind::FiberSocket => "FiberSocket",
            EquipmentKind::CoaxSocket => "CoaxSocket",
            EquipmentKind::ElectricHeating => "ElectricHeating",
            EquipmentKind::WaterHeater => "WaterHeater",
            EquipmentKind::Ventilation => "Ventilation",
            EquipmentKind::AlarmSystem => "AlarmSystem",
            EquipmentKind::Intercom => "Intercom",
            EquipmentKind::ElectricOven => "ElectricOven",
            EquipmentKind::Dishwasher => "Dishwasher",
            EquipmentKind::WashingMachine => "WashingMachine",
            EquipmentKind::Dryer => "Dryer",
            EquipmentKind::CookingHob => "CookingHob",
            EquipmentKind::AirConditioning => "AirConditioning",
            EquipmentKind::Convector => "Convector",
            EquipmentKind::InertiaRadiator => "InertiaRadiator",
            EquipmentKind::FloorHeating => "FloorHeating",
            EquipmentKind::DuctedHeatPump => "DuctedHeatPump",
            EquipmentKind::ElectricWaterHeater => "ElectricWaterHeater",
            EquipmentKind::InstantaneousWaterHeater => "InstantaneousWaterHeater",
            EquipmentKind::StorageWaterHeater => "StorageWaterHeater",
            EquipmentKind::Vmc => "VMC",
            EquipmentKind::SimpleFlowVmc => "SimpleFlowVMC",
            EquipmentKind::DoubleFlowVmc => "DoubleFlowVMC",
        }
    }

    /// Parse a kind string, falling back to `SpecializedEquipment` for
    /// anything unrecognised.
    pub fn parse_lenient(value: &str) -> EquipmentKind {
        match value.parse() {
            Ok(kind) => kind,
            Err(UnknownEquipmentKind(raw)) => {
                tracing::warn!(
                    "Unknown equipment kind '{}', treating it as SpecializedEquipment",
                    raw
                );
                EquipmentKind::SpecializedEquipment
            }
        }
    }
}

/// Error returned by the strict [`FromStr`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown equipment kind: {0}")]
pub struct UnknownEquipmentKind(pub String);

impl FromStr for EquipmentKind {
    type Err = UnknownEquipmentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EquipmentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == trimmed)
            .ok_or_else(|| UnknownEquipmentKind(trimmed.to_string()))
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EquipmentKind {
    fn from(value: String) -> Self {
        EquipmentKind::parse_lenient(&value)
    }
}

impl From<EquipmentKind> for String {
    fn from(kind: EquipmentKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One equipment line of a room: a kind, a quantity and free-form
/// specifications (`current`, `socketType`, `power_w`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(rename = "equipment_type")]
    pub kind: EquipmentKind,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, serde_json::Value>,
}

impl EquipmentItem {
    pub fn new(kind: EquipmentKind, quantity: u32) -> Self {
        Self {
            kind,
            quantity,
            specifications: BTreeMap::new(),
        }
    }

    pub fn with_spec(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.specifications.insert(key.to_string(), value.into());
        self
    }

    /// Declared current in amperes, if any. Accepts numbers and numeric strings.
    pub fn declared_current(&self) -> Option<u32> {
        self.spec_number(&["current"]).and_then(|v| {
            if v.is_finite() && v >= 0.0 {
                Some(v.round() as u32)
            } else {
                None
            }
        })
    }

    /// Declared socket type (e.g. "2P+T", "32A"), if any.
    pub fn declared_socket_type(&self) -> Option<&str> {
        self.specifications
            .get("socketType")
            .and_then(|v| v.as_str())
    }

    /// Declared power in watts (`power_w`, `powerW` or `power`).
    pub fn declared_power_w(&self) -> Option<f64> {
        self.spec_number(&["power_w", "powerW", "power"])
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    fn spec_number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| match self.specifications.get(*key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }
}
