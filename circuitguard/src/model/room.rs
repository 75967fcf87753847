use serde::{Deserialize, Serialize};

use super::equipment::EquipmentItem;

/// Room categories of the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Kitchen,
    LivingRoom,
    #[serde(alias = "LivingRoomWithKitchen")]
    LivingRoomWithIntegratedKitchen,
    CirculationArea,
    WetRoom,
    #[serde(rename = "WC")]
    Wc,
    #[serde(rename = "BathroomWithWC")]
    BathroomWithWc,
    Bedroom,
    Office,
    Other,
    ExteriorSpace,
}

impl RoomType {
    /// Rooms counted in the living area (everything but Other and ExteriorSpace).
    pub fn is_living_area(&self) -> bool {
        !matches!(self, RoomType::Other | RoomType::ExteriorSpace)
    }

    /// Rooms whose normal sockets go on 20 A kitchen circuits.
    pub fn is_kitchen(&self) -> bool {
        matches!(self, RoomType::Kitchen | RoomType::LivingRoomWithIntegratedKitchen)
    }

    /// Rooms whose normal sockets go on 16 A standard circuits.
    pub fn has_standard_socket_circuits(&self) -> bool {
        matches!(
            self,
            RoomType::LivingRoom
                | RoomType::Bedroom
                | RoomType::Office
                | RoomType::CirculationArea
                | RoomType::WetRoom
                | RoomType::BathroomWithWc
        )
    }

    /// French label used in rule messages.
    pub fn label_fr(&self) -> &'static str {
        match self {
            RoomType::Kitchen => "La cuisine",
            RoomType::LivingRoom => "Le séjour",
            RoomType::LivingRoomWithIntegratedKitchen => "Le séjour avec cuisine intégrée",
            RoomType::CirculationArea => "La zone de circulation",
            RoomType::WetRoom => "La salle d'eau",
            RoomType::Wc => "Le WC",
            RoomType::BathroomWithWc => "La salle d'eau avec WC",
            RoomType::Bedroom => "La chambre",
            RoomType::Office => "Le bureau",
            RoomType::Other => "Le local",
            RoomType::ExteriorSpace => "L'espace extérieur",
        }
    }
}

/// A room of the installation with its equipment inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub room_type: RoomType,
    #[serde(default, alias = "area", skip_serializing_if = "Option::is_none")]
    pub room_area: Option<f64>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

impl Room {
    pub fn new(room_id: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            room_id: room_id.into(),
            room_type,
            room_area: None,
            equipment: Vec::new(),
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.room_area = Some(area);
        self
    }

    pub fn with_equipment(mut self, item: EquipmentItem) -> Self {
        self.equipment.push(item);
        self
    }

    /// Area in m², 0 when unknown.
    pub fn area_or_zero(&self) -> f64 {
        self.room_area.unwrap_or(0.0)
    }
}

/// Sum of room areas excluding Other and ExteriorSpace.
pub fn living_area(rooms: &[Room]) -> f64 {
    rooms
        .iter()
        .filter(|r| r.room_type.is_living_area())
        .map(Room::area_or_zero)
        .sum()
}

/// Sum of all known room areas.
pub fn total_area(rooms: &[Room]) -> f64 {
    rooms.iter().map(Room::area_or_zero).sum()
}
