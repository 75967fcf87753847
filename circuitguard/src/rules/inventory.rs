//! Normalized equipment inventory handed to rule matchers.

use serde::{Deserialize, Serialize};

use crate::classifier::{count_room_equipment, default_socket_rating, parent_of, EquipmentCounts};
use crate::model::{
    living_area, CircuitBreakerSpec, DimensioningResult, EquipmentKind, Room, RoomType,
    SurgeProtectorSpec,
};

/// One equipment line after classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLine {
    pub kind: EquipmentKind,
    pub parent: EquipmentKind,
    /// Quantity, with the socket multiplier applied to normal sockets.
    pub units: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInventory {
    pub room_id: String,
    pub room_type: RoomType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Reference violations about this room carry as their focus node.
    pub focus: String,
    pub counts: EquipmentCounts,
    pub lines: Vec<InventoryLine>,
}

/// Proposed protection devices, attached for the full-scope run so rules
/// can check the dimensioning against the installation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DimensioningSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub circuit_breakers: Vec<CircuitBreakerSpec>,
    pub surge_protectors: Vec<SurgeProtectorSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub installation_id: String,
    pub living_area: f64,
    pub rooms: Vec<RoomInventory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensioning: Option<DimensioningSummary>,
}

impl Inventory {
    pub fn from_rooms(installation_id: &str, rooms: &[Room]) -> Self {
        let living_area = living_area(rooms);
        let rooms = rooms
            .iter()
            .map(|room| {
                let lines = room
                    .equipment
                    .iter()
                    .map(|item| {
                        let (current, socket_type) = default_socket_rating(item);
                        let units = if item.kind.is_normal_socket() {
                            item.quantity.saturating_mul(item.kind.socket_multiplier())
                        } else {
                            item.quantity
                        };
                        InventoryLine {
                            kind: item.kind,
                            parent: parent_of(item.kind),
                            units,
                            current,
                            socket_type,
                        }
                    })
                    .collect();

                let counts = count_room_equipment(&room.equipment);
                tracing::debug!("Room {} counts: {:?}", room.room_id, counts);

                RoomInventory {
                    room_id: room.room_id.clone(),
                    room_type: room.room_type,
                    area: room.room_area,
                    focus: room_focus(&room.room_id),
                    counts,
                    lines,
                }
            })
            .collect();

        Self {
            installation_id: installation_id.to_string(),
            living_area,
            rooms,
            dimensioning: None,
        }
    }

    pub fn with_dimensioning(
        mut self,
        postal_code: Option<&str>,
        result: &DimensioningResult,
    ) -> Self {
        self.dimensioning = Some(DimensioningSummary {
            postal_code: postal_code.map(str::to_string),
            circuit_breakers: result.circuit_breakers.clone(),
            surge_protectors: result.surge_protectors.clone(),
        });
        self
    }

    /// Totals over every room.
    pub fn total_counts(&self) -> EquipmentCounts {
        self.rooms.iter().fold(EquipmentCounts::default(), |mut acc, room| {
            acc.absorb(&room.counts);
            acc
        })
    }

    pub fn equipment_lines(&self) -> usize {
        self.rooms.iter().map(|r| r.lines.len()).sum()
    }
}

/// Focus node of a room.
pub fn room_focus(room_id: &str) -> String {
    format!("room:{}", room_id)
}
