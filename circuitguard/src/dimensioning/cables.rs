//! Cable run estimation, aggregated by (cable type, cross-section).

use std::collections::BTreeMap;

use crate::classifier::EquipmentCategory;
use crate::model::{total_area, CableSpec, EquipmentKind, Room, RoomType};

pub const POWER_CABLE: &str = "H07V-U";
pub const NETWORK_CABLE: &str = "RJ45 Cat6 UTP";
pub const COAX_CABLE: &str = "Coaxial RG6";

#[derive(Debug, Default)]
struct CableRun {
    length: f64,
    descriptions: Vec<String>,
}

/// Runs keyed by type and section in hundredths of mm², so the output
/// order does not depend on room order.
#[derive(Debug, Default)]
pub struct CableAggregator {
    runs: BTreeMap<(String, u32), CableRun>,
}

impl CableAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run; the length is rounded up to the meter.
    pub fn add(&mut self, cable_type: &str, section: f64, length: f64, description: String) {
        let key = (cable_type.to_string(), (section * 100.0).round() as u32);
        let run = self.runs.entry(key).or_default();
        run.length += length.ceil();
        run.descriptions.push(description);
    }

    pub fn into_specs(self, total_area: f64) -> Vec<CableSpec> {
        self.runs
            .into_iter()
            .map(|((cable_type, hundredths), run)| {
                let section = f64::from(hundredths) / 100.0;
                let mut description = if hundredths == 0 {
                    format!("Câbles {}", run.descriptions.join(" + "))
                } else {
                    format!(
                        "Câble {} {}mm² - {}",
                        cable_type,
                        section,
                        run.descriptions.join(" + ")
                    )
                };
                if total_area > 0.0 {
                    description.push_str(&format!(" / {:.0} m²", total_area));
                }
                CableSpec {
                    section,
                    cable_type,
                    length_estimate: run.length,
                    description,
                }
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct CableCounts {
    lighting_points: u32,
    kitchen_sockets: u32,
    standard_sockets: u32,
    network_sockets: u32,
    tv_points: u32,
    oven_sockets: u32,
    kitchen_area: f64,
    has_kitchen: bool,
}

fn count(rooms: &[Room]) -> CableCounts {
    let mut counts = CableCounts::default();
    for room in rooms {
        if room.room_type == RoomType::Kitchen {
            counts.has_kitchen = true;
            counts.kitchen_area += room.area_or_zero();
        }
        for item in &room.equipment {
            let qty = item.quantity;
            match item.kind.category() {
                EquipmentCategory::LightingPoint => {
                    counts.lighting_points = counts.lighting_points.saturating_add(qty)
                }
                // Coax outlets are cabled in RG6 only, never in Cat6.
                EquipmentCategory::NetworkSocket if item.kind == EquipmentKind::CoaxSocket => {
                    counts.tv_points = counts.tv_points.saturating_add(qty)
                }
                EquipmentCategory::NetworkSocket => {
                    counts.network_sockets = counts.network_sockets.saturating_add(qty)
                }
                EquipmentCategory::Socket => {
                    if item.kind.is_normal_socket() {
                        if room.room_type.is_kitchen() {
                            counts.kitchen_sockets = counts.kitchen_sockets.saturating_add(qty);
                        } else if room.room_type.has_standard_socket_circuits() {
                            counts.standard_sockets = counts.standard_sockets.saturating_add(qty);
                        }
                    }
                    match item.kind {
                        EquipmentKind::TvSocket => {
                            counts.tv_points = counts.tv_points.saturating_add(qty)
                        }
                        EquipmentKind::OvenSocket => {
                            counts.oven_sockets = counts.oven_sockets.saturating_add(qty)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
    counts
}

/// Estimated cable runs for the whole installation.
pub fn estimate_cables(rooms: &[Room]) -> Vec<CableSpec> {
    let area = total_area(rooms);
    let counts = count(rooms);
    let mut cables = CableAggregator::new();

    if counts.lighting_points > 0 {
        let n = f64::from(counts.lighting_points);
        cables.add(
            POWER_CABLE,
            1.5,
            (n * 15.0).max(area * 0.8),
            format!("circuits éclairage - {} point(s)", counts.lighting_points),
        );
    }

    if counts.kitchen_sockets > 0 {
        let n = counts.kitchen_sockets;
        let circuits = n.div_ceil(6).max(1);
        cables.add(
            POWER_CABLE,
            2.5,
            f64::from(n) * 3.0 + f64::from(circuits) * 25.0,
            format!("circuits prises cuisine 20A - {} prise(s)", n),
        );
    }

    if counts.standard_sockets > 0 {
        let n = counts.standard_sockets;
        let circuits = n.div_ceil(8);
        cables.add(
            POWER_CABLE,
            1.5,
            f64::from(n) * 2.5 + f64::from(circuits) * 20.0,
            format!("circuits prises classiques 16A - {} prise(s)", n),
        );
    }

    if counts.network_sockets > 0 {
        let n = f64::from(counts.network_sockets);
        cables.add(
            NETWORK_CABLE,
            0.0,
            (n * 25.0).max(area * 0.5),
            format!("réseau - {} prise(s) réseau", counts.network_sockets),
        );
    }

    if counts.tv_points > 0 {
        let n = f64::from(counts.tv_points);
        cables.add(
            COAX_CABLE,
            0.0,
            (n * 20.0).max(area * 0.4),
            format!("coaxiaux TV - {} prise(s) TV/coaxiale", counts.tv_points),
        );
    }

    if counts.has_kitchen {
        cables.add(
            POWER_CABLE,
            4.0,
            (counts.kitchen_area * 4.0).max(60.0),
            "circuits dédiés cuisine (four, lave-vaisselle, plaque)".to_string(),
        );
    }

    if counts.oven_sockets > 0 {
        cables.add(
            POWER_CABLE,
            6.0,
            f64::from(counts.oven_sockets) * 25.0,
            format!("circuits dédiés prises plaque 32A - {} prise(s)", counts.oven_sockets),
        );
    }

    cables.into_specs(area)
}
