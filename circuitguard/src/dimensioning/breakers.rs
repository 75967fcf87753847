//! Circuit breaker sizing.

use std::collections::BTreeMap;

use super::tables::{
    heating_table, power_rating, resolve, top_threshold, vmc_rating, water_heater_rating,
    DEFAULT_HEATING_RATING,
};
use crate::classifier::{typical_power_w, EquipmentCategory};
use crate::model::{living_area, CircuitBreakerSpec, CircuitKind, EquipmentKind, Room};

const LIGHTING_POINTS_PER_CIRCUIT: u32 = 8;
const SOCKETS_PER_CIRCUIT: u32 = 8;
const KITCHEN_SOCKETS_PER_CIRCUIT: u32 = 6;
const MIN_SPECIALISED_20A_CIRCUITS: u32 = 3;

/// Breakers and the notes produced while sizing them.
#[derive(Debug, Clone, Default)]
pub struct BreakerPlan {
    pub breakers: Vec<CircuitBreakerSpec>,
    pub notes: Vec<String>,
}

/// Installation-wide tallies the breaker policies work from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadTally {
    pub lighting_points: u32,
    pub standard_sockets: u32,
    pub kitchen_sockets: u32,
    pub specialised_20a: u32,
    pub oven_sockets: u32,
    pub cooking_hobs: u32,
    pub vmc: Option<EquipmentKind>,
    /// Summed room area per aggregated heating kind.
    pub heating_areas: BTreeMap<EquipmentKind, f64>,
    /// (kind, room area, room id) per convector or radiator unit.
    pub individual_heating: Vec<(EquipmentKind, f64, String)>,
    /// (kind, power W) per remaining specialised unit.
    pub remaining: Vec<(EquipmentKind, f64)>,
    pub water_heaters: u32,
}

impl LoadTally {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut tally = LoadTally::default();

        for room in rooms {
            for item in room.equipment.iter().filter(|i| i.quantity > 0) {
                let kind = item.kind;
                let qty = item.quantity;

                match kind.category() {
                    EquipmentCategory::LightingPoint => {
                        tally.lighting_points = tally.lighting_points.saturating_add(qty)
                    }
                    EquipmentCategory::Socket if kind.is_normal_socket() => {
                        if room.room_type.is_kitchen() {
                            tally.kitchen_sockets = tally.kitchen_sockets.saturating_add(qty);
                        } else if room.room_type.has_standard_socket_circuits() {
                            tally.standard_sockets = tally.standard_sockets.saturating_add(qty);
                        }
                    }
                    _ => {}
                }

                if kind.is_specialised_20a() {
                    tally.specialised_20a = tally.specialised_20a.saturating_add(qty);
                } else if kind == EquipmentKind::OvenSocket {
                    tally.oven_sockets = tally.oven_sockets.saturating_add(qty);
                } else if kind == EquipmentKind::CookingHob {
                    tally.cooking_hobs = tally.cooking_hobs.saturating_add(qty);
                } else if kind.is_vmc() {
                    if tally.vmc != Some(EquipmentKind::DoubleFlowVmc) {
                        tally.vmc = Some(kind);
                    }
                } else if kind.needs_individual_heating_circuit() {
                    let area = room.area_or_zero();
                    for _ in 0..qty {
                        tally
                            .individual_heating
                            .push((kind, area, room.room_id.clone()));
                    }
                } else if kind.is_area_sized_heating() {
                    *tally.heating_areas.entry(kind).or_insert(0.0) += room.area_or_zero();
                } else if kind.is_water_heater() {
                    tally.water_heaters = tally.water_heaters.saturating_add(qty);
                } else if kind.category() == EquipmentCategory::SpecializedEquipment {
                    let power = item.declared_power_w().unwrap_or_else(|| typical_power_w(kind));
                    for _ in 0..qty {
                        tally.remaining.push((kind, power));
                    }
                }
            }
        }

        tally
    }
}

fn circuits(count: u32, per_circuit: u32) -> u32 {
    count.div_ceil(per_circuit)
}

/// Size every circuit of the installation.
pub fn plan_breakers(rooms: &[Room], occupants: Option<u32>, breaker_type: &str) -> BreakerPlan {
    let tally = LoadTally::from_rooms(rooms);
    let living = living_area(rooms);
    let mut plan = BreakerPlan::default();

    let push = |breakers: &mut Vec<CircuitBreakerSpec>,
                circuit: CircuitKind,
                rating: u32,
                description: String| {
        breakers.push(CircuitBreakerSpec {
            rating,
            breaker_type: breaker_type.to_string(),
            quantity: 1,
            description,
            circuit,
            warning: None,
        });
    };

    for idx in 1..=circuits(tally.lighting_points, LIGHTING_POINTS_PER_CIRCUIT) {
        push(
            &mut plan.breakers,
            CircuitKind::Lighting,
            16,
            format!("Disjoncteur éclairage 16A {} (max 8 points lumineux)", idx),
        );
    }

    for idx in 1..=circuits(tally.standard_sockets, SOCKETS_PER_CIRCUIT) {
        push(
            &mut plan.breakers,
            CircuitKind::StandardSockets,
            16,
            format!(
                "Disjoncteur prises classiques 16A {} (max 8 prises, section 1,5 mm²)",
                idx
            ),
        );
    }

    if tally.kitchen_sockets > 0 {
        let count = circuits(tally.kitchen_sockets, KITCHEN_SOCKETS_PER_CIRCUIT).max(1);
        for idx in 1..=count {
            push(
                &mut plan.breakers,
                CircuitKind::KitchenSockets,
                20,
                format!("Disjoncteur prises cuisine {} (max 6 prises)", idx),
            );
        }
    }

    for idx in 1..=tally.specialised_20a.max(MIN_SPECIALISED_20A_CIRCUITS) {
        push(
            &mut plan.breakers,
            CircuitKind::Specialised,
            20,
            format!("Circuit spécialisé 20A {}", idx),
        );
    }

    for idx in 1..=tally.oven_sockets {
        push(
            &mut plan.breakers,
            CircuitKind::CooktopSocket,
            32,
            format!("Circuit dédié prise plaque 32A {}", idx),
        );
    }

    if tally.oven_sockets == 0 {
        for idx in 1..=tally.cooking_hobs {
            push(
                &mut plan.breakers,
                CircuitKind::Cooktop,
                32,
                format!("Circuit dédié plaque de cuisson {}", idx),
            );
        }
    }

    if let Some(vmc) = tally.vmc {
        let double_flow = vmc == EquipmentKind::DoubleFlowVmc;
        let rating = vmc_rating(double_flow, living);
        let label = if double_flow { "Double Flux" } else { "Simple Flux" };
        push(
            &mut plan.breakers,
            CircuitKind::Ventilation,
            rating,
            format!("Circuit VMC {} - {}A", label, rating),
        );
    }

    for (kind, area) in &tally.heating_areas {
        if *area <= 0.0 {
            continue;
        }
        let Some(table) = heating_table(*kind) else {
            continue;
        };
        let (rating, exceeded) = resolve(table, *area);
        push(
            &mut plan.breakers,
            CircuitKind::Heating,
            rating,
            format!("Circuit {} - {}A", kind, rating),
        );
        if exceeded {
            tracing::warn!("{} area {:.1} m² exceeds the {} m² table limit", kind, area, top_threshold(table));
            plan.notes.push(format!(
                "Attention : la surface totale pour {} ({:.1} m²) dépasse le maximum de {} m² pour un circuit unique. Un seul disjoncteur est proposé mais une répartition sur plusieurs circuits est recommandée.",
                kind,
                area,
                top_threshold(table)
            ));
        }
    }

    // Numbered by (kind, area, room) so the labels do not follow room order.
    let mut individual = tally.individual_heating.clone();
    individual.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then_with(|| a.2.cmp(&b.2)));

    let mut unit_numbers: BTreeMap<EquipmentKind, u32> = BTreeMap::new();
    let mut large_rooms = false;
    for (kind, area, room_id) in &individual {
        let number = unit_numbers.entry(*kind).or_insert(0);
        *number += 1;

        let Some(table) = heating_table(*kind) else {
            continue;
        };
        let rating = if *area <= 0.0 {
            DEFAULT_HEATING_RATING
        } else {
            resolve(table, *area).0
        };
        let label = if *kind == EquipmentKind::Convector {
            "Convecteur"
        } else {
            "Radiateur inertie"
        };

        let top = top_threshold(table);
        let warning = (*area > top).then(|| {
            large_rooms = true;
            tracing::warn!("{} in room {} ({:.0} m²) exceeds {} m²", kind, room_id, area, top);
            format!("Superficie {:.0} m² > {:.0} m² recommandés", area, top)
        });

        plan.breakers.push(CircuitBreakerSpec {
            rating,
            breaker_type: breaker_type.to_string(),
            quantity: 1,
            description: format!("Circuit {} {} - {}A", label, number, rating),
            circuit: CircuitKind::Heating,
            warning,
        });
    }
    if let Some(n) = unit_numbers.get(&EquipmentKind::Convector) {
        plan.notes.push(format!(
            "{} circuit(s) dédié(s) pour convecteurs (un circuit par équipement)",
            n
        ));
    }
    if let Some(n) = unit_numbers.get(&EquipmentKind::InertiaRadiator) {
        plan.notes.push(format!(
            "{} circuit(s) dédié(s) pour radiateurs à inertie (un circuit par équipement)",
            n
        ));
    }
    if large_rooms {
        plan.notes.push(
            "Attention : certains équipements de chauffage sont installés dans des pièces de grande superficie. Vérifiez que la puissance est adaptée."
                .to_string(),
        );
    }

    for (kind, power) in &tally.remaining {
        let rating = power_rating(*power);
        push(
            &mut plan.breakers,
            CircuitKind::Dedicated,
            rating,
            format!("Circuit dédié {} ({}A)", kind, rating),
        );
    }

    if tally.water_heaters > 0 {
        let rating = water_heater_rating(occupants, living);
        let people = occupants.map_or_else(|| "?".to_string(), |n| n.to_string());
        for _ in 0..tally.water_heaters {
            push(
                &mut plan.breakers,
                CircuitKind::WaterHeater,
                rating,
                format!(
                    "Circuit chauffe-eau ({}A) pour {} pers. et {:.0} m²",
                    rating, people, living
                ),
            );
        }
        if occupants.is_none() {
            plan.notes.push(
                "Nombre d'occupants inconnu : chauffe-eau dimensionné par défaut en 20A".to_string(),
            );
        }
    }

    plan
}
