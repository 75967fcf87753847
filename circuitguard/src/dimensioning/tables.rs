//! Sizing tables.
//!
//! Every table is an ascending list of `(threshold, rating)` pairs resolved
//! by [`resolve`]: the first threshold greater than or equal to the value
//! wins, values beyond the last threshold take the last rating.

use crate::model::EquipmentKind;

/// `(threshold, rating in A)` pairs, thresholds ascending, never empty.
pub type RatingTable = &'static [(f64, u32)];

/// Convector: room area (m²) → rating.
pub const CONVECTOR: RatingTable = &[(63.0, 16), (65.0, 20), (75.0, 25), (90.0, 32)];
pub const INERTIA_RADIATOR: RatingTable = &[(30.0, 16), (40.0, 20), (50.0, 25), (60.0, 32)];
pub const FLOOR_HEATING: RatingTable =
    &[(20.0, 10), (40.0, 16), (50.0, 20), (60.0, 25), (80.0, 32)];
pub const DUCTED_HEAT_PUMP: RatingTable = &[(40.0, 20), (55.0, 25), (70.0, 32), (90.0, 40)];
pub const AIR_CONDITIONING: RatingTable = &[(44.0, 16), (56.0, 32), (63.0, 40)];

/// Appliance power (W) → rating.
pub const POWER_LADDER: RatingTable = &[
    (3680.0, 16),
    (4600.0, 20),
    (7360.0, 32),
    (9200.0, 40),
    (f64::INFINITY, 63),
];

/// Rating of a heating circuit whose room area is unknown or zero.
pub const DEFAULT_HEATING_RATING: u32 = 20;

/// Water heater: `(occupants up to, living area threshold m², rating up to
/// the threshold, rating above it)`.
pub const WATER_HEATER: &[(u32, f64, u32, u32)] = &[
    (2, f64::INFINITY, 16, 16),
    (3, 90.0, 16, 20),
    (4, 110.0, 20, 25),
    (u32::MAX, f64::INFINITY, 25, 25),
];

/// Water heater rating when the occupant count is unknown.
pub const DEFAULT_WATER_HEATER_RATING: u32 = 20;

/// Living area (m²) from which ventilation moves to the larger rating.
pub const VMC_LARGE_DWELLING_AREA: f64 = 120.0;

/// Départements classified as lightning-risk areas.
pub const RISK_DEPARTMENTS: &[&str] = &[
    "01", "03", "04", "05", "06", "07", "09", "11", "12", "13", "14", "15", "16", "17", "19",
    "2A", "2B", "21", "23", "24", "26", "27", "28", "30", "31", "32", "33", "34", "35", "36",
    "37", "38", "39", "40", "41", "42", "43", "44", "45", "46", "47", "48", "49", "50", "52",
    "53", "56", "57", "58", "59", "60", "61", "62", "63", "64", "65", "66", "67", "68", "69",
    "70", "71", "72", "73", "74", "79", "80", "81", "82", "83", "84", "85", "86", "87", "88",
    "89", "90",
];

/// Rating for `value` and whether it lies beyond the last threshold.
pub fn resolve(table: RatingTable, value: f64) -> (u32, bool) {
    match table.iter().find(|(threshold, _)| value <= *threshold) {
        Some(&(_, rating)) => (rating, false),
        None => (table.last().map_or(0, |&(_, rating)| rating), true),
    }
}

/// Largest threshold of a table.
pub fn top_threshold(table: RatingTable) -> f64 {
    table.last().map_or(0.0, |&(threshold, _)| threshold)
}

/// Area table of a heating kind, if it is sized by area.
pub fn heating_table(kind: EquipmentKind) -> Option<RatingTable> {
    match kind {
        EquipmentKind::Convector => Some(CONVECTOR),
        EquipmentKind::InertiaRadiator => Some(INERTIA_RADIATOR),
        EquipmentKind::FloorHeating => Some(FLOOR_HEATING),
        EquipmentKind::DuctedHeatPump => Some(DUCTED_HEAT_PUMP),
        EquipmentKind::AirConditioning => Some(AIR_CONDITIONING),
        _ => None,
    }
}

/// Rating from an appliance power in watts.
pub fn power_rating(power_w: f64) -> u32 {
    resolve(POWER_LADDER, power_w).0
}

pub fn water_heater_rating(occupants: Option<u32>, living_area: f64) -> u32 {
    let Some(occupants) = occupants else {
        return DEFAULT_WATER_HEATER_RATING;
    };
    WATER_HEATER
        .iter()
        .find(|(max_occupants, ..)| occupants <= *max_occupants)
        .map_or(DEFAULT_WATER_HEATER_RATING, |&(_, area, below, above)| {
            if living_area > area {
                above
            } else {
                below
            }
        })
}

pub fn vmc_rating(double_flow: bool, living_area: f64) -> u32 {
    let large = living_area >= VMC_LARGE_DWELLING_AREA;
    match (double_flow, large) {
        (true, true) => 10,
        (true, false) => 6,
        (false, true) => 6,
        (false, false) => 2,
    }
}

pub fn is_risk_department(code: &str) -> bool {
    RISK_DEPARTMENTS.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_first_threshold_wins() {
        assert_eq!(resolve(CONVECTOR, 50.0), (16, false));
        assert_eq!(resolve(CONVECTOR, 63.0), (16, false));
        assert_eq!(resolve(CONVECTOR, 64.0), (20, false));
        assert_eq!(resolve(CONVECTOR, 80.0), (32, false));
        assert_eq!(resolve(CONVECTOR, 100.0), (32, true));
        assert_eq!(resolve(AIR_CONDITIONING, 50.0), (32, false));
    }

    #[test]
    fn test_power_ladder() {
        assert_eq!(power_rating(2000.0), 16);
        assert_eq!(power_rating(3680.0), 16);
        assert_eq!(power_rating(4000.0), 20);
        assert_eq!(power_rating(7000.0), 32);
        assert_eq!(power_rating(9000.0), 40);
        assert_eq!(power_rating(12000.0), 63);
    }

    #[test]
    fn test_water_heater_rating() {
        assert_eq!(water_heater_rating(None, 200.0), 20);
        assert_eq!(water_heater_rating(Some(1), 200.0), 16);
        assert_eq!(water_heater_rating(Some(3), 90.0), 16);
        assert_eq!(water_heater_rating(Some(3), 95.0), 20);
        assert_eq!(water_heater_rating(Some(4), 100.0), 20);
        assert_eq!(water_heater_rating(Some(4), 111.0), 25);
        assert_eq!(water_heater_rating(Some(7), 40.0), 25);
    }

    #[test]
    fn test_vmc_rating() {
        assert_eq!(vmc_rating(true, 120.0), 10);
        assert_eq!(vmc_rating(true, 80.0), 6);
        assert_eq!(vmc_rating(false, 150.0), 6);
        assert_eq!(vmc_rating(false, 60.0), 2);
    }

    #[test]
    fn test_tables_are_ascending() {
        for table in [CONVECTOR, INERTIA_RADIATOR, FLOOR_HEATING, DUCTED_HEAT_PUMP, AIR_CONDITIONING, POWER_LADDER] {
            assert!(!table.is_empty());
            assert!(table.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn test_risk_departments() {
        assert!(is_risk_department("13"));
        assert!(is_risk_department("2A"));
        assert!(!is_risk_department("75"));
        assert!(!is_risk_department("20"));
    }
}
