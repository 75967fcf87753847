//! Dimensioning properties over generated installations

use circuitguard::dimensioning::{estimate_cables, panel_modules, plan_breakers};
use circuitguard::prelude::*;
use circuitguard::Dimensioner;

/// A varied house: every room type, a spread of equipment and areas.
fn house() -> Vec<Room> {
    use EquipmentKind::*;

    vec![
        Room::new("kitchen", RoomType::Kitchen)
            .with_area(11.0)
            .with_equipment(EquipmentItem::new(DoubleSocket, 4))
            .with_equipment(EquipmentItem::new(OvenSocket, 1))
            .with_equipment(EquipmentItem::new(Dishwasher, 1))
            .with_equipment(EquipmentItem::new(CeilingLighting, 2)),
        Room::new("living", RoomType::LivingRoom)
            .with_area(32.0)
            .with_equipment(EquipmentItem::new(SimpleSocket, 9))
            .with_equipment(EquipmentItem::new(TvSocket, 1))
            .with_equipment(EquipmentItem::new(CoaxSocket, 1))
            .with_equipment(EquipmentItem::new(FloorHeating, 1)),
        Room::new("bedroom-1", RoomType::Bedroom)
            .with_area(14.0)
            .with_equipment(EquipmentItem::new(SimpleSocket, 4))
            .with_equipment(EquipmentItem::new(Rj45Socket, 1))
            .with_equipment(EquipmentItem::new(InertiaRadiator, 1)),
        Room::new("bedroom-2", RoomType::Bedroom)
            .with_area(60.0)
            .with_equipment(EquipmentItem::new(SimpleSocket, 3))
            .with_equipment(EquipmentItem::new(InertiaRadiator, 1)),
        Room::new("bathroom", RoomType::BathroomWithWc)
            .with_area(6.0)
            .with_equipment(EquipmentItem::new(WaterproofSocket, 1))
            .with_equipment(EquipmentItem::new(WashingMachine, 1))
            .with_equipment(EquipmentItem::new(StorageWaterHeater, 1)),
        Room::new("hall", RoomType::CirculationArea)
            .with_area(7.0)
            .with_equipment(EquipmentItem::new(SpotLighting, 3)),
        Room::new("garden", RoomType::ExteriorSpace)
            .with_area(40.0)
            .with_equipment(EquipmentItem::new(ExteriorLighting, 2))
            .with_equipment(EquipmentItem::new(AlarmSystem, 1).with_spec("power_w", 300)),
        Room::new("attic", RoomType::Other)
            .with_equipment(EquipmentItem::new(DoubleFlowVmc, 1)),
    ]
}

fn rotations(rooms: &[Room]) -> Vec<Vec<Room>> {
    (0..rooms.len())
        .map(|shift| {
            let mut rotated = rooms.to_vec();
            rotated.rotate_left(shift);
            rotated
        })
        .chain(std::iter::once(rooms.iter().rev().cloned().collect()))
        .collect()
}

#[test]
fn test_cables_do_not_depend_on_room_order() {
    let reference = estimate_cables(&house());
    assert!(!reference.is_empty());

    for rooms in rotations(&house()) {
        assert_eq!(estimate_cables(&rooms), reference);
    }
}

/// Breakers as a sorted (rating, description) multiset.
fn breaker_multiset(rooms: &[Room]) -> Vec<(u32, String)> {
    let mut breakers: Vec<(u32, String)> = plan_breakers(rooms, Some(4), "Type C")
        .breakers
        .into_iter()
        .map(|b| (b.rating, b.description))
        .collect();
    breakers.sort();
    breakers
}

#[test]
fn test_breakers_do_not_depend_on_room_order() {
    let reference = breaker_multiset(&house());
    assert!(reference.len() > 3);
    for rooms in rotations(&house()) {
        assert_eq!(breaker_multiset(&rooms), reference);
    }
}

#[test]
fn test_panel_modules_formula() {
    for n in 0..500u32 {
        let modules = panel_modules(n);
        assert!(modules >= 13);
        assert_eq!(modules, ((n as f64) / 0.8).ceil().max(13.0) as u32, "{n} breakers");
    }
}

#[test]
fn test_panel_follows_breaker_count() {
    let result = Dimensioner::default().dimension(&house(), Some("31000"), Some(4), ComplianceStatus::Compliant);
    let breakers = result.breaker_count();
    assert_eq!(result.electrical_panels.len(), 1);
    assert_eq!(result.electrical_panels[0].modules, panel_modules(breakers));
    assert!(result.surge_protection_required());
}

#[test]
fn test_specialised_floor_is_the_only_breakers_of_an_empty_installation() {
    let empty = vec![
        Room::new("attic", RoomType::Other).with_area(12.0),
        Room::new("terrace", RoomType::ExteriorSpace)
            .with_area(10.0)
            .with_equipment(EquipmentItem::new(EquipmentKind::SimpleSocket, 0)),
    ];
    let plan = plan_breakers(&empty, None, "Type C");
    assert_eq!(plan.breakers.len(), 3);
    assert!(plan
        .breakers
        .iter()
        .all(|b| b.description.starts_with("Circuit spécialisé 20A")));
}

#[test]
fn test_house_circuits() {
    let plan = plan_breakers(&house(), Some(4), "Type C");
    let find = |prefix: &str| {
        plan.breakers
            .iter()
            .filter(|b| b.description.starts_with(prefix))
            .map(|b| b.rating)
            .collect::<Vec<_>>()
    };

    // kitchen double sockets count once per unit
    assert_eq!(find("Disjoncteur prises cuisine"), vec![20]);
    // dishwasher + washing machine, raised to the floor of 3
    assert_eq!(find("Circuit spécialisé 20A").len(), 3);
    assert_eq!(find("Circuit dédié prise plaque"), vec![32]);
    assert_eq!(find("Circuit Radiateur inertie 1"), vec![16]);
    assert_eq!(find("Circuit Radiateur inertie 2"), vec![32]);
    assert_eq!(find("Circuit dédié AlarmSystem"), vec![16]);
    assert_eq!(find("Circuit VMC Double Flux").len(), 1);
    assert_eq!(find("Circuit chauffe-eau").len(), 1);
    assert!(plan.breakers.iter().all(|b| b.quantity == 1));
}

#[test]
fn test_breaker_type_from_config() {
    let guard = CircuitGuard::new(EngineConfig {
        breaker_type: "Type B".to_string(),
        ..EngineConfig::default()
    });
    let result = guard
        .dimension(&InstallationRequest::new("b", house()).with_occupants(4))
        .unwrap();
    assert!(result.circuit_breakers.iter().all(|b| b.breaker_type == "Type B"));
}

#[test]
fn test_dimensioning_report_serializes_flat() {
    let result = Dimensioner::default().dimension(&house(), None, None, ComplianceStatus::Warning);
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["circuit_breakers"].as_array().unwrap().iter().all(|b| b["type"] == "Type C"));
    assert_eq!(json["surge_protectors"][0]["type"], "Parafoudre Type 2");
    assert!(json["cables"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["type"] == "Coaxial RG6" && c["section"] == 0.0));
}
