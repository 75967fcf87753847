//! Groups matcher violations by room and derives statuses.

use super::deficit::extract_missing_equipment;
use crate::model::{
    ComplianceStatus, GlobalComplianceResult, Room, RoomComplianceResult, RuleViolation,
};
use crate::rules::MatchOutcome;

/// Index of the first room (in list order) whose id occurs in the focus node.
pub fn assign_room(focus_node: Option<&str>, room_ids: &[&str]) -> Option<usize> {
    let focus = focus_node?;
    room_ids
        .iter()
        .position(|id| !id.is_empty() && focus.contains(id))
}

/// Split violations into per-room buckets (same order as `rooms`) and the
/// installation-level remainder.
pub fn split_violations(
    violations: Vec<RuleViolation>,
    rooms: &[Room],
) -> (Vec<Vec<RuleViolation>>, Vec<RuleViolation>) {
    let room_ids: Vec<&str> = rooms.iter().map(|r| r.room_id.as_str()).collect();
    let mut per_room: Vec<Vec<RuleViolation>> = vec![Vec::new(); rooms.len()];
    let mut global = Vec::new();

    for violation in violations {
        match assign_room(violation.focus_node.as_deref(), &room_ids) {
            Some(index) => per_room[index].push(violation),
            None => global.push(violation),
        }
    }

    (per_room, global)
}

/// Room and global results of one matcher run.
pub fn aggregate(
    rooms: &[Room],
    outcome: MatchOutcome,
) -> (Vec<RoomComplianceResult>, GlobalComplianceResult) {
    let (per_room, global_violations) = split_violations(outcome.violations, rooms);
    let mut summary = Vec::new();

    let room_results: Vec<RoomComplianceResult> = rooms
        .iter()
        .zip(per_room)
        .map(|(room, violations)| {
            let missing_equipment = extract_missing_equipment(&violations, &room.equipment);
            summary.extend(
                missing_equipment
                    .iter()
                    .map(|m| format!("{}: {}", room.room_id, m)),
            );
            RoomComplianceResult {
                room_id: room.room_id.clone(),
                room_type: room.room_type,
                compliance_status: ComplianceStatus::from_violations(&violations),
                violations,
                missing_equipment,
            }
        })
        .collect();

    let overall_status = if !outcome.conforms || global_violations.iter().any(RuleViolation::is_error) {
        ComplianceStatus::NonCompliant
    } else {
        ComplianceStatus::Compliant
    };

    (
        room_results,
        GlobalComplianceResult {
            overall_status,
            violations: global_violations,
            missing_equipment_summary: summary,
        },
    )
}

/// Results when no matcher outcome is available: one system violation,
/// every room `missing`.
pub fn aggregate_failure(
    rooms: &[Room],
    detail: &str,
) -> (Vec<RoomComplianceResult>, GlobalComplianceResult) {
    let room_results = rooms
        .iter()
        .map(|room| RoomComplianceResult {
            room_id: room.room_id.clone(),
            room_type: room.room_type,
            compliance_status: ComplianceStatus::Missing,
            violations: Vec::new(),
            missing_equipment: Vec::new(),
        })
        .collect();

    (
        room_results,
        GlobalComplianceResult {
            overall_status: ComplianceStatus::NonCompliant,
            violations: vec![RuleViolation::system_error(detail)],
            missing_equipment_summary: Vec::new(),
        },
    )
}
