//! Panel capacity and surge protection.

use super::tables::is_risk_department;
use crate::model::{ElectricalPanelSpec, SurgeProtectorSpec};

/// Smallest standard enclosure.
pub const MIN_PANEL_MODULES: u32 = 13;

/// `max(13, ceil(breakers / 0.8))`, computed in integers.
pub fn panel_modules(breaker_count: u32) -> u32 {
    let with_reserve = breaker_count.saturating_mul(5).div_ceil(4);
    with_reserve.max(MIN_PANEL_MODULES)
}

pub fn electrical_panel(breaker_count: u32) -> ElectricalPanelSpec {
    let modules = panel_modules(breaker_count);
    ElectricalPanelSpec {
        panel_type: "Tableau électrique".to_string(),
        modules,
        quantity: 1,
        description: format!(
            "Tableau électrique principal avec {} modules (NF C 15-100: 20% réserve minimum)",
            modules
        ),
    }
}

/// Département of a French postal code. `None` unless the code is exactly
/// five ASCII digits; Corsica ("20") splits into 2A (20000-20199) and 2B.
pub fn department_code(postal_code: &str) -> Option<String> {
    let code = postal_code.trim();
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let department = &code[..2];
    if department == "20" {
        let rest: u32 = code[2..].parse().ok()?;
        return Some(if rest < 200 { "2A" } else { "2B" }.to_string());
    }
    Some(department.to_string())
}

/// Surge protection is required unless the postal code resolves to a
/// département outside the risk set.
pub fn surge_protection_required(postal_code: Option<&str>) -> bool {
    match postal_code.map(department_code) {
        Some(Some(department)) => is_risk_department(&department),
        Some(None) => {
            tracing::debug!("Unparsable postal code, surge protection kept");
            true
        }
        None => true,
    }
}

pub fn surge_protectors(postal_code: Option<&str>) -> Vec<SurgeProtectorSpec> {
    if !surge_protection_required(postal_code) {
        return Vec::new();
    }
    vec![SurgeProtectorSpec {
        spd_type: "Parafoudre Type 2".to_string(),
        rating: Some("10kA".to_string()),
        quantity: 1,
        description: "Parafoudre du tableau électrique principal".to_string(),
    }]
}
