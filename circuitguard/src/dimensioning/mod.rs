//! Dimensioning Module
//!
//! Derives the bill of materials of an installation: circuit breakers,
//! surge protection, panel capacity and cable runs. Everything here is a
//! pure function of the rooms, the postal code and the occupant count.

pub mod breakers;
pub mod cables;
pub mod panel;
pub mod tables;

pub use breakers::{plan_breakers, BreakerPlan, LoadTally};
pub use cables::{estimate_cables, CableAggregator};
pub use panel::{
    department_code, electrical_panel, panel_modules, surge_protection_required, surge_protectors,
};
pub use tables::{resolve, RatingTable};

use crate::model::{ComplianceStatus, DimensioningResult, Room};

pub const DEFAULT_BREAKER_TYPE: &str = "Type C";

/// Notes attached to every dimensioning result.
pub const GENERIC_NOTES: [&str; 5] = [
    "Tous les circuits doivent être protégés par un DDR 30 mA",
    "Sections des conducteurs : 1,5 mm² pour l'éclairage et les prises classiques 16A, 2,5 mm² minimum pour les circuits cuisine",
    "Les circuits dédiés de la cuisine nécessitent une protection 20 A",
    "Les circuits de la salle de bains nécessitent des indices de protection IP adaptés",
    "Les équipements spécialisés doivent avoir un circuit dédié",
];

pub const FIX_NON_CONFORMITIES_NOTE: &str = "Corrigez les non-conformités avant l'installation";

#[derive(Debug, Clone)]
pub struct Dimensioner {
    breaker_type: String,
}

impl Dimensioner {
    pub fn new(breaker_type: impl Into<String>) -> Self {
        Self {
            breaker_type: breaker_type.into(),
        }
    }

    pub fn breaker_type(&self) -> &str {
        &self.breaker_type
    }

    /// `compliance` only decides whether the fix-first note is added.
    pub fn dimension(
        &self,
        rooms: &[Room],
        postal_code: Option<&str>,
        occupants: Option<u32>,
        compliance: ComplianceStatus,
    ) -> DimensioningResult {
        let BreakerPlan { breakers, mut notes } = plan_breakers(rooms, occupants, &self.breaker_type);
        let breaker_count: u32 = breakers.iter().map(|b| b.quantity).sum();

        let surge_protectors = surge_protectors(postal_code);
        let electrical_panels = vec![electrical_panel(breaker_count)];
        let cables = estimate_cables(rooms);

        notes.extend(GENERIC_NOTES.iter().map(|n| n.to_string()));
        if compliance != ComplianceStatus::Compliant {
            notes.push(FIX_NON_CONFORMITIES_NOTE.to_string());
        }

        tracing::info!(
            "Dimensioned {} rooms: {} breakers, {} panel modules, {} cable runs, surge protection {}",
            rooms.len(),
            breaker_count,
            electrical_panels[0].modules,
            cables.len(),
            if surge_protectors.is_empty() { "not required" } else { "required" }
        );

        DimensioningResult {
            circuit_breakers: breakers,
            surge_protectors,
            electrical_panels,
            cables,
            installation_notes: notes,
        }
    }
}

impl Default for Dimensioner {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKER_TYPE)
    }
}
