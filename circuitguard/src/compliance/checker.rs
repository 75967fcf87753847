use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::aggregator::{aggregate, aggregate_failure};
use crate::model::{ComplianceReport, ComplianceStatus, DimensioningResult, Room};
use crate::rules::{Inventory, MatchOutcome, MatcherError, RuleMatcher, RuleScope};

/// Runs a rule matcher under a deadline and turns its outcome into a report.
#[derive(Clone)]
pub struct ComplianceChecker {
    matcher: Arc<dyn RuleMatcher>,
    timeout: Duration,
}

impl ComplianceChecker {
    pub fn new(matcher: Arc<dyn RuleMatcher>, timeout: Duration) -> Self {
        Self { matcher, timeout }
    }

    pub fn matcher_name(&self) -> &str {
        self.matcher.name()
    }

    /// Matcher call bounded by the configured timeout.
    pub async fn run_matcher(
        &self,
        inventory: &Inventory,
        scope: RuleScope,
    ) -> Result<MatchOutcome, MatcherError> {
        match tokio::time::timeout(self.timeout, self.matcher.evaluate(inventory, scope)).await {
            Ok(result) => result,
            Err(_) => Err(MatcherError::Timeout(self.timeout)),
        }
    }

    pub async fn check(
        &self,
        installation_id: &str,
        rooms: &[Room],
        scope: RuleScope,
    ) -> ComplianceReport {
        let inventory = Inventory::from_rooms(installation_id, rooms);
        self.evaluate(inventory, rooms, scope).await
    }

    /// Full-scope check of the installation together with its proposed
    /// dimensioning, so protection and circuit rules can see it.
    pub async fn check_dimensioned(
        &self,
        installation_id: &str,
        rooms: &[Room],
        postal_code: Option<&str>,
        dimensioning: &DimensioningResult,
    ) -> ComplianceReport {
        let inventory = Inventory::from_rooms(installation_id, rooms)
            .with_dimensioning(postal_code, dimensioning);
        self.evaluate(inventory, rooms, RuleScope::Full).await
    }

    async fn evaluate(
        &self,
        inventory: Inventory,
        rooms: &[Room],
        scope: RuleScope,
    ) -> ComplianceReport {
        let installation_id = inventory.installation_id.as_str();
        let (room_results, global_compliance, matcher_error) =
            match self.run_matcher(&inventory, scope).await {
                Ok(outcome) => {
                    tracing::debug!(
                        "Matcher '{}' returned {} violations (conforms: {})",
                        self.matcher.name(),
                        outcome.violations.len(),
                        outcome.conforms
                    );
                    let (rooms_out, global) = aggregate(rooms, outcome);
                    (rooms_out, global, None)
                }
                Err(e) => {
                    tracing::warn!("Rule matcher '{}' failed: {}", self.matcher.name(), e);
                    let detail = e.to_string();
                    let (rooms_out, global) = aggregate_failure(rooms, &detail);
                    (rooms_out, global, Some(detail))
                }
            };

        let report = ComplianceReport {
            installation_id: installation_id.to_string(),
            global_compliance,
            room_results,
            timestamp: Utc::now(),
            matcher_error,
        };

        tracing::info!(
            "Compliance check for '{}': {} ({} rooms, {} violations)",
            installation_id,
            report.global_compliance.overall_status.as_str(),
            report.room_results.len(),
            report.all_violations().count()
        );
        if report.global_compliance.overall_status == ComplianceStatus::NonCompliant {
            tracing::debug!(
                "Missing equipment: {:?}",
                report.global_compliance.missing_equipment_summary
            );
        }

        report
    }
}
