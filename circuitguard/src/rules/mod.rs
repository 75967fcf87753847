//! Rule Matcher
//!
//! The compliance path delegates rule evaluation to a [`RuleMatcher`]. The
//! crate ships the built-in [`RulesEngine`] and an HTTP adapter for a remote
//! matcher service; callers may plug in their own.

pub mod builtin;
pub mod http;
pub mod inventory;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::RuleViolation;

pub use builtin::{
    InstallationMinimumRule, LightingCircuitRule, MinimumCountRule,
    NetworkSocketRecommendationRule, RequiredCount, Rule, RulesEngine, SurgeProtectionRule,
};
pub use http::HttpRuleMatcher;
pub use inventory::{room_focus, DimensioningSummary, Inventory, InventoryLine, RoomInventory};

/// Which rules a matcher run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Room equipment rules only; dimensioning-only rules are excluded.
    RoomEquipment,
    /// Every rule, including installation-level dimensioning rules.
    Full,
}

impl RuleScope {
    /// Whether a rule declared with `rule_scope` runs under this scope.
    pub fn includes(&self, rule_scope: RuleScope) -> bool {
        match self {
            RuleScope::Full => true,
            RuleScope::RoomEquipment => rule_scope == RuleScope::RoomEquipment,
        }
    }
}

/// Raw matcher output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub conforms: bool,
    pub violations: Vec<RuleViolation>,
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Rule matcher unavailable: {0}")]
    Unavailable(String),
    #[error("Rule matcher timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid rule matcher response: {0}")]
    InvalidResponse(String),
    #[error("Rule matcher request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Evaluates the rule set against a normalized inventory. Implementations
/// must be deterministic for identical input.
#[async_trait]
pub trait RuleMatcher: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(
        &self,
        inventory: &Inventory,
        scope: RuleScope,
    ) -> Result<MatchOutcome, MatcherError>;
}
