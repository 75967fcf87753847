//! HTTP Rule Matcher
//!
//! Delegates rule evaluation to a remote matcher service that answers with
//! constraint-validation style reports (`conforms` plus violations carrying a
//! focus node, a message and a severity URI).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::inventory::Inventory;
use super::{MatchOutcome, MatcherError, RuleMatcher, RuleScope};
use crate::model::{EquipmentRequirement, RuleViolation, Severity, ViolationType};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for a remote rule matcher service.
pub struct HttpRuleMatcher {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    inventory: &'a Inventory,
    scope: RuleScope,
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    conforms: bool,
    #[serde(default)]
    violations: Vec<RawViolation>,
}

#[derive(Debug, Deserialize)]
struct RawViolation {
    #[serde(default)]
    focus_node: Option<String>,
    message: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default, alias = "result_path")]
    path: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    suggested_fix: Option<String>,
    #[serde(default)]
    requirement: Option<EquipmentRequirement>,
}

impl HttpRuleMatcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RuleMatcher for HttpRuleMatcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn evaluate(
        &self,
        inventory: &Inventory,
        scope: RuleScope,
    ) -> Result<MatchOutcome, MatcherError> {
        let url = format!("{}/match", self.base_url);
        tracing::debug!("POST {} ({} rooms, scope {:?})", url, inventory.rooms.len(), scope);

        let response = self
            .client
            .post(&url)
            .json(&MatchRequest { inventory, scope })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MatcherError::Unavailable(format!(
                "{} returned HTTP {}",
                url,
                response.status().as_u16()
            )));
        }

        let body: MatchResponse = response
            .json()
            .await
            .map_err(|e| MatcherError::InvalidResponse(e.to_string()))?;

        Ok(MatchOutcome {
            conforms: body.conforms,
            violations: body.violations.into_iter().map(into_violation).collect(),
        })
    }
}

fn into_violation(raw: RawViolation) -> RuleViolation {
    let severity = raw
        .severity
        .as_deref()
        .map(severity_from_uri)
        .unwrap_or(Severity::Error);
    let rule_id = raw
        .rule_id
        .unwrap_or_else(|| rule_id_for_focus(raw.focus_node.as_deref().unwrap_or("")).to_string());

    let mut violation = RuleViolation::new(rule_id, severity, raw.message).with_type(ViolationType::Installation);
    violation.focus_node = raw.focus_node;
    violation.path = raw.path;
    violation.value = raw.value.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    violation.suggested_fix = raw.suggested_fix;
    violation.requirement = raw.requirement;
    violation
}

/// Severity from a severity URI (`...#Violation`, `...#Warning`, ...).
pub fn severity_from_uri(uri: &str) -> Severity {
    if uri.contains("Violation") || uri.contains("Error") {
        Severity::Error
    } else if uri.contains("Warning") {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Rule id for violations reported without one.
pub fn rule_id_for_focus(focus_node: &str) -> &'static str {
    if focus_node.contains("Kitchen") {
        "NFC-15-100-KITCHEN-001"
    } else if focus_node.contains("Socket") {
        "NFC-15-100-SOCKET-001"
    } else {
        "NFC-15-100-GENERIC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeficitCategory, Room, RoomType};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn inventory() -> Inventory {
        Inventory::from_rooms("h1", &[Room::new("Kitchen1", RoomType::Kitchen)])
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity_from_uri("http://www.w3.org/ns/shacl#Violation"), Severity::Error);
        assert_eq!(severity_from_uri("sh:Warning"), Severity::Warning);
        assert_eq!(severity_from_uri("sh:Info"), Severity::Info);
    }

    #[test]
    fn test_rule_id_from_focus() {
        assert_eq!(rule_id_for_focus("http://x/Kitchen_1"), "NFC-15-100-KITCHEN-001");
        assert_eq!(rule_id_for_focus("http://x/SimpleSocket_4"), "NFC-15-100-SOCKET-001");
        assert_eq!(rule_id_for_focus("room:bed1"), "NFC-15-100-GENERIC");
    }

    #[tokio::test]
    async fn test_remote_report_is_mapped() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "conforms": false,
            "violations": [
                {
                    "focus_node": "http://x/Kitchen1",
                    "message": "La cuisine doit comporter au moins 6 prises 2P+T (actuellement 0)",
                    "severity": "http://www.w3.org/ns/shacl#Violation",
                    "result_path": "nfc:hasEquipment",
                    "value": 0
                },
                {
                    "message": "Recommandation",
                    "severity": "http://www.w3.org/ns/shacl#Info",
                    "requirement": {"category": "network_socket", "required": 1, "current": 0}
                }
            ]
        });
        Mock::given(method("POST"))
            .and(path("/match"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let matcher = HttpRuleMatcher::new(format!("{}/", server.uri()));
        let outcome = matcher.evaluate(&inventory(), RuleScope::Full).await.unwrap();

        assert!(!outcome.conforms);
        assert_eq!(outcome.violations.len(), 2);

        let first = &outcome.violations[0];
        assert_eq!(first.rule_id, "NFC-15-100-KITCHEN-001");
        assert_eq!(first.severity, Severity::Error);
        assert_eq!(first.path.as_deref(), Some("nfc:hasEquipment"));
        assert_eq!(first.value.as_deref(), Some("0"));

        let second = &outcome.violations[1];
        assert_eq!(second.rule_id, "NFC-15-100-GENERIC");
        assert_eq!(second.severity, Severity::Info);
        assert_eq!(
            second.requirement.map(|r| r.category),
            Some(DeficitCategory::NetworkSocket)
        );
    }

    #[tokio::test]
    async fn test_http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let matcher = HttpRuleMatcher::new(server.uri());
        let err = matcher
            .evaluate(&inventory(), RuleScope::RoomEquipment)
            .await
            .unwrap_err();
        assert!(matches!(err, MatcherError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let matcher = HttpRuleMatcher::new(server.uri());
        let err = matcher
            .evaluate(&inventory(), RuleScope::RoomEquipment)
            .await
            .unwrap_err();
        assert!(matches!(err, MatcherError::InvalidResponse(_)));
    }
}
