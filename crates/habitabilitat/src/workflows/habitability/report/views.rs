use super::super::cases::{CaseId, ShareId};
use super::super::evaluation::RuleSeverity;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub municipality: String,
    pub region: String,
    pub property_type: &'static str,
    pub use_case: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub useful_area: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRow {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: RuleSeverity,
    pub severity_label: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub case_id: CaseId,
    pub share_id: ShareId,
    pub property: PropertyFacts,
    pub overall_status: RuleSeverity,
    pub overall_label: &'static str,
    pub confidence: u8,
    pub rules: Vec<RuleRow>,
    pub fix_plan: Vec<String>,
    pub missing_evidence: Vec<String>,
    pub ruleset_version: String,
    pub evaluated_at: DateTime<Utc>,
    pub disclaimer: &'static str,
}
