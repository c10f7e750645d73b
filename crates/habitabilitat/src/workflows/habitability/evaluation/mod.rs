mod catalog;
mod policy;
mod rules;

pub use catalog::{catalog, Rule, RuleSummary, RULESET_VERSION};

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PropertyInput;

/// Per-rule and overall verdict.
///
/// Aggregation is worst-case: `fail` > `risk` > `unknown` > `pass`. `unknown` means the input
/// lacked the evidence to judge and is never folded into `pass` or `fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Pass,
    Risk,
    Fail,
    Unknown,
}

impl RuleSeverity {
    /// Position in the aggregation lattice; higher wins.
    pub const fn rank(self) -> u8 {
        match self {
            RuleSeverity::Pass => 0,
            RuleSeverity::Unknown => 1,
            RuleSeverity::Risk => 2,
            RuleSeverity::Fail => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RuleSeverity::Pass => "pass",
            RuleSeverity::Risk => "risk",
            RuleSeverity::Fail => "fail",
            RuleSeverity::Unknown => "unknown",
        }
    }

    /// Whether the rule contributes an entry to the fix plan.
    pub const fn needs_remediation(self) -> bool {
        matches!(self, RuleSeverity::Fail | RuleSeverity::Risk)
    }
}

impl PartialOrd for RuleSeverity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RuleSeverity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// What a single rule concludes about one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub severity: RuleSeverity,
    pub message: String,
    pub explanation: String,
    pub fix_guidance: Option<String>,
    pub confidence: u8,
}

impl RuleOutcome {
    pub(crate) fn new(
        severity: RuleSeverity,
        confidence: u8,
        message: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        debug_assert!(confidence <= 100, "rule confidence out of range");
        Self {
            severity,
            message: message.into(),
            explanation: explanation.into(),
            fix_guidance: None,
            confidence,
        }
    }

    pub(crate) fn pass(
        confidence: u8,
        message: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self::new(RuleSeverity::Pass, confidence, message, explanation)
    }

    pub(crate) fn risk(
        confidence: u8,
        message: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self::new(RuleSeverity::Risk, confidence, message, explanation)
    }

    pub(crate) fn fail(
        confidence: u8,
        message: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self::new(RuleSeverity::Fail, confidence, message, explanation)
    }

    /// Insufficient evidence; always carries confidence 0.
    pub(crate) fn unknown(message: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(RuleSeverity::Unknown, 0, message, explanation)
    }

    pub(crate) fn with_fix(mut self, guidance: impl Into<String>) -> Self {
        self.fix_guidance = Some(guidance.into());
        self
    }
}

/// Rule outcome joined with the rule identity and the evidence it actually read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: RuleSeverity,
    pub message: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_guidance: Option<String>,
    pub evidence_used: Vec<String>,
    pub confidence: u8,
}

/// Immutable snapshot produced by one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub overall_status: RuleSeverity,
    pub confidence: u8,
    pub rules: Vec<RuleResult>,
    pub missing_evidence: Vec<String>,
    pub fix_plan: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub ruleset_version: String,
}

impl EvaluationResult {
    pub fn rule(&self, rule_id: &str) -> Option<&RuleResult> {
        self.rules.iter().find(|rule| rule.rule_id == rule_id)
    }

    pub fn count(&self, severity: RuleSeverity) -> usize {
        self.rules
            .iter()
            .filter(|rule| rule.severity == severity)
            .count()
    }

    /// Whether this snapshot was produced by the catalog compiled into this build.
    pub fn is_current_ruleset(&self) -> bool {
        self.ruleset_version == RULESET_VERSION
    }
}

/// Runs a fixed, ordered rule catalog and folds the outcomes into one result.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationEngine {
    rules: &'static [Rule],
    ruleset_version: &'static str,
}

impl EvaluationEngine {
    /// The Catalan habitability catalog at [`RULESET_VERSION`].
    pub fn catalonia() -> Self {
        Self::with_rules(catalog(), RULESET_VERSION)
    }

    pub fn with_rules(rules: &'static [Rule], ruleset_version: &'static str) -> Self {
        Self {
            rules,
            ruleset_version,
        }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub fn ruleset_version(&self) -> &'static str {
        self.ruleset_version
    }

    pub fn evaluate(&self, input: &PropertyInput) -> EvaluationResult {
        self.evaluate_at(input, Utc::now())
    }

    /// Same as [`Self::evaluate`] with a caller-supplied timestamp.
    pub fn evaluate_at(&self, input: &PropertyInput, timestamp: DateTime<Utc>) -> EvaluationResult {
        let results: Vec<RuleResult> = self
            .rules
            .iter()
            .map(|rule| {
                let outcome = rule.evaluate(input);
                RuleResult {
                    rule_id: rule.id.to_string(),
                    rule_name: rule.name.to_string(),
                    severity: outcome.severity,
                    message: outcome.message,
                    explanation: outcome.explanation,
                    fix_guidance: outcome.fix_guidance,
                    evidence_used: rule.evidence_used(input),
                    confidence: outcome.confidence,
                }
            })
            .collect();

        EvaluationResult {
            overall_status: policy::overall_status(&results),
            confidence: policy::overall_confidence(&results),
            missing_evidence: policy::missing_evidence(self.rules, input),
            fix_plan: policy::fix_plan(&results),
            rules: results,
            timestamp,
            ruleset_version: self.ruleset_version.to_string(),
        }
    }
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::catalonia()
    }
}

/// Evaluates `input` against the current Catalan catalog.
pub fn evaluate_property(input: &PropertyInput) -> EvaluationResult {
    EvaluationEngine::catalonia().evaluate(input)
}

pub fn evaluate_property_at(input: &PropertyInput, timestamp: DateTime<Utc>) -> EvaluationResult {
    EvaluationEngine::catalonia().evaluate_at(input, timestamp)
}
