use super::super::domain::PropertyInput;
use super::catalog::Rule;
use super::{RuleResult, RuleSeverity};

/// Worst severity across all rules; an empty catalog has nothing to object to.
pub(crate) fn overall_status(results: &[RuleResult]) -> RuleSeverity {
    results
        .iter()
        .map(|result| result.severity)
        .max()
        .unwrap_or(RuleSeverity::Pass)
}

/// Rounded arithmetic mean of per-rule confidences, `unknown` rules (confidence 0) included.
pub(crate) fn overall_confidence(results: &[RuleResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }

    let total: u32 = results.iter().map(|result| u32::from(result.confidence)).sum();
    let mean = f64::from(total) / results.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

/// Evidence fields some rule needed but the input lacked, first-seen order, no duplicates.
pub(crate) fn missing_evidence(rules: &[Rule], input: &PropertyInput) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();

    for field in rules.iter().flat_map(|rule| rule.evidence_needed.iter()) {
        if field.is_present(input) {
            continue;
        }

        let name = field.name();
        if !missing.iter().any(|seen| seen == name) {
            missing.push(name.to_string());
        }
    }

    missing
}

/// One remediation line per failing or risky rule, in catalog order.
pub(crate) fn fix_plan(results: &[RuleResult]) -> Vec<String> {
    results
        .iter()
        .filter(|result| result.severity.needs_remediation())
        .map(|result| match result.fix_guidance.as_deref() {
            Some(guidance) if !guidance.trim().is_empty() => guidance.to_string(),
            _ => result.message.clone(),
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}
