use serde::Serialize;

use super::super::evaluation::{EvaluationEngine, EvaluationResult, RuleSeverity};
use super::super::intake::IntakeGuard;
use super::parser::ImportedProperty;

/// Verdict digest for one imported row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub overall_status: RuleSeverity,
    pub confidence: u8,
    pub failing_rules: Vec<String>,
    pub fix_plan: Vec<String>,
    pub missing_evidence: Vec<String>,
    pub ruleset_version: String,
}

impl From<EvaluationResult> for EvaluationSummary {
    fn from(result: EvaluationResult) -> Self {
        let failing_rules = result
            .rules
            .iter()
            .filter(|rule| rule.severity == RuleSeverity::Fail)
            .map(|rule| rule.rule_id.clone())
            .collect();

        Self {
            overall_status: result.overall_status,
            confidence: result.confidence,
            failing_rules,
            fix_plan: result.fix_plan,
            missing_evidence: result.missing_evidence,
            ruleset_version: result.ruleset_version,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum BatchOutcome {
    Evaluated(EvaluationSummary),
    Rejected(RejectedRow),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    pub line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Per-row results of a CSV import; a bad row never aborts the batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEvaluation {
    pub evaluated: usize,
    pub rejected: usize,
    pub rows: Vec<BatchRow>,
}

impl BatchEvaluation {
    pub fn run(
        rows: Vec<ImportedProperty>,
        guard: &IntakeGuard,
        engine: &EvaluationEngine,
    ) -> Self {
        let rows: Vec<BatchRow> = rows
            .into_iter()
            .map(|row| {
                let admitted = row
                    .input
                    .and_then(|input| guard.admit(input).map_err(|error| error.to_string()));

                match admitted {
                    Ok(input) => BatchRow {
                        line: row.line,
                        municipality: Some(input.municipality.clone()),
                        outcome: BatchOutcome::Evaluated(engine.evaluate(&input).into()),
                    },
                    Err(error) => BatchRow {
                        line: row.line,
                        municipality: None,
                        outcome: BatchOutcome::Rejected(RejectedRow { error }),
                    },
                }
            })
            .collect();

        let evaluated = rows
            .iter()
            .filter(|row| matches!(row.outcome, BatchOutcome::Evaluated(_)))
            .count();

        Self {
            evaluated,
            rejected: rows.len() - evaluated,
            rows,
        }
    }

    pub fn status_count(&self, severity: RuleSeverity) -> usize {
        self.rows
            .iter()
            .filter(|row| {
                matches!(&row.outcome, BatchOutcome::Evaluated(summary) if summary.overall_status == severity)
            })
            .count()
    }
}
