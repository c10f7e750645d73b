use std::fmt::Write;

use super::super::cases::CaseRecord;
use super::super::evaluation::RuleSeverity;
use super::views::{CaseReport, PropertyFacts, RuleRow};

pub const REPORT_TITLE: &str = "Informe de Pre-validació";
pub const REPORT_SUBTITLE: &str = "Cédula de Habitabilitat - Catalunya";
pub const DISCLAIMER: &str = "Aquest és un informe de pre-validació. No substitueix la certificació oficial d'un tècnic qualificat.";

const MESSAGE_COLUMN_CHARS: usize = 60;
const FIX_LINE_CHARS: usize = 80;

/// Verdict label printed on the report.
pub const fn status_label(severity: RuleSeverity) -> &'static str {
    match severity {
        RuleSeverity::Pass => "APROVAT",
        RuleSeverity::Risk => "RISC",
        RuleSeverity::Fail => "NO APROVAT",
        RuleSeverity::Unknown => "PENDENT",
    }
}

/// Caps `text` at `max_chars` characters, appending `...` when something was cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

impl CaseReport {
    pub fn from_record(record: &CaseRecord) -> Self {
        let input = &record.property_input;
        let result = &record.evaluation_result;

        let rules = result
            .rules
            .iter()
            .map(|rule| RuleRow {
                rule_id: rule.rule_id.clone(),
                rule_name: rule.rule_name.clone(),
                severity: rule.severity,
                severity_label: rule.severity.label().to_ascii_uppercase(),
                message: truncate(&rule.message, MESSAGE_COLUMN_CHARS),
            })
            .collect();

        Self {
            case_id: record.id.clone(),
            share_id: record.share_id.clone(),
            property: PropertyFacts {
                address: input.address.clone(),
                municipality: input.municipality.clone(),
                region: input.region.clone(),
                property_type: input.property_type.label(),
                use_case: input.use_case.wire_value().to_string(),
                useful_area: input.useful_area,
            },
            overall_status: result.overall_status,
            overall_label: status_label(result.overall_status),
            confidence: result.confidence,
            rules,
            fix_plan: result.fix_plan.clone(),
            missing_evidence: result.missing_evidence.clone(),
            ruleset_version: result.ruleset_version.clone(),
            evaluated_at: result.timestamp,
            disclaimer: DISCLAIMER,
        }
    }

    /// Download name for the rendered document.
    pub fn filename(&self) -> String {
        format!("cedula-report-{}.txt", self.case_id)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{REPORT_TITLE}")?;
        writeln!(out, "{REPORT_SUBTITLE}")?;
        writeln!(out)?;

        writeln!(out, "Informació de la Propietat")?;
        if let Some(address) = &self.property.address {
            writeln!(out, "  Adreça: {address}")?;
        }
        writeln!(out, "  Municipi: {}", self.property.municipality)?;
        writeln!(out, "  Comarca: {}", self.property.region)?;
        writeln!(out, "  Tipus: {}", self.property.property_type)?;
        writeln!(out, "  Ús: {}", self.property.use_case)?;
        if let Some(area) = self.property.useful_area {
            writeln!(out, "  Superfície útil: {area} m²")?;
        }
        writeln!(out)?;

        writeln!(out, "Resultat General")?;
        writeln!(out, "  {}", self.overall_label)?;
        writeln!(out, "  Confiança: {}%", self.confidence)?;
        writeln!(out)?;

        writeln!(out, "Detall de Requisits")?;
        if self.rules.is_empty() {
            writeln!(out, "  No hi ha regles per mostrar.")?;
        }
        for row in &self.rules {
            writeln!(
                out,
                "  - {} [{}] {}",
                row.rule_name, row.severity_label, row.message
            )?;
        }

        if !self.fix_plan.is_empty() {
            writeln!(out)?;
            writeln!(out, "Pla de Correcció")?;
            for (index, fix) in self.fix_plan.iter().enumerate() {
                writeln!(out, "  {}. {}", index + 1, truncate(fix, FIX_LINE_CHARS))?;
            }
        }

        if !self.missing_evidence.is_empty() {
            writeln!(out)?;
            writeln!(out, "Evidència Faltant")?;
            for field in &self.missing_evidence {
                writeln!(out, "  • {field}")?;
            }
        }

        writeln!(out)?;
        writeln!(
            out,
            "Generat el {} | Versió: {}",
            self.evaluated_at.format("%d/%m/%Y %H:%M:%S UTC"),
            self.ruleset_version
        )?;
        writeln!(out, "{}", self.disclaimer)
    }
}
