use super::common::*;

use crate::workflows::habitability::cases::domain::{CaseSubmission, ShareId};
use crate::workflows::habitability::cases::CaseRecord;
use crate::workflows::habitability::evaluation::{evaluate_property_at, RuleSeverity};
use crate::workflows::habitability::report::{status_label, truncate, CaseReport, DISCLAIMER};

fn stored_case(input: crate::workflows::habitability::domain::PropertyInput) -> CaseRecord {
    let (service, _, _) = build_service();
    let mut record = service
        .submit(CaseSubmission::anonymous(input.clone()))
        .expect("case stored");
    record.share_id = ShareId("0123456789abcdef".to_string());
    record.evaluation_result = evaluate_property_at(&input, fixed_timestamp());
    record
}

#[test]
fn status_labels_are_catalan() {
    assert_eq!(status_label(RuleSeverity::Pass), "APROVAT");
    assert_eq!(status_label(RuleSeverity::Risk), "RISC");
    assert_eq!(status_label(RuleSeverity::Fail), "NO APROVAT");
    assert_eq!(status_label(RuleSeverity::Unknown), "PENDENT");
}

#[test]
fn truncate_marks_cut_text() {
    assert_eq!(truncate("curt", 10), "curt");
    assert_eq!(truncate("àààààà", 3), "ààà...");
}

#[test]
fn compliant_case_report_has_no_remediation_sections() {
    let record = stored_case(compliant_flat());
    let report = CaseReport::from_record(&record);
    let text = report.render_text();

    assert_eq!(report.filename(), format!("cedula-report-{}.txt", record.id));
    assert_eq!(report.overall_label, "APROVAT");
    assert_eq!(report.rules.len(), 18);
    assert!(text.contains("  Adreça: Carrer de Mallorca 120, 3r 2a"));
    assert!(text.contains("  Superfície útil: 60 m²"));
    assert!(text.contains("  Confiança: 92%"));
    assert!(!text.contains("Pla de Correcció"));
    assert!(!text.contains("Evidència Faltant"));
    assert!(text.contains("Generat el 02/04/2025 09:30:00 UTC | Versió: 2.0.0-catalonia"));
    assert!(text.trim_end().ends_with(DISCLAIMER));
}

#[test]
fn failing_case_report_lists_fixes_and_missing_evidence() {
    let record = stored_case(bare_unit());
    let report = CaseReport::from_record(&record);
    let text = report.render_text();

    assert_eq!(report.overall_label, "NO APROVAT");
    assert!(!text.contains("Adreça:"));
    assert!(text.contains("Pla de Correcció"));
    assert!(text.contains("  1. "));
    assert!(text.contains("Evidència Faltant"));
    assert!(text.contains("  • ceilingHeight"));

    let fix_lines = text
        .lines()
        .skip_while(|line| *line != "Pla de Correcció")
        .skip(1)
        .take_while(|line| !line.is_empty());
    assert_eq!(fix_lines.count(), record.evaluation_result.fix_plan.len());
}

#[test]
fn rule_rows_use_uppercase_severity_and_short_messages() {
    let record = stored_case(bare_unit());
    let report = CaseReport::from_record(&record);

    for row in &report.rules {
        assert_eq!(row.severity_label, row.severity.label().to_ascii_uppercase());
        assert!(row.message.chars().count() <= 63);
    }
    let area = report
        .rules
        .iter()
        .find(|row| row.rule_id == "min-useful-area")
        .expect("rule row");
    assert_eq!(area.severity_label, "FAIL");
}
