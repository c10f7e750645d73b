use crate::infra::{
    InMemoryCaseRepository, InMemoryEvidenceRepository, InMemoryTemplateRepository,
};
use chrono::{Duration, Utc};
use clap::Args;
use habitabilitat::error::AppError;
use habitabilitat::workflows::habitability::cases::{
    CaseStatus, CaseSubmission, CaseUpdate, EvidenceUpload, TemplateDraft, TemplateLibrary,
    TemplateScope,
};
use habitabilitat::workflows::habitability::evaluation::{EvaluationEngine, EvaluationResult};
use habitabilitat::workflows::habitability::import::{BatchEvaluation, BatchOutcome};
use habitabilitat::workflows::habitability::report::status_label;
use habitabilitat::workflows::habitability::{
    CaseReport, HabitabilityCaseService, IntakeGuard, PropertyCsvImporter, PropertyInput,
    PropertyType, UseCase,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[command(flatten)]
    pub(crate) source: EvaluateSource,
    /// Print the full evaluation as JSON instead of a summary
    #[arg(long)]
    pub(crate) emit_json: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct EvaluateSource {
    /// Property description as a camelCase JSON object
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
    /// CSV with one property per row and camelCase headers
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip printing the plain-text report at the end of the walkthrough.
    #[arg(long)]
    pub(crate) skip_report: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { source, emit_json } = args;
    let guard = IntakeGuard::default();
    let engine = EvaluationEngine::catalonia();

    if let Some(path) = source.csv {
        let rows = PropertyCsvImporter::from_path(&path)?;
        let batch = BatchEvaluation::run(rows, &guard, &engine);
        if emit_json {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        } else {
            render_batch(&batch);
        }
        return Ok(());
    }

    let Some(path) = source.json else {
        return Ok(());
    };
    let raw = std::fs::read_to_string(&path)?;
    let input: PropertyInput = serde_json::from_str(&raw)?;
    let input = match guard.admit(input) {
        Ok(input) => input,
        Err(err) => {
            println!("Input rejected: {}", err);
            return Ok(());
        }
    };

    let result = engine.evaluate(&input);
    if emit_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} ({})", input.municipality, input.region);
        render_result(&result);
    }
    Ok(())
}

pub(crate) fn run_ruleset() {
    let engine = EvaluationEngine::catalonia();
    println!(
        "Ruleset {} ({} rules)",
        engine.ruleset_version(),
        engine.rules().len()
    );
    for (index, rule) in engine.rules().iter().enumerate() {
        let summary = rule.summary();
        println!("{:>2}. {} | {}", index + 1, summary.id, summary.name);
        println!("    {}", summary.description);
        println!("    evidence: {}", summary.evidence_needed.join(", "));
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let cases = Arc::new(InMemoryCaseRepository::default());
    let evidence = Arc::new(InMemoryEvidenceRepository::default());
    let service = HabitabilityCaseService::new(cases, evidence);
    let templates = TemplateLibrary::new(Arc::new(InMemoryTemplateRepository::default()));

    println!("Cédula de habitabilitat pre-validation demo");
    println!(
        "Ruleset {} ({} rules)",
        service.engine().ruleset_version(),
        service.engine().rules().len()
    );

    let mut opened = Vec::new();
    for (owner, input) in demo_properties() {
        let submission = CaseSubmission {
            property_input: input,
            user_id: Some(owner.to_string()),
            team_id: Some("equip-demo".to_string()),
        };
        match service.submit(submission) {
            Ok(record) => {
                println!(
                    "\n- Case {} | {} | share {}",
                    record.id, record.property_input.municipality, record.share_id
                );
                render_result(&record.evaluation_result);
                opened.push(record);
            }
            Err(err) => println!("\n- Submission rejected: {}", err),
        }
    }

    let Some(flagged) = opened
        .iter()
        .max_by_key(|record| record.overall_status())
        .cloned()
    else {
        return Ok(());
    };

    println!("\nPipeline for case {}", flagged.id);
    let update = CaseUpdate {
        status: Some(CaseStatus::Scheduled),
        assigned_to: Some(Some("tècnic-demo".to_string())),
        scheduled_date: Some(Some(Utc::now() + Duration::days(7))),
        tags: Some(Some(vec!["visita".to_string(), "prioritari".to_string()])),
        actor: Some("gestor-demo".to_string()),
        ..CaseUpdate::default()
    };
    match service.update(&flagged.id, update) {
        Ok(record) => println!(
            "  status {} (by {}) | assigned to {}",
            record.status.label(),
            record.status_updated_by.as_deref().unwrap_or("-"),
            record.assigned_to.as_deref().unwrap_or("-")
        ),
        Err(err) => println!("  Update rejected: {}", err),
    }

    let upload = EvidenceUpload {
        original_filename: "façana principal.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        size: 512_000,
        uploaded_by: "tècnic-demo".to_string(),
        kind: None,
        description: Some("Façana i accés".to_string()),
        storage_key: None,
    };
    match service.attach_evidence(&flagged.id, upload) {
        Ok(record) => println!("  evidence {} stored as {}", record.original_filename, record.url),
        Err(err) => println!("  Evidence rejected: {}", err),
    }

    match service.reevaluate(&flagged.id) {
        Ok(record) => println!(
            "  re-evaluated with {} | {} previous result(s) kept",
            record.evaluation_result.ruleset_version,
            record.evaluation_history.len()
        ),
        Err(err) => println!("  Re-evaluation unavailable: {}", err),
    }

    let draft = TemplateDraft {
        name: "Pis tipus Eixample".to_string(),
        description: Some("Segona ocupació, 3 habitacions".to_string()),
        property_input: flagged.property_input.clone(),
        created_by: "gestor-demo".to_string(),
        team_id: Some("equip-demo".to_string()),
        is_public: false,
    };
    match templates.create(draft) {
        Ok(template) => {
            let team = templates
                .list(&TemplateScope::Team("equip-demo".to_string()))
                .map(|templates| templates.len())
                .unwrap_or_default();
            println!(
                "  template '{}' saved | {} team template(s)",
                template.name, team
            );
        }
        Err(err) => println!("  Template rejected: {}", err),
    }

    if args.skip_report {
        return Ok(());
    }

    match service.get(&flagged.id) {
        Ok(record) => {
            let report = CaseReport::from_record(&record);
            println!("\n{}\n", report.filename());
            print!("{}", report.render_text());
        }
        Err(err) => println!("  Report unavailable: {}", err),
    }

    Ok(())
}

fn render_result(result: &EvaluationResult) {
    println!(
        "  {} | confiança {}% | {} regles",
        status_label(result.overall_status),
        result.confidence,
        result.rules.len()
    );
    for fix in &result.fix_plan {
        println!("    * {}", fix);
    }
    if !result.missing_evidence.is_empty() {
        println!("    falta: {}", result.missing_evidence.join(", "));
    }
}

fn render_batch(batch: &BatchEvaluation) {
    println!(
        "{} evaluated | {} rejected",
        batch.evaluated, batch.rejected
    );
    for row in &batch.rows {
        let municipality = row.municipality.as_deref().unwrap_or("-");
        match &row.outcome {
            BatchOutcome::Evaluated(summary) => {
                let failing = if summary.failing_rules.is_empty() {
                    String::new()
                } else {
                    format!(" | failing: {}", summary.failing_rules.join(", "))
                };
                println!(
                    "  line {} | {} | {} ({}%){}",
                    row.line,
                    municipality,
                    status_label(summary.overall_status),
                    summary.confidence,
                    failing
                );
            }
            BatchOutcome::Rejected(rejected) => {
                println!("  line {} | rejected: {}", row.line, rejected.error);
            }
        }
    }
}

fn demo_properties() -> Vec<(&'static str, PropertyInput)> {
    let mut eixample = PropertyInput::new(
        "Barcelona",
        "Barcelonès",
        PropertyType::Flat,
        UseCase::SecondOccupancy,
    );
    eixample.address = Some("Carrer del Consell de Cent 300, 2n 1a".to_string());
    eixample.year_built = Some(1958);
    eixample.useful_area = Some(64.0);
    eixample.ceiling_height = Some(2.9);
    eixample.num_rooms = Some(3);
    eixample.num_bedrooms = Some(2);
    eixample.num_bathrooms = Some(1);
    eixample.num_floors = Some(1);
    eixample.intended_occupancy = Some(3);
    eixample.has_kitchen = true;
    eixample.has_bathroom = true;
    eixample.has_natural_light = true;
    eixample.has_ventilation = true;
    eixample.has_heating = true;
    eixample.has_running_water = Some(true);
    eixample.has_hot_water = Some(true);
    eixample.has_drainage = Some(true);
    eixample.has_wc = Some(true);
    eixample.has_shower_or_bath = Some(true);
    eixample.has_cooking_appliance = Some(true);
    eixample.has_electrical_installation = Some(true);
    eixample.has_energy_certificate = Some(true);
    eixample.has_gas = Some(false);

    let mut attic = eixample.clone();
    attic.address = Some("Carrer de Verdi 12, àtic".to_string());
    attic.useful_area = Some(31.0);
    attic.ceiling_height = Some(2.3);
    attic.num_rooms = Some(2);
    attic.intended_occupancy = Some(4);
    attic.has_heating = false;
    attic.has_energy_certificate = None;

    let mut new_build = PropertyInput::new(
        "Sant Cugat del Vallès",
        "Vallès Occidental",
        PropertyType::House,
        UseCase::FirstOccupancy,
    );
    new_build.year_built = Some(2024);
    new_build.useful_area = Some(120.0);
    new_build.ceiling_height = Some(2.7);
    new_build.num_floors = Some(2);
    new_build.has_kitchen = true;
    new_build.has_bathroom = true;
    new_build.has_natural_light = true;
    new_build.has_ventilation = true;
    new_build.has_heating = true;

    vec![
        ("gestor-demo", eixample),
        ("gestor-demo", attic),
        ("propietari-demo", new_build),
    ]
}
