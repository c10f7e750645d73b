use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::super::domain::PropertyInput;
use super::super::evaluation::{EvaluationEngine, EvaluationResult};
use super::super::import::{BatchEvaluation, PropertyCsvImporter, PropertyImportError};
use super::super::intake::{sanitize_text, IntakeGuard, IntakeViolation, MAX_NOTES_CHARS};
use super::domain::{
    CaseFilter, CaseId, CaseRecord, CaseStatus, CaseSubmission, CaseUpdate, ShareId, MAX_TAGS,
    MAX_TAG_CHARS,
};
use super::evidence::{EvidenceRecord, EvidenceUpload, EvidenceViolation};
use super::repository::{CaseRepository, EvidenceRepository, RepositoryError};

/// Service composing the intake guard, the rule engine, and case/evidence storage.
///
/// `update` and `reevaluate` hold `writes` across their fetch-modify-store sequence.
pub struct HabitabilityCaseService<R, E> {
    guard: Arc<IntakeGuard>,
    engine: EvaluationEngine,
    cases: Arc<R>,
    evidence: Arc<E>,
    writes: Mutex<()>,
}

impl<R, E> HabitabilityCaseService<R, E>
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    pub fn new(cases: Arc<R>, evidence: Arc<E>) -> Self {
        Self::with_parts(
            IntakeGuard::default(),
            EvaluationEngine::catalonia(),
            cases,
            evidence,
        )
    }

    pub fn with_parts(
        guard: IntakeGuard,
        engine: EvaluationEngine,
        cases: Arc<R>,
        evidence: Arc<E>,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            engine,
            cases,
            evidence,
            writes: Mutex::new(()),
        }
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Validate and evaluate without storing anything.
    pub fn preview(&self, input: PropertyInput) -> Result<EvaluationResult, CaseServiceError> {
        let input = self.guard.admit(input)?;
        Ok(self.engine.evaluate(&input))
    }

    /// Open a new case with a server-side evaluation.
    pub fn submit(&self, submission: CaseSubmission) -> Result<CaseRecord, CaseServiceError> {
        let property_input = self.guard.admit(submission.property_input)?;
        let evaluation_result = self.engine.evaluate(&property_input);
        let now = Utc::now();

        let record = CaseRecord {
            id: CaseId::generate(),
            share_id: ShareId::generate(),
            property_input,
            evaluation_result,
            evaluation_history: Vec::new(),
            created_at: now,
            user_id: non_blank(submission.user_id),
            team_id: non_blank(submission.team_id),
            status: CaseStatus::New,
            status_updated_at: now,
            status_updated_by: None,
            assigned_to: None,
            scheduled_date: None,
            submitted_date: None,
            completed_date: None,
            notes: None,
            tags: Vec::new(),
        };

        let stored = self.cases.insert(record).map_err(log_repository_error)?;
        info!(
            case_id = %stored.id,
            overall_status = stored.overall_status().label(),
            ruleset_version = %stored.evaluation_result.ruleset_version,
            "case created"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &CaseId) -> Result<CaseRecord, CaseServiceError> {
        let record = self
            .cases
            .fetch(id)
            .map_err(log_repository_error)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Look up a case by its public share handle.
    pub fn get_shared(&self, raw_share_id: &str) -> Result<CaseRecord, CaseServiceError> {
        let share_id = ShareId::parse(raw_share_id)
            .ok_or_else(|| CaseServiceError::InvalidShareId(raw_share_id.to_string()))?;
        let record = self
            .cases
            .fetch_by_share(&share_id)
            .map_err(log_repository_error)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, CaseServiceError> {
        Ok(self.cases.list(filter).map_err(log_repository_error)?)
    }

    /// Apply a partial update; `statusUpdatedAt` only moves when the status value changes.
    pub fn update(&self, id: &CaseId, update: CaseUpdate) -> Result<CaseRecord, CaseServiceError> {
        let _writes = self.write_lock();
        let mut record = self.get(id)?;
        let actor = non_blank(update.actor);
        let mut status_change = None;

        if let Some(status) = update.status {
            if status != record.status {
                status_change = Some((record.status, status));
                record.status = status;
                record.status_updated_at = Utc::now();
                record.status_updated_by = actor.clone();
            }
        }

        if let Some(assigned_to) = update.assigned_to {
            record.assigned_to = non_blank(assigned_to);
        }
        if let Some(scheduled_date) = update.scheduled_date {
            record.scheduled_date = scheduled_date;
        }
        if let Some(submitted_date) = update.submitted_date {
            record.submitted_date = submitted_date;
        }
        if let Some(completed_date) = update.completed_date {
            record.completed_date = completed_date;
        }
        if let Some(team_id) = update.team_id {
            record.team_id = non_blank(team_id);
        }

        if let Some(notes) = update.notes {
            record.notes = match notes {
                Some(notes) if notes.chars().count() > MAX_NOTES_CHARS => {
                    return Err(IntakeViolation::TextLength {
                        field: "notes",
                        min: 0,
                        max: MAX_NOTES_CHARS,
                    }
                    .into());
                }
                Some(notes) => Some(sanitize_text(&notes, MAX_NOTES_CHARS)).filter(|n| !n.is_empty()),
                None => None,
            };
        }

        if let Some(tags) = update.tags {
            record.tags = sanitize_tags(tags.unwrap_or_default())?;
        }

        self.cases
            .update(record.clone())
            .map_err(log_repository_error)?;
        if let Some((from, to)) = status_change {
            info!(
                case_id = %record.id,
                from = from.label(),
                to = to.label(),
                "case status changed"
            );
        }
        Ok(record)
    }

    /// Re-run the current catalog over the stored input, keeping the previous result in history.
    pub fn reevaluate(&self, id: &CaseId) -> Result<CaseRecord, CaseServiceError> {
        let _writes = self.write_lock();
        let mut record = self.get(id)?;
        let fresh = self.engine.evaluate(&record.property_input);
        let previous = std::mem::replace(&mut record.evaluation_result, fresh);
        record.evaluation_history.push(previous);

        self.cases
            .update(record.clone())
            .map_err(log_repository_error)?;
        info!(
            case_id = %record.id,
            overall_status = record.overall_status().label(),
            ruleset_version = %record.evaluation_result.ruleset_version,
            history = record.evaluation_history.len(),
            "case re-evaluated"
        );
        Ok(record)
    }

    pub fn attach_evidence(
        &self,
        case_id: &CaseId,
        upload: EvidenceUpload,
    ) -> Result<EvidenceRecord, CaseServiceError> {
        let record = self.get(case_id)?;
        let evidence = EvidenceRecord::from_upload(record.id, upload, Utc::now())?;
        let stored = self
            .evidence
            .insert(evidence)
            .map_err(log_repository_error)?;
        info!(case_id = %stored.case_id, evidence_id = %stored.id, "evidence attached");
        Ok(stored)
    }

    pub fn evidence_for(&self, case_id: &CaseId) -> Result<Vec<EvidenceRecord>, CaseServiceError> {
        let record = self.get(case_id)?;
        Ok(self
            .evidence
            .list_for_case(&record.id)
            .map_err(log_repository_error)?)
    }

    /// Intake + evaluation for every CSV row; rejected rows are reported, not fatal.
    pub fn batch_evaluate<Src: Read>(&self, reader: Src) -> Result<BatchEvaluation, CaseServiceError> {
        let rows = PropertyCsvImporter::from_reader(reader)?;
        let batch = BatchEvaluation::run(rows, &self.guard, &self.engine);
        info!(
            evaluated = batch.evaluated,
            rejected = batch.rejected,
            "batch evaluation finished"
        );
        Ok(batch)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn sanitize_tags(tags: Vec<String>) -> Result<Vec<String>, IntakeViolation> {
    if tags.len() > MAX_TAGS {
        return Err(IntakeViolation::OutOfRange {
            field: "tags",
            min: 0.0,
            max: MAX_TAGS as f64,
            found: tags.len() as f64,
        });
    }

    Ok(tags
        .iter()
        .map(|tag| sanitize_text(tag, MAX_TAG_CHARS))
        .filter(|tag| !tag.is_empty())
        .collect())
}

fn log_repository_error(error: RepositoryError) -> RepositoryError {
    if let RepositoryError::Unavailable(reason) = &error {
        warn!(%reason, "case repository unavailable");
    }
    error
}

/// Error raised by the case service.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Evidence(#[from] EvidenceViolation),
    #[error("invalid share id format: {0}")]
    InvalidShareId(String),
    #[error(transparent)]
    Import(#[from] PropertyImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
