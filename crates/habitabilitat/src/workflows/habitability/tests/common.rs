use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::habitability::cases::domain::{CaseFilter, CaseId, CaseRecord, ShareId};
use crate::workflows::habitability::cases::evidence::EvidenceRecord;
use crate::workflows::habitability::cases::repository::{
    CaseRepository, EvidenceRepository, RepositoryError, TemplateRepository,
};
use crate::workflows::habitability::cases::templates::{CaseTemplate, TemplateId};
use crate::workflows::habitability::cases::{HabitabilityCaseService, TemplateLibrary};
use crate::workflows::habitability::domain::{PropertyInput, PropertyType, UseCase};
use crate::workflows::habitability::evaluation::EvaluationEngine;
use crate::workflows::habitability::intake::IntakeGuard;

pub(super) const CURRENT_YEAR: i32 = 2025;

pub(super) fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Second-occupancy flat that satisfies every rule in the catalog.
pub(super) fn compliant_flat() -> PropertyInput {
    let mut input = PropertyInput::new(
        "Barcelona",
        "Barcelonès",
        PropertyType::Flat,
        UseCase::SecondOccupancy,
    );
    input.address = Some("Carrer de Mallorca 120, 3r 2a".to_string());
    input.year_built = Some(1962);
    input.useful_area = Some(60.0);
    input.total_area = Some(72.0);
    input.ceiling_height = Some(2.7);
    input.num_rooms = Some(3);
    input.num_bedrooms = Some(2);
    input.num_bathrooms = Some(1);
    input.num_floors = Some(1);
    input.intended_occupancy = Some(2);
    input.has_kitchen = true;
    input.has_bathroom = true;
    input.has_natural_light = true;
    input.has_ventilation = true;
    input.has_heating = true;
    input.has_running_water = Some(true);
    input.has_hot_water = Some(true);
    input.has_drainage = Some(true);
    input.has_wc = Some(true);
    input.has_shower_or_bath = Some(true);
    input.has_cooking_appliance = Some(true);
    input.has_electrical_installation = Some(true);
    input.has_energy_certificate = Some(true);
    input.has_gas = Some(false);
    input.has_gas_installation = Some(false);
    input
}

/// Small second-occupancy unit with nothing declared beyond its area.
pub(super) fn bare_unit() -> PropertyInput {
    let mut input = PropertyInput::new(
        "Sabadell",
        "Vallès Occidental",
        PropertyType::Flat,
        UseCase::SecondOccupancy,
    );
    input.useful_area = Some(20.0);
    input
}

/// First-occupancy unit with the core facilities but no detailed installation flags.
pub(super) fn core_only_unit() -> PropertyInput {
    let mut input = PropertyInput::new(
        "Girona",
        "Gironès",
        PropertyType::Flat,
        UseCase::FirstOccupancy,
    );
    input.useful_area = Some(40.0);
    input.ceiling_height = Some(2.6);
    input.has_kitchen = true;
    input.has_bathroom = true;
    input.has_natural_light = true;
    input.has_ventilation = true;
    input.has_heating = true;
    input
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::catalonia()
}

pub(super) fn guard() -> IntakeGuard {
    IntakeGuard::with_current_year(CURRENT_YEAR)
}

pub(super) type MemoryService = HabitabilityCaseService<MemoryCaseRepository, MemoryEvidenceRepository>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryCaseRepository>,
    Arc<MemoryEvidenceRepository>,
) {
    let cases = Arc::new(MemoryCaseRepository::default());
    let evidence = Arc::new(MemoryEvidenceRepository::default());
    let service =
        HabitabilityCaseService::with_parts(guard(), engine(), cases.clone(), evidence.clone());
    (service, cases, evidence)
}

pub(super) fn build_library() -> (
    TemplateLibrary<MemoryTemplateRepository>,
    Arc<MemoryTemplateRepository>,
) {
    let repository = Arc::new(MemoryTemplateRepository::default());
    let library = TemplateLibrary::with_guard(guard(), repository.clone());
    (library, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryCaseRepository {
    pub(super) records: Arc<Mutex<HashMap<CaseId, CaseRecord>>>,
}

impl CaseRepository for MemoryCaseRepository {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: CaseRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_by_share(&self, share_id: &ShareId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.share_id == share_id)
            .cloned())
    }

    fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<CaseRecord> = guard
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvidenceRepository {
    pub(super) records: Arc<Mutex<Vec<EvidenceRecord>>>,
}

impl EvidenceRepository for MemoryEvidenceRepository {
    fn insert(&self, record: EvidenceRecord) -> Result<EvidenceRecord, RepositoryError> {
        self.records
            .lock()
            .expect("evidence mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<EvidenceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("evidence mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.case_id == case_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryTemplateRepository {
    pub(super) templates: Arc<Mutex<HashMap<TemplateId, CaseTemplate>>>,
}

impl TemplateRepository for MemoryTemplateRepository {
    fn insert(&self, template: CaseTemplate) -> Result<CaseTemplate, RepositoryError> {
        let mut guard = self.templates.lock().expect("template mutex poisoned");
        if guard.contains_key(&template.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(template.id.clone(), template.clone());
        Ok(template)
    }

    fn fetch(&self, id: &TemplateId) -> Result<Option<CaseTemplate>, RepositoryError> {
        let guard = self.templates.lock().expect("template mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CaseTemplate>, RepositoryError> {
        let guard = self.templates.lock().expect("template mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError> {
        let mut guard = self.templates.lock().expect("template mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct ConflictRepository;

impl CaseRepository for ConflictRepository {
    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: CaseRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Ok(None)
    }

    fn fetch_by_share(&self, _share_id: &ShareId) -> Result<Option<CaseRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _filter: &CaseFilter) -> Result<Vec<CaseRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn update(&self, _record: CaseRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch_by_share(&self, _share_id: &ShareId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self, _filter: &CaseFilter) -> Result<Vec<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
