use habitabilitat::error::AppError;
use habitabilitat::workflows::habitability::cases::{
    CaseFilter, CaseId, CaseRecord, CaseRepository, CaseTemplate, EvidenceRecord,
    EvidenceRepository, RepositoryError, ShareId, TemplateId, TemplateRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// JSON array on disk mirroring one store. Rewritten in full after every mutation.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store.
    fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, AppError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save<T: Serialize>(&self, items: &[&T]) -> Result<(), RepositoryError> {
        let unavailable = |err: &dyn std::fmt::Display| {
            RepositoryError::Unavailable(format!("{}: {err}", self.path.display()))
        };

        let bytes = serde_json::to_vec_pretty(items).map_err(|err| unavailable(&err))?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, bytes).map_err(|err| unavailable(&err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| unavailable(&err))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    records: Arc<Mutex<HashMap<CaseId, CaseRecord>>>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryCaseRepository {
    pub(crate) fn with_snapshot(snapshot: SnapshotFile) -> Result<Self, AppError> {
        let records = snapshot
            .load::<CaseRecord>()?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Ok(Self {
            records: Arc::new(Mutex::new(records)),
            snapshot: Some(snapshot),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    fn persist(&self, records: &HashMap<CaseId, CaseRecord>) -> Result<(), RepositoryError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let mut ordered: Vec<&CaseRecord> = records.values().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        snapshot.save(&ordered)
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        if let Err(err) = self.persist(&guard) {
            guard.remove(&record.id);
            return Err(err);
        }
        Ok(record)
    }

    fn update(&self, record: CaseRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = record.id.clone();
        let Some(previous) = guard.insert(id.clone(), record) else {
            guard.remove(&id);
            return Err(RepositoryError::NotFound);
        };
        if let Err(err) = self.persist(&guard) {
            guard.insert(id, previous);
            return Err(err);
        }
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
pub(crate) struct InMemoryEvidenceRepository {
    records: Arc<Mutex<Vec<EvidenceRecord>>>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryEvidenceRepository {
    pub(crate) fn with_snapshot(snapshot: SnapshotFile) -> Result<Self, AppError> {
        let records = snapshot.load::<EvidenceRecord>()?;
        Ok(Self {
            records: Arc::new(Mutex::new(records)),
            snapshot: Some(snapshot),
        })
    }
}

impl EvidenceRepository for InMemoryEvidenceRepository {
    fn insert(&self, record: EvidenceRecord) -> Result<EvidenceRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("evidence mutex poisoned");
        guard.push(record.clone());
        if let Some(snapshot) = &self.snapshot {
            if let Err(err) = snapshot.save(&guard.iter().collect::<Vec<_>>()) {
                guard.pop();
                return Err(err);
            }
        }
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
pub(crate) struct InMemoryTemplateRepository {
    templates: Arc<Mutex<HashMap<TemplateId, CaseTemplate>>>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryTemplateRepository {
    pub(crate) fn with_snapshot(snapshot: SnapshotFile) -> Result<Self, AppError> {
        let templates = snapshot
            .load::<CaseTemplate>()?
            .into_iter()
            .map(|template| (template.id.clone(), template))
            .collect();
        Ok(Self {
            templates: Arc::new(Mutex::new(templates)),
            snapshot: Some(snapshot),
        })
    }

    fn persist(
        &self,
        templates: &HashMap<TemplateId, CaseTemplate>,
    ) -> Result<(), RepositoryError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let mut ordered: Vec<&CaseTemplate> = templates.values().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        snapshot.save(&ordered)
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn insert(&self, template: CaseTemplate) -> Result<CaseTemplate, RepositoryError> {
        let mut guard = self.templates.lock().expect("template mutex poisoned");
        if guard.contains_key(&template.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(template.id.clone(), template.clone());
        if let Err(err) = self.persist(&guard) {
            guard.remove(&template.id);
            return Err(err);
        }
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
        let Some(removed) = guard.remove(id) else {
            return Err(RepositoryError::NotFound);
        };
        if let Err(err) = self.persist(&guard) {
            guard.insert(id.clone(), removed);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitabilitat::workflows::habitability::cases::{CaseStatus, CaseSubmission};
    use habitabilitat::workflows::habitability::{
        HabitabilityCaseService, PropertyInput, PropertyType, UseCase,
    };

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "habitabilitat-api-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn studio() -> PropertyInput {
        let mut input = PropertyInput::new(
            "Badalona",
            "Barcelonès",
            PropertyType::Studio,
            UseCase::SecondOccupancy,
        );
        input.useful_area = Some(38.0);
        input
    }

    #[test]
    fn missing_snapshot_starts_empty() {
        let dir = scratch_dir("empty");
        let repository =
            InMemoryCaseRepository::with_snapshot(SnapshotFile::new(dir.join("cases.json")))
                .expect("loads");
        assert_eq!(repository.len(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn cases_survive_a_reload() {
        let dir = scratch_dir("reload");
        let snapshot = SnapshotFile::new(dir.join("cases.json"));

        let first = Arc::new(InMemoryCaseRepository::with_snapshot(snapshot.clone()).expect("loads"));
        let service =
            HabitabilityCaseService::new(first, Arc::new(InMemoryEvidenceRepository::default()));
        let record = service
            .submit(CaseSubmission::anonymous(studio()))
            .expect("stored");

        let reloaded = InMemoryCaseRepository::with_snapshot(snapshot).expect("reloads");
        let fetched = reloaded
            .fetch(&record.id)
            .expect("fetch")
            .expect("persisted");
        assert_eq!(fetched, record);
        assert_eq!(fetched.status, CaseStatus::New);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn corrupt_snapshot_is_a_serialization_error() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("templates.json");
        std::fs::write(&path, b"{ not json").expect("write");

        let result = InMemoryTemplateRepository::with_snapshot(SnapshotFile::new(&path));
        assert!(matches!(result, Err(AppError::Serialization(_))));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn unwritable_snapshot_reports_unavailable_and_rolls_back() {
        let dir = scratch_dir("unwritable");
        let snapshot = SnapshotFile::new(dir.join("missing-subdir").join("cases.json"));
        let repository = Arc::new(InMemoryCaseRepository {
            snapshot: Some(snapshot),
            ..InMemoryCaseRepository::default()
        });
        let service = HabitabilityCaseService::new(
            repository.clone(),
            Arc::new(InMemoryEvidenceRepository::default()),
        );

        let error = service
            .submit(CaseSubmission::anonymous(studio()))
            .expect_err("write fails");
        assert!(error.to_string().contains("cases.json"));
        assert_eq!(repository.len(), 0);
        std::fs::remove_dir_all(dir).ok();
    }
}
