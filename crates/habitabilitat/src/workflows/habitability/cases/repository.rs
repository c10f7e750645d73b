use super::domain::{CaseFilter, CaseId, CaseRecord, ShareId};
use super::evidence::EvidenceRecord;
use super::templates::{CaseTemplate, TemplateId};

/// Storage abstraction so the case service can be exercised in isolation.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError>;
    fn update(&self, record: CaseRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError>;
    fn fetch_by_share(&self, share_id: &ShareId) -> Result<Option<CaseRecord>, RepositoryError>;
    /// Matching records, newest first.
    fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, RepositoryError>;
}

pub trait EvidenceRepository: Send + Sync {
    fn insert(&self, record: EvidenceRecord) -> Result<EvidenceRecord, RepositoryError>;
    fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<EvidenceRecord>, RepositoryError>;
}

pub trait TemplateRepository: Send + Sync {
    fn insert(&self, template: CaseTemplate) -> Result<CaseTemplate, RepositoryError>;
    fn fetch(&self, id: &TemplateId) -> Result<Option<CaseTemplate>, RepositoryError>;
    fn list(&self) -> Result<Vec<CaseTemplate>, RepositoryError>;
    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
