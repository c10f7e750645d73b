use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::super::domain::PropertyInput;
use super::super::intake::{sanitize_text, IntakeGuard, IntakeViolation};
use super::repository::{RepositoryError, TemplateRepository};

pub const MAX_TEMPLATE_NAME_CHARS: usize = 100;
const MAX_TEMPLATE_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

/// Reusable, pre-validated property description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub property_input: PropertyInput,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound request to save a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub property_input: PropertyInput,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Which templates a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateScope {
    User(String),
    Team(String),
    Public,
}

impl TemplateScope {
    pub fn includes(&self, template: &CaseTemplate) -> bool {
        match self {
            TemplateScope::User(user) => &template.created_by == user,
            TemplateScope::Team(team) => template.team_id.as_ref() == Some(team),
            TemplateScope::Public => template.is_public,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template name must be between 1 and 100 characters")]
    InvalidName,
    #[error("template creator is required")]
    MissingCreator,
    #[error("only the creator may delete this template")]
    Forbidden,
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Template store fronted by the intake guard.
pub struct TemplateLibrary<T> {
    guard: Arc<IntakeGuard>,
    repository: Arc<T>,
}

impl<T> TemplateLibrary<T>
where
    T: TemplateRepository + 'static,
{
    pub fn new(repository: Arc<T>) -> Self {
        Self::with_guard(IntakeGuard::default(), repository)
    }

    pub fn with_guard(guard: IntakeGuard, repository: Arc<T>) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
        }
    }

    pub fn create(&self, draft: TemplateDraft) -> Result<CaseTemplate, TemplateError> {
        let name = sanitize_text(&draft.name, usize::MAX);
        if name.is_empty() || name.chars().count() > MAX_TEMPLATE_NAME_CHARS {
            return Err(TemplateError::InvalidName);
        }

        let created_by = draft.created_by.trim();
        if created_by.is_empty() {
            return Err(TemplateError::MissingCreator);
        }

        let property_input = self.guard.admit(draft.property_input)?;
        let now = Utc::now();
        let template = CaseTemplate {
            id: TemplateId(Uuid::new_v4().to_string()),
            name,
            description: draft
                .description
                .map(|description| sanitize_text(&description, MAX_TEMPLATE_DESCRIPTION_CHARS))
                .filter(|description| !description.is_empty()),
            property_input,
            created_by: created_by.to_string(),
            team_id: draft.team_id.filter(|team| !team.trim().is_empty()),
            is_public: draft.is_public,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(template)?;
        info!(template_id = %stored.id.0, created_by = %stored.created_by, "template saved");
        Ok(stored)
    }

    pub fn get(&self, id: &TemplateId) -> Result<CaseTemplate, TemplateError> {
        let template = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(template)
    }

    /// Templates in `scope`, most recently updated first.
    pub fn list(&self, scope: &TemplateScope) -> Result<Vec<CaseTemplate>, TemplateError> {
        let mut templates: Vec<CaseTemplate> = self
            .repository
            .list()?
            .into_iter()
            .filter(|template| scope.includes(template))
            .collect();
        templates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(templates)
    }

    pub fn delete(&self, id: &TemplateId, actor: &str) -> Result<(), TemplateError> {
        let template = self.get(id)?;
        if template.created_by != actor {
            return Err(TemplateError::Forbidden);
        }

        self.repository.delete(id)?;
        info!(template_id = %id.0, "template deleted");
        Ok(())
    }
}
