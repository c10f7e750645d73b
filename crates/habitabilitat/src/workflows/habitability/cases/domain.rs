use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::super::domain::PropertyInput;
use super::super::evaluation::{EvaluationResult, RuleSeverity};

pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_CHARS: usize = 50;
pub const SHARE_ID_LEN: usize = 16;

/// Identifier wrapper for tracked cases (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public read-only handle: 16 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareId(pub String);

impl ShareId {
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..SHARE_ID_LEN].to_string())
    }

    /// Accepts hex in either case and normalizes to lowercase.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == SHARE_ID_LEN && raw.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| Self(raw.to_ascii_lowercase()))
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case pipeline position. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    New,
    Waiting,
    Scheduled,
    Ready,
    Submitted,
    Done,
}

impl CaseStatus {
    pub const fn ordered() -> [CaseStatus; 6] {
        [
            CaseStatus::New,
            CaseStatus::Waiting,
            CaseStatus::Scheduled,
            CaseStatus::Ready,
            CaseStatus::Submitted,
            CaseStatus::Done,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            CaseStatus::New => "new",
            CaseStatus::Waiting => "waiting",
            CaseStatus::Scheduled => "scheduled",
            CaseStatus::Ready => "ready",
            CaseStatus::Submitted => "submitted",
            CaseStatus::Done => "done",
        }
    }
}

/// Stored case: the sanitized input, its server-side evaluation, and pipeline metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: CaseId,
    pub share_id: ShareId,
    pub property_input: PropertyInput,
    pub evaluation_result: EvaluationResult,
    #[serde(default)]
    pub evaluation_history: Vec<EvaluationResult>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub status: CaseStatus,
    pub status_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CaseRecord {
    pub fn overall_status(&self) -> RuleSeverity {
        self.evaluation_result.overall_status
    }

    pub fn summary_view(&self) -> CaseSummaryView {
        CaseSummaryView {
            id: self.id.clone(),
            share_id: self.share_id.clone(),
            municipality: self.property_input.municipality.clone(),
            region: self.property_input.region.clone(),
            overall_status: self.evaluation_result.overall_status,
            confidence: self.evaluation_result.confidence,
            ruleset_version: self.evaluation_result.ruleset_version.clone(),
            status: self.status,
            created_at: self.created_at,
            assigned_to: self.assigned_to.clone(),
        }
    }
}

/// Dashboard row for case listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummaryView {
    pub id: CaseId,
    pub share_id: ShareId,
    pub municipality: String,
    pub region: String,
    pub overall_status: RuleSeverity,
    pub confidence: u8,
    pub ruleset_version: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Inbound request to open a case. Any client-computed evaluation in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSubmission {
    pub property_input: PropertyInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl CaseSubmission {
    pub fn anonymous(property_input: PropertyInput) -> Self {
        Self {
            property_input,
            user_id: None,
            team_id: None,
        }
    }
}

/// Partial update. Outer `None` keeps the field, `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "patch_field")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub submitted_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub completed_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub team_id: Option<Option<String>>,
    #[serde(default)]
    pub actor: Option<String>,
}

fn patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Listing filter; every present criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFilter {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
}

impl CaseFilter {
    pub fn matches(&self, record: &CaseRecord) -> bool {
        let user = self
            .user_id
            .as_ref()
            .map_or(true, |user| record.user_id.as_ref() == Some(user));
        let team = self
            .team_id
            .as_ref()
            .map_or(true, |team| record.team_id.as_ref() == Some(team));
        let status = self.status.map_or(true, |status| record.status == status);
        user && team && status
    }
}
