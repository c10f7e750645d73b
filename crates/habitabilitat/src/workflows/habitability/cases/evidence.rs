use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::intake::sanitize_text;
use super::domain::CaseId;

pub const MAX_EVIDENCE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_ORIGINAL_FILENAME_CHARS: usize = 255;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_SAFE_NAME_CHARS: usize = 100;

pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Photo,
    Document,
}

impl EvidenceKind {
    fn infer(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            EvidenceKind::Photo
        } else {
            EvidenceKind::Document
        }
    }
}

/// Metadata of an uploaded file. The bytes live wherever `url` points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub id: String,
    pub case_id: CaseId,
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
    pub filename: String,
    pub original_filename: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Inbound evidence descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceUpload {
    pub original_filename: String,
    pub mime_type: String,
    pub size: u64,
    pub uploaded_by: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EvidenceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceViolation {
    #[error("file name is required")]
    MissingFilename,
    #[error("uploader is required")]
    MissingUploader,
    #[error("file too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("file type '{0}' is not allowed")]
    UnsupportedMimeType(String),
}

impl EvidenceRecord {
    pub fn from_upload(
        case_id: CaseId,
        upload: EvidenceUpload,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Self, EvidenceViolation> {
        if upload.original_filename.trim().is_empty() {
            return Err(EvidenceViolation::MissingFilename);
        }

        let uploaded_by = upload.uploaded_by.trim();
        if uploaded_by.is_empty() {
            return Err(EvidenceViolation::MissingUploader);
        }

        if upload.size > MAX_EVIDENCE_BYTES {
            return Err(EvidenceViolation::TooLarge {
                size: upload.size,
                max: MAX_EVIDENCE_BYTES,
            });
        }

        if !ALLOWED_MIME_TYPES.contains(&upload.mime_type.as_str()) {
            return Err(EvidenceViolation::UnsupportedMimeType(upload.mime_type));
        }

        let filename = safe_filename(&upload.original_filename, uploaded_at.timestamp_millis());
        let kind = upload
            .kind
            .unwrap_or_else(|| EvidenceKind::infer(&upload.mime_type));
        let url = upload
            .storage_key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| filename.clone());

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            case_id,
            kind,
            original_filename: sanitize_text(
                &upload.original_filename,
                MAX_ORIGINAL_FILENAME_CHARS,
            ),
            filename,
            mime_type: upload.mime_type,
            size: upload.size,
            url,
            uploaded_by: uploaded_by.to_string(),
            uploaded_at,
            description: upload
                .description
                .map(|description| sanitize_text(&description, MAX_DESCRIPTION_CHARS))
                .filter(|description| !description.is_empty()),
        })
    }
}

/// `<millis>-<base><.ext>` with everything outside `[A-Za-z0-9._-]` replaced by `_` and no dots
/// left in the base name.
pub fn safe_filename(original: &str, unix_millis: i64) -> String {
    let sanitized: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SAFE_NAME_CHARS)
        .collect();

    let (base, extension) = match sanitized.rfind('.') {
        Some(dot) if dot > 0 && dot < sanitized.len() - 1 => {
            (&sanitized[..dot], &sanitized[dot..])
        }
        Some(dot) if dot > 0 => (&sanitized[..dot], ""),
        _ => (sanitized.as_str(), ""),
    };

    format!("{unix_millis}-{}{extension}", base.replace('.', "_"))
}
