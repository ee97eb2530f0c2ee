use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Format of `timestamp_create` in the manifest, e.g. `19-10-2026 14:03:59`.
pub const CREATED_AT_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A validated project name. Doubles as the project's directory name, so it
/// has to be a single, non-empty path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyProjectName);
        }
        if !is_single_component(value) {
            return Err(DomainError::InvalidProjectName(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks that an image file name can be joined onto a project directory
/// without escaping it.
pub fn validate_file_name(value: &str) -> Result<(), DomainError> {
    if value.is_empty() || !is_single_component(value) {
        return Err(DomainError::InvalidFileName(value.to_string()));
    }
    Ok(())
}

fn is_single_component(value: &str) -> bool {
    value != "." && value != ".." && !value.contains(['/', '\\', '\0'])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncStatus {
    #[default]
    #[serde(rename = "Not Synced", alias = "NotSynced")]
    NotSynced,
    #[serde(rename = "Syncing")]
    Syncing,
    #[serde(rename = "Synced")]
    Synced,
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotSynced => "Not Synced",
            Self::Syncing => "Syncing",
            Self::Synced => "Synced",
        };
        f.write_str(label)
    }
}

/// One entry of the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(rename = "timestamp_create")]
    pub created_at: String,
    pub total_data: u64,
    pub sync_status: SyncStatus,
    pub description: String,
}

impl ProjectRecord {
    pub fn new(name: &ProjectName, description: &str, created: NaiveDateTime) -> Self {
        Self {
            name: name.as_str().to_string(),
            created_at: created.format(CREATED_AT_FORMAT).to_string(),
            total_data: 0,
            sync_status: SyncStatus::NotSynced,
            description: description.to_string(),
        }
    }
}
