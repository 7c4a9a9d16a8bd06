//! Document domain models.
//!
//! Documents are references only: a display name and an optional file name.
//! No file content is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::normalize_tags;

/// A resume the user can attach to applications.
///
/// `is_default` is not unique across resumes; several may carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl NewResume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: String::new(),
            tags: Vec::new(),
            is_default: false,
        }
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Resume {
        Resume {
            id,
            name: self.name,
            file_name: self.file_name,
            tags: normalize_tags(self.tags),
            is_default: self.is_default,
            created_at: now,
        }
    }
}

/// A cover letter the user can attach to applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoverLetter {
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewCoverLetter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> CoverLetter {
        CoverLetter {
            id,
            name: self.name,
            file_name: self.file_name,
            tags: normalize_tags(self.tags),
            created_at: now,
        }
    }
}
