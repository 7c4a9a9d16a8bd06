use chrono::{DateTime, Utc};
use jobtrack_core::document::{CoverLetter, Resume};
use serde::{Deserialize, Serialize};

/// A row of the `resumes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_default: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn from_domain(user_id: &str, resume: &Resume) -> Self {
        Self {
            id: resume.id.clone(),
            user_id: user_id.to_string(),
            name: resume.name.clone(),
            file_name: Some(resume.file_name.clone()),
            tags: Some(resume.tags.clone()),
            is_default: Some(resume.is_default),
            created_at: resume.created_at,
        }
    }

    pub fn into_domain(self) -> Resume {
        Resume {
            id: self.id,
            name: self.name,
            file_name: self.file_name.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            is_default: self.is_default.unwrap_or(false),
            created_at: self.created_at,
        }
    }
}

/// A row of the `cover_letters` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl CoverLetterRow {
    pub fn from_domain(user_id: &str, cover_letter: &CoverLetter) -> Self {
        Self {
            id: cover_letter.id.clone(),
            user_id: user_id.to_string(),
            name: cover_letter.name.clone(),
            file_name: Some(cover_letter.file_name.clone()),
            tags: Some(cover_letter.tags.clone()),
            created_at: cover_letter.created_at,
        }
    }

    pub fn into_domain(self) -> CoverLetter {
        CoverLetter {
            id: self.id,
            name: self.name,
            file_name: self.file_name.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_row_defaults() {
        let row: ResumeRow = serde_json::from_value(json!({
            "id": "r1",
            "user_id": "u1",
            "name": "Backend",
            "file_name": null,
            "is_default": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let resume = row.into_domain();
        assert_eq!(resume.file_name, "");
        assert!(!resume.is_default);
        assert!(resume.tags.is_empty());
    }

    #[test]
    fn test_cover_letter_row_carries_owner() {
        let letter = CoverLetter {
            id: "c1".to_string(),
            name: "Generic".to_string(),
            file_name: "generic.pdf".to_string(),
            tags: vec!["general".to_string()],
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(CoverLetterRow::from_domain("u9", &letter)).unwrap();
        assert_eq!(value["user_id"], "u9");
        assert_eq!(value["file_name"], "generic.pdf");
    }
}
