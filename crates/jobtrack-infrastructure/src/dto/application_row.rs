use chrono::{DateTime, Utc};
use jobtrack_core::application::{
    ApplicationPatch, ApplicationStatus, JobApplication, Priority, normalize_tags,
};
use serde::{Deserialize, Serialize};

/// A row of the `applications` table.
///
/// Text columns that older rows may hold as NULL are optional here and
/// defaulted when converted to the domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRow {
    pub id: String,
    pub user_id: String,
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    pub status: String,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub resume_used: Option<String>,
    #[serde(default)]
    pub cover_letter_used: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    pub fn from_domain(user_id: &str, app: &JobApplication) -> Self {
        Self {
            id: app.id.clone(),
            user_id: user_id.to_string(),
            company_name: app.company_name.clone(),
            position: app.position.clone(),
            job_description: Some(app.job_description.clone()),
            job_url: app.job_url.clone(),
            status: app.status.to_string(),
            date_applied: app.date_applied.clone(),
            resume_used: app.resume_used.clone(),
            cover_letter_used: app.cover_letter_used.clone(),
            notes: Some(app.notes.clone()),
            salary: app.salary.clone(),
            location: app.location.clone(),
            contact_person: app.contact_person.clone(),
            contact_email: app.contact_email.clone(),
            interview_date: app.interview_date.clone(),
            follow_up_date: app.follow_up_date.clone(),
            priority: Some(app.priority.to_string()),
            tags: Some(app.tags.clone()),
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }

    /// Converts to the domain model.
    ///
    /// The status column is free text on the remote side. An unknown value is
    /// mapped to `interested` (and logged) so the record stays visible; an
    /// unknown or missing priority becomes `medium`.
    pub fn into_domain(self) -> JobApplication {
        let status = self.status.parse::<ApplicationStatus>().unwrap_or_else(|_| {
            tracing::warn!(
                "[ApplicationRow] Unknown status '{}' on application {}, using 'interested'",
                self.status,
                self.id
            );
            ApplicationStatus::Interested
        });
        let priority = self
            .priority
            .as_deref()
            .and_then(|p| p.parse::<Priority>().ok())
            .unwrap_or_default();

        JobApplication {
            id: self.id,
            company_name: self.company_name,
            position: self.position,
            job_description: self.job_description.unwrap_or_default(),
            job_url: self.job_url,
            status,
            date_applied: self.date_applied,
            resume_used: self.resume_used,
            cover_letter_used: self.cover_letter_used,
            notes: self.notes.unwrap_or_default(),
            salary: self.salary,
            location: self.location,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            interview_date: self.interview_date,
            follow_up_date: self.follow_up_date,
            priority,
            tags: self.tags.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Column updates for one application.
///
/// Serializes only the columns present in the source patch, plus
/// `updated_at`. `Some(None)` serializes as an explicit `null`.
#[derive(Debug, Serialize)]
pub struct ApplicationPatchRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_applied: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_used: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_used: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<&'a Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> ApplicationPatchRow<'a> {
    pub fn from_patch(patch: &'a ApplicationPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            company_name: patch.company_name.as_deref(),
            position: patch.position.as_deref(),
            job_description: patch.job_description.as_deref(),
            job_url: patch.job_url.as_ref(),
            status: patch.status,
            date_applied: patch.date_applied.as_ref(),
            resume_used: patch.resume_used.as_ref(),
            cover_letter_used: patch.cover_letter_used.as_ref(),
            notes: patch.notes.as_deref(),
            salary: patch.salary.as_ref(),
            location: patch.location.as_ref(),
            contact_person: patch.contact_person.as_ref(),
            contact_email: patch.contact_email.as_ref(),
            interview_date: patch.interview_date.as_ref(),
            follow_up_date: patch.follow_up_date.as_ref(),
            priority: patch.priority,
            tags: patch.tags.clone().map(normalize_tags),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobtrack_core::application::NewApplication;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_domain_to_row_uses_snake_case_columns() {
        let mut input = NewApplication::new("Acme", "Engineer", ApplicationStatus::FinalInterview);
        input.contact_email = Some("hr@acme.test".to_string());
        let app = input.into_record("a1".to_string(), now());

        let value = serde_json::to_value(ApplicationRow::from_domain("user-1", &app)).unwrap();
        assert_eq!(value["user_id"], "user-1");
        assert_eq!(value["company_name"], "Acme");
        assert_eq!(value["status"], "final_interview");
        assert_eq!(value["contact_email"], "hr@acme.test");
        assert_eq!(value["priority"], "medium");
        assert!(value.get("companyName").is_none());
    }

    #[test]
    fn test_row_with_nulls_gets_defaults() {
        let row: ApplicationRow = serde_json::from_value(json!({
            "id": "a1",
            "user_id": "u1",
            "company_name": "Acme",
            "position": "Engineer",
            "job_description": null,
            "status": "screening",
            "notes": null,
            "priority": null,
            "tags": null,
            "created_at": "2024-01-01T12:00:00+00:00",
            "updated_at": "2024-01-02T12:00:00+00:00"
        }))
        .unwrap();

        let app = row.into_domain();
        assert_eq!(app.status, ApplicationStatus::Screening);
        assert_eq!(app.job_description, "");
        assert_eq!(app.notes, "");
        assert_eq!(app.priority, Priority::Medium);
        assert!(app.tags.is_empty());
        assert_eq!(app.created_at, now());
    }

    #[test]
    fn test_unknown_status_falls_back_to_interested() {
        let app = NewApplication::new("Acme", "Engineer", ApplicationStatus::Offer)
            .into_record("a1".to_string(), now());
        let mut row = ApplicationRow::from_domain("u1", &app);
        row.status = "ghosted".to_string();
        assert_eq!(row.into_domain().status, ApplicationStatus::Interested);
    }

    #[test]
    fn test_domain_row_domain_is_lossless() {
        let mut input = NewApplication::new("Acme", "Engineer", ApplicationStatus::Applied);
        input.tags = vec!["rust".to_string()];
        input.salary = Some("120k".to_string());
        let app = input.into_record("a1".to_string(), now());
        assert_eq!(ApplicationRow::from_domain("u1", &app).into_domain(), app);
    }

    #[test]
    fn test_patch_row_emits_only_present_keys() {
        let patch = ApplicationPatch::status(ApplicationStatus::Interview);
        let value = serde_json::to_value(ApplicationPatchRow::from_patch(&patch, now())).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(value["status"], "interview");
        assert!(value.get("updated_at").is_some());
    }

    #[test]
    fn test_patch_row_clears_with_null() {
        let patch = ApplicationPatch {
            location: Some(None),
            salary: Some(Some("90k".to_string())),
            tags: Some(vec!["a".to_string(), "a".to_string()]),
            ..ApplicationPatch::default()
        };
        let value = serde_json::to_value(ApplicationPatchRow::from_patch(&patch, now())).unwrap();
        assert!(value["location"].is_null());
        assert!(value.as_object().unwrap().contains_key("location"));
        assert_eq!(value["salary"], "90k");
        assert_eq!(value["tags"], json!(["a"]));
        assert!(value.get("company_name").is_none());
    }
}
