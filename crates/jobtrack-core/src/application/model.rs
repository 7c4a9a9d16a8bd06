//! Job application domain models.
//!
//! A [`JobApplication`] is one card in the pipeline. Records are created from a
//! [`NewApplication`] (the caller never chooses the id or timestamps) and
//! changed through an [`ApplicationPatch`], which names exactly the fields it
//! touches.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Pipeline status of an application.
///
/// The variant order is the pipeline order used by the board and the
/// analytics breakdowns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
    Interested,
    Applied,
    Screening,
    Interview,
    FinalInterview,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Every status, in pipeline order.
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Interested,
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::FinalInterview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    /// Returns true once the application has reached an outcome
    /// (offer, rejection or withdrawal).
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Offer | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    pub fn is_interviewing(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interview | ApplicationStatus::FinalInterview
        )
    }

    /// Human readable column label.
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "Interested",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::FinalInterview => "Final Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }
}

/// Relative importance the user assigned to an application.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// A tracked job application.
///
/// Serialized in camelCase; this is the shape kept in the local fallback
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_applied: Option<String>,
    /// Id of the resume sent with this application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_used: Option<String>,
    /// Id of the cover letter sent with this application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter_used: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// The date used for monthly bucketing: the applied date when it parses,
    /// otherwise the creation date.
    pub fn effective_date(&self) -> NaiveDate {
        self.date_applied
            .as_deref()
            .and_then(parse_loose_datetime)
            .unwrap_or(self.created_at)
            .date_naive()
    }

    /// The scheduled interview time, if one is set and parses.
    pub fn interview_at(&self) -> Option<DateTime<Utc>> {
        self.interview_date.as_deref().and_then(parse_loose_datetime)
    }
}

/// Input for creating an application. Identity and timestamps are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_url: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub resume_used: Option<String>,
    #[serde(default)]
    pub cover_letter_used: Option<String>,
    #[serde(default)]
    pub notes: String,
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
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewApplication {
    /// Minimal input: everything but company, position and status defaulted.
    pub fn new(
        company_name: impl Into<String>,
        position: impl Into<String>,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            position: position.into(),
            job_description: String::new(),
            job_url: None,
            status,
            date_applied: None,
            resume_used: None,
            cover_letter_used: None,
            notes: String::new(),
            salary: None,
            location: None,
            contact_person: None,
            contact_email: None,
            interview_date: None,
            follow_up_date: None,
            priority: Priority::default(),
            tags: Vec::new(),
        }
    }

    /// Builds the stored record. `created_at` and `updated_at` are both `now`.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> JobApplication {
        JobApplication {
            id,
            company_name: self.company_name,
            position: self.position,
            job_description: self.job_description,
            job_url: self.job_url,
            status: self.status,
            date_applied: self.date_applied,
            resume_used: self.resume_used,
            cover_letter_used: self.cover_letter_used,
            notes: self.notes,
            salary: self.salary,
            location: self.location,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            interview_date: self.interview_date,
            follow_up_date: self.follow_up_date,
            priority: self.priority,
            tags: normalize_tags(self.tags),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update to a [`JobApplication`].
///
/// `None` means "leave untouched". Nullable fields are `Option<Option<_>>`:
/// `Some(None)` clears the value, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub job_description: Option<String>,
    pub job_url: Option<Option<String>>,
    pub status: Option<ApplicationStatus>,
    pub date_applied: Option<Option<String>>,
    pub resume_used: Option<Option<String>>,
    pub cover_letter_used: Option<Option<String>>,
    pub notes: Option<String>,
    pub salary: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub contact_person: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub interview_date: Option<Option<String>>,
    pub follow_up_date: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

impl ApplicationPatch {
    /// A patch that only moves the application to `status`.
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the present fields into `application` and stamps `updated_at`.
    pub fn apply_to(&self, application: &mut JobApplication, now: DateTime<Utc>) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut application.company_name, &self.company_name);
        set(&mut application.position, &self.position);
        set(&mut application.job_description, &self.job_description);
        set(&mut application.job_url, &self.job_url);
        set(&mut application.status, &self.status);
        set(&mut application.date_applied, &self.date_applied);
        set(&mut application.resume_used, &self.resume_used);
        set(&mut application.cover_letter_used, &self.cover_letter_used);
        set(&mut application.notes, &self.notes);
        set(&mut application.salary, &self.salary);
        set(&mut application.location, &self.location);
        set(&mut application.contact_person, &self.contact_person);
        set(&mut application.contact_email, &self.contact_email);
        set(&mut application.interview_date, &self.interview_date);
        set(&mut application.follow_up_date, &self.follow_up_date);
        set(&mut application.priority, &self.priority);
        if let Some(tags) = &self.tags {
            application.tags = normalize_tags(tags.clone());
        }
        application.updated_at = now;
    }
}

/// Trims tags, drops empty ones and removes duplicates while keeping the
/// first occurrence's position.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Parses the date strings the view layer produces: RFC 3339 timestamps,
/// `datetime-local` values (`2024-05-01T14:30`) and plain dates.
/// Naive values are taken as UTC.
pub fn parse_loose_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(now: DateTime<Utc>) -> JobApplication {
        let mut input = NewApplication::new("Acme", "Engineer", ApplicationStatus::Interested);
        input.tags = vec!["rust".to_string(), "remote".to_string()];
        input.location = Some("Berlin".to_string());
        input.into_record("app-1".to_string(), now)
    }

    #[test]
    fn test_status_round_trips_through_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::FinalInterview).unwrap();
        assert_eq!(json, "\"final_interview\"");
        assert_eq!(
            "final_interview".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::FinalInterview
        );
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_into_record_sets_equal_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let app = sample(now);
        assert_eq!(app.created_at, now);
        assert_eq!(app.created_at, app.updated_at);
        assert_eq!(app.priority, Priority::Medium);
    }

    #[test]
    fn test_status_patch_changes_only_status_and_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let original = sample(created);
        let mut patched = original.clone();

        ApplicationPatch::status(ApplicationStatus::Applied).apply_to(&mut patched, later);

        assert_eq!(patched.status, ApplicationStatus::Applied);
        assert_eq!(patched.updated_at, later);
        let mut expected = original;
        expected.status = ApplicationStatus::Applied;
        expected.updated_at = later;
        assert_eq!(patched, expected);
    }

    #[test]
    fn test_patch_can_clear_nullable_field() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut app = sample(now);
        let patch = ApplicationPatch {
            location: Some(None),
            ..ApplicationPatch::default()
        };
        patch.apply_to(&mut app, now);
        assert!(app.location.is_none());
    }

    #[test]
    fn test_normalize_tags_dedupes_in_order() {
        let tags = vec![
            " rust ".to_string(),
            "go".to_string(),
            "rust".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["rust", "go"]);
    }

    #[test]
    fn test_local_shape_is_camel_case_and_omits_absent_fields() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let value = serde_json::to_value(sample(now)).unwrap();
        assert_eq!(value["companyName"], "Acme");
        assert!(value.get("jobUrl").is_none());
        assert_eq!(value["status"], "interested");
    }

    #[test]
    fn test_parse_loose_datetime_formats() {
        assert!(parse_loose_datetime("2024-01-01").is_some());
        assert!(parse_loose_datetime("2024-05-01T14:30").is_some());
        assert!(parse_loose_datetime("2024-05-01T14:30:00Z").is_some());
        assert!(parse_loose_datetime("next tuesday").is_none());
    }

    #[test]
    fn test_effective_date_falls_back_to_created_at() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let mut app = sample(now);
        assert_eq!(app.effective_date(), now.date_naive());
        app.date_applied = Some("2024-02-01".to_string());
        assert_eq!(
            app.effective_date(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
