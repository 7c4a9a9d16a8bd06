use chrono::{DateTime, Utc};

use crate::application::{ApplicationStatus, JobApplication, Priority};

/// List-view filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    /// Case-insensitive substring matched against company, position,
    /// location and tags.
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub priority: Option<Priority>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &JobApplication) -> bool {
        if self.status.is_some_and(|s| s != application.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != application.priority) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                let hit = |s: &str| s.to_lowercase().contains(&term);
                hit(&application.company_name)
                    || hit(&application.position)
                    || application.location.as_deref().is_some_and(hit)
                    || application.tags.iter().any(|t| hit(t))
            }
        }
    }

    pub fn apply<'a>(&self, applications: &'a [JobApplication]) -> Vec<&'a JobApplication> {
        applications.iter().filter(|a| self.matches(a)).collect()
    }
}

/// The `limit` most recently created applications, newest first.
pub fn recent_applications(applications: &[JobApplication], limit: usize) -> Vec<&JobApplication> {
    let mut sorted: Vec<&JobApplication> = applications.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Interviews scheduled after `now`, soonest first.
pub fn upcoming_interviews(
    applications: &[JobApplication],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&JobApplication> {
    let mut upcoming: Vec<(DateTime<Utc>, &JobApplication)> = applications
        .iter()
        .filter_map(|a| a.interview_at().filter(|at| *at > now).map(|at| (at, a)))
        .collect();
    upcoming.sort_by_key(|(at, _)| *at);
    upcoming.into_iter().take(limit).map(|(_, a)| a).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NewApplication;
    use chrono::{Duration, TimeZone};

    fn apps() -> Vec<JobApplication> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut a = NewApplication::new("Acme", "Rust Engineer", ApplicationStatus::Applied);
        a.tags = vec!["Backend".to_string()];
        a.priority = Priority::High;
        a.interview_date = Some("2024-02-01T10:00".to_string());
        let mut b = NewApplication::new("Globex", "Designer", ApplicationStatus::Interview);
        b.location = Some("Lisbon".to_string());
        b.interview_date = Some("2024-01-15".to_string());
        let c = NewApplication::new("Initech", "QA", ApplicationStatus::Rejected);
        vec![
            a.into_record("a".to_string(), base),
            b.into_record("b".to_string(), base + Duration::days(1)),
            c.into_record("c".to_string(), base + Duration::days(2)),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let apps = apps();
        let by = |term: &str| {
            ApplicationFilter {
                search: Some(term.to_string()),
                ..ApplicationFilter::default()
            }
            .apply(&apps)
            .iter()
            .map(|a| a.id.clone())
            .collect::<Vec<_>>()
        };
        assert_eq!(by("rust"), vec!["a"]);
        assert_eq!(by("LISBON"), vec!["b"]);
        assert_eq!(by("backend"), vec!["a"]);
        assert_eq!(by("  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_status_and_priority_filters() {
        let apps = apps();
        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Applied),
            priority: Some(Priority::High),
            ..ApplicationFilter::default()
        };
        assert_eq!(filter.apply(&apps).len(), 1);

        let filter = ApplicationFilter {
            priority: Some(Priority::Low),
            ..ApplicationFilter::default()
        };
        assert!(filter.apply(&apps).is_empty());
    }

    #[test]
    fn test_recent_and_upcoming() {
        let apps = apps();
        let recent: Vec<&str> = recent_applications(&apps, 2).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(recent, vec!["c", "b"]);

        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let upcoming: Vec<&str> = upcoming_interviews(&apps, now, 3)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(upcoming, vec!["b", "a"]);
    }
}
