//! In-memory tracker state and its reducer.

use chrono::{DateTime, Utc};
use jobtrack_core::application::{ApplicationPatch, JobApplication};
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::session::Session;
use jobtrack_core::sync::LocalKey;

/// The three record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Applications,
    Resumes,
    CoverLetters,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Applications,
        Collection::Resumes,
        Collection::CoverLetters,
    ];

    pub fn local_key(self) -> LocalKey {
        match self {
            Collection::Applications => LocalKey::Applications,
            Collection::Resumes => LocalKey::Resumes,
            Collection::CoverLetters => LocalKey::CoverLetters,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Collection::Applications => "applications",
            Collection::Resumes => "resumes",
            Collection::CoverLetters => "cover letters",
        }
    }
}

/// Everything the view layer reads.
///
/// Starts out `loading` and not `initialized`; the session monitor flips
/// both once the first load has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub applications: Vec<JobApplication>,
    pub resumes: Vec<Resume>,
    pub cover_letters: Vec<CoverLetter>,
    pub session: Session,
    pub loading: bool,
    pub initialized: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            applications: Vec::new(),
            resumes: Vec::new(),
            cover_letters: Vec::new(),
            session: Session::Anonymous,
            loading: true,
            initialized: false,
        }
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetApplications(Vec<JobApplication>),
    AddApplication(JobApplication),
    UpdateApplication {
        id: String,
        patch: ApplicationPatch,
        at: DateTime<Utc>,
    },
    DeleteApplication(String),
    SetResumes(Vec<Resume>),
    AddResume(Resume),
    SetCoverLetters(Vec<CoverLetter>),
    AddCoverLetter(CoverLetter),
    SetSession(Session),
    SetLoading(bool),
    SetInitialized(bool),
}

impl TrackerState {
    /// Applies `action` and returns the collection it changed, if any.
    ///
    /// Updates and deletes naming an unknown id change nothing.
    pub fn reduce(&mut self, action: Action) -> Option<Collection> {
        match action {
            Action::SetApplications(records) => {
                self.applications = records;
                Some(Collection::Applications)
            }
            Action::AddApplication(record) => {
                self.applications.push(record);
                Some(Collection::Applications)
            }
            Action::UpdateApplication { id, patch, at } => {
                let record = self.applications.iter_mut().find(|a| a.id == id)?;
                patch.apply_to(record, at);
                Some(Collection::Applications)
            }
            Action::DeleteApplication(id) => {
                let before = self.applications.len();
                self.applications.retain(|a| a.id != id);
                (self.applications.len() != before).then_some(Collection::Applications)
            }
            Action::SetResumes(records) => {
                self.resumes = records;
                Some(Collection::Resumes)
            }
            Action::AddResume(record) => {
                self.resumes.push(record);
                Some(Collection::Resumes)
            }
            Action::SetCoverLetters(records) => {
                self.cover_letters = records;
                Some(Collection::CoverLetters)
            }
            Action::AddCoverLetter(record) => {
                self.cover_letters.push(record);
                Some(Collection::CoverLetters)
            }
            Action::SetSession(session) => {
                self.session = session;
                None
            }
            Action::SetLoading(loading) => {
                self.loading = loading;
                None
            }
            Action::SetInitialized(initialized) => {
                self.initialized = initialized;
                None
            }
        }
    }

    /// Local snapshots are written only for anonymous sessions, and only
    /// once the initial load is over.
    pub fn snapshots_enabled(&self) -> bool {
        !self.session.is_authenticated() && self.initialized && !self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobtrack_core::application::{ApplicationStatus, NewApplication};
    use jobtrack_core::session::UserIdentity;

    fn app(id: &str) -> JobApplication {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        NewApplication::new("Acme", "Engineer", ApplicationStatus::Interested)
            .into_record(id.to_string(), at)
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = TrackerState::default();
        assert!(state.loading);
        assert!(!state.initialized);
        assert!(!state.snapshots_enabled());
    }

    #[test]
    fn test_add_update_delete() {
        let mut state = TrackerState::default();
        assert_eq!(
            state.reduce(Action::AddApplication(app("a"))),
            Some(Collection::Applications)
        );

        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let changed = state.reduce(Action::UpdateApplication {
            id: "a".to_string(),
            patch: ApplicationPatch::status(ApplicationStatus::Applied),
            at,
        });
        assert_eq!(changed, Some(Collection::Applications));
        assert_eq!(state.applications[0].status, ApplicationStatus::Applied);
        assert_eq!(state.applications[0].updated_at, at);

        assert_eq!(
            state.reduce(Action::DeleteApplication("a".to_string())),
            Some(Collection::Applications)
        );
        assert!(state.applications.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut state = TrackerState::default();
        state.reduce(Action::AddApplication(app("a")));
        let before = state.clone();

        let changed = state.reduce(Action::UpdateApplication {
            id: "missing".to_string(),
            patch: ApplicationPatch::status(ApplicationStatus::Offer),
            at: Utc::now(),
        });
        assert_eq!(changed, None);
        assert_eq!(state.reduce(Action::DeleteApplication("missing".to_string())), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_snapshots_disabled_for_authenticated_session() {
        let mut state = TrackerState::default();
        state.reduce(Action::SetLoading(false));
        state.reduce(Action::SetInitialized(true));
        assert!(state.snapshots_enabled());

        state.reduce(Action::SetSession(Session::Authenticated(UserIdentity::new("u"))));
        assert!(!state.snapshots_enabled());
    }
}
