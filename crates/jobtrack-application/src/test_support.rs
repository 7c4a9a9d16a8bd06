//! Test doubles shared by the store and monitor tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jobtrack_core::application::{ApplicationPatch, JobApplication};
use jobtrack_core::clock::Clock;
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::session::{AuthEvent, Session};
use jobtrack_core::sync::{AuthProvider, RemoteStore};
use tokio::sync::broadcast;

/// A clock that advances one second on every read.
pub struct StepClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.base + chrono::Duration::seconds(tick)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    InsertApplication { user_id: String, id: String },
    UpdateApplication {
        user_id: String,
        id: String,
        patch: ApplicationPatch,
        updated_at: DateTime<Utc>,
    },
    DeleteApplication { user_id: String, id: String },
    InsertResume { user_id: String, id: String },
    InsertCoverLetter { user_id: String, id: String },
}

/// In-memory remote store keyed by nothing but the records it was seeded
/// with. Records every write it receives.
#[derive(Default)]
pub struct MockRemoteStore {
    pub applications: Mutex<Vec<JobApplication>>,
    pub resumes: Mutex<Vec<Resume>>,
    pub cover_letters: Mutex<Vec<CoverLetter>>,
    pub fail_resume_fetch: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fetch_delay: Mutex<Option<Duration>>,
    pub calls: Mutex<Vec<RemoteCall>>,
}

impl MockRemoteStore {
    pub fn with_applications(applications: Vec<JobApplication>) -> Self {
        Self {
            applications: Mutex::new(applications),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn before_fetch(&self) {
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn record(&self, call: RemoteCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackerError::transport("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn fetch_applications(&self, _user_id: &str) -> Result<Vec<JobApplication>> {
        self.before_fetch().await;
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn fetch_resumes(&self, _user_id: &str) -> Result<Vec<Resume>> {
        self.before_fetch().await;
        if self.fail_resume_fetch.load(Ordering::SeqCst) {
            return Err(TrackerError::remote(500, "resumes unavailable"));
        }
        Ok(self.resumes.lock().unwrap().clone())
    }

    async fn fetch_cover_letters(&self, _user_id: &str) -> Result<Vec<CoverLetter>> {
        self.before_fetch().await;
        Ok(self.cover_letters.lock().unwrap().clone())
    }

    async fn insert_application(&self, user_id: &str, application: &JobApplication) -> Result<()> {
        self.record(RemoteCall::InsertApplication {
            user_id: user_id.to_string(),
            id: application.id.clone(),
        })
    }

    async fn update_application(
        &self,
        user_id: &str,
        id: &str,
        patch: &ApplicationPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.record(RemoteCall::UpdateApplication {
            user_id: user_id.to_string(),
            id: id.to_string(),
            patch: patch.clone(),
            updated_at,
        })
    }

    async fn delete_application(&self, user_id: &str, id: &str) -> Result<()> {
        self.record(RemoteCall::DeleteApplication {
            user_id: user_id.to_string(),
            id: id.to_string(),
        })
    }

    async fn insert_resume(&self, user_id: &str, resume: &Resume) -> Result<()> {
        self.record(RemoteCall::InsertResume {
            user_id: user_id.to_string(),
            id: resume.id.clone(),
        })
    }

    async fn insert_cover_letter(&self, user_id: &str, cover_letter: &CoverLetter) -> Result<()> {
        self.record(RemoteCall::InsertCoverLetter {
            user_id: user_id.to_string(),
            id: cover_letter.id.clone(),
        })
    }
}

/// Auth provider whose session and events are driven by the test.
pub struct MockAuthProvider {
    session: Mutex<Session>,
    delay: Option<Duration>,
    events: broadcast::Sender<AuthEvent>,
}

impl MockAuthProvider {
    pub fn new(session: Session) -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            session: Mutex::new(session),
            delay: None,
            events,
        }
    }

    /// A provider whose session lookup takes `delay`.
    pub fn slow(session: Session, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(session)
        }
    }

    pub fn emit(&self, event: AuthEvent) {
        *self.session.lock().unwrap() = match &event {
            AuthEvent::SignedIn { user } => Session::Authenticated(user.clone()),
            AuthEvent::SignedOut => Session::Anonymous,
        };
        self.events.send(event).unwrap();
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn current_session(&self) -> Result<Session> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.session.lock().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
