use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use jobtrack_core::application::{ApplicationStatus, JobApplication, NewApplication};
use jobtrack_core::document::NewResume;
use jobtrack_core::session::{AuthEvent, Session, UserIdentity};
use jobtrack_core::sync::{KeyValueStore, LocalKey};
use jobtrack_infrastructure::MemoryKeyValueStore;

use super::{MonitorPhase, SessionMonitor, SyncTimeouts};
use crate::store::TrackerStore;
use crate::test_support::{MockAuthProvider, MockRemoteStore, RemoteCall, StepClock};

fn alice() -> UserIdentity {
    UserIdentity::new("alice").with_email("alice@example.com")
}

fn remote_app(id: &str, company: &str) -> JobApplication {
    NewApplication::new(company, "Engineer", ApplicationStatus::Applied)
        .into_record(id.to_string(), chrono::Utc::now())
}

fn local_with(apps: &[JobApplication]) -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::with_entries([(
        LocalKey::Applications.as_ref(),
        serde_json::to_string(apps).unwrap(),
    )]))
}

fn new_store(remote: Arc<MockRemoteStore>, local: Arc<MemoryKeyValueStore>) -> Arc<TrackerStore> {
    Arc::new(TrackerStore::new(remote, local, Arc::new(StepClock::new())).unwrap())
}

#[tokio::test]
async fn test_anonymous_startup_loads_local_data() {
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let store = new_store(Arc::new(MockRemoteStore::default()), local);
    let auth = Arc::new(MockAuthProvider::new(Session::Anonymous));

    let monitor = SessionMonitor::start(store.clone(), auth, SyncTimeouts::default()).await;

    assert_eq!(monitor.phase(), MonitorPhase::Anonymous);
    let state = store.snapshot().await;
    assert!(state.initialized);
    assert!(!state.loading);
    assert_eq!(state.session, Session::Anonymous);
    assert_eq!(state.applications.len(), 1);
    assert_eq!(state.applications[0].company_name, "Local Co");
}

#[tokio::test]
async fn test_authenticated_startup_survives_failed_resume_fetch() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![remote_app("r-1", "Remote Co")]));
    remote.fail_resume_fetch.store(true, Ordering::SeqCst);
    let store = new_store(remote, Arc::new(MemoryKeyValueStore::new()));
    let auth = Arc::new(MockAuthProvider::new(Session::Authenticated(alice())));

    let monitor = SessionMonitor::start(store.clone(), auth, SyncTimeouts::default()).await;

    assert_eq!(monitor.phase(), MonitorPhase::Authenticated);
    let state = store.snapshot().await;
    assert!(state.initialized);
    assert!(!state.loading);
    assert_eq!(state.applications.len(), 1);
    assert!(state.resumes.is_empty());
    assert!(state.cover_letters.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_auth_lookup_continues_anonymously() {
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let store = new_store(Arc::new(MockRemoteStore::default()), local);
    let auth = Arc::new(MockAuthProvider::slow(
        Session::Authenticated(alice()),
        Duration::from_secs(60),
    ));

    let monitor = SessionMonitor::start(store.clone(), auth, SyncTimeouts::default()).await;

    assert_eq!(monitor.phase(), MonitorPhase::Anonymous);
    assert_eq!(store.session().await, Session::Anonymous);
    assert_eq!(store.applications().await.len(), 1);
    assert!(store.is_initialized().await);
}

#[tokio::test(start_paused = true)]
async fn test_slow_initial_load_falls_back_to_local() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![remote_app("r-1", "Remote Co")]));
    *remote.fetch_delay.lock().unwrap() = Some(Duration::from_secs(60));
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let store = new_store(remote, local);
    let auth = Arc::new(MockAuthProvider::new(Session::Authenticated(alice())));

    let monitor = SessionMonitor::start(store.clone(), auth, SyncTimeouts::default()).await;

    assert_eq!(monitor.phase(), MonitorPhase::Anonymous);
    let state = store.snapshot().await;
    assert_eq!(state.session, Session::Anonymous);
    assert_eq!(state.applications[0].company_name, "Local Co");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_sign_out_clears_collections_and_switches_to_local() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![
        remote_app("r-1", "Remote Co"),
        remote_app("r-2", "Other Co"),
    ]));
    let local = Arc::new(MemoryKeyValueStore::new());
    let store = new_store(remote.clone(), local.clone());
    let auth = Arc::new(MockAuthProvider::new(Session::Authenticated(alice())));
    let monitor = SessionMonitor::start(store.clone(), auth.clone(), SyncTimeouts::default()).await;
    store.add_resume(NewResume::new("General")).await;
    assert_eq!(store.applications().await.len(), 2);

    auth.emit(AuthEvent::SignedOut);
    let status = monitor.wait_for_events(1).await.unwrap();

    assert_eq!(status.phase, MonitorPhase::Anonymous);
    let state = store.snapshot().await;
    assert_eq!(state.session, Session::Anonymous);
    assert!(state.applications.is_empty());
    assert!(state.resumes.is_empty());
    assert!(state.cover_letters.is_empty());
    assert!(!state.loading);

    // Writes after sign-out stay local.
    store.flush().await;
    let calls_before = remote.calls().len();
    store
        .add_application(NewApplication::new("Acme", "Engineer", ApplicationStatus::Interested))
        .await;
    store.flush().await;
    assert_eq!(remote.calls().len(), calls_before);
    let stored = local.get(LocalKey::Applications.as_ref()).await.unwrap().unwrap();
    assert!(stored.contains("Acme"));
}

#[tokio::test]
async fn test_sign_in_replaces_local_data_with_remote() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![remote_app("r-1", "Remote Co")]));
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let store = new_store(remote.clone(), local);
    let auth = Arc::new(MockAuthProvider::new(Session::Anonymous));
    let monitor = SessionMonitor::start(store.clone(), auth.clone(), SyncTimeouts::default()).await;
    assert_eq!(store.applications().await[0].company_name, "Local Co");

    auth.emit(AuthEvent::SignedIn { user: alice() });
    let status = monitor.wait_for_events(1).await.unwrap();

    assert_eq!(status.phase, MonitorPhase::Authenticated);
    assert_eq!(store.session().await.user_id(), Some("alice"));
    let apps = store.applications().await;
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].company_name, "Remote Co");

    let added = store
        .add_application(NewApplication::new("Acme", "Engineer", ApplicationStatus::Interested))
        .await;
    store.flush().await;
    assert_eq!(
        remote.calls(),
        vec![RemoteCall::InsertApplication {
            user_id: "alice".to_string(),
            id: added.id
        }]
    );
}

#[tokio::test]
async fn test_anonymous_add_survives_restart() {
    let local = Arc::new(MemoryKeyValueStore::new());

    let store = new_store(Arc::new(MockRemoteStore::default()), local.clone());
    let auth = Arc::new(MockAuthProvider::new(Session::Anonymous));
    let monitor = SessionMonitor::start(store.clone(), auth.clone(), SyncTimeouts::default()).await;
    let mut input = NewApplication::new("Acme", "Engineer", ApplicationStatus::Applied);
    input.date_applied = Some("2024-01-01".to_string());
    store.add_application(input).await;
    assert_eq!(store.applications().await.len(), 1);
    monitor.shutdown().await;
    store.close().await;

    let restarted = new_store(Arc::new(MockRemoteStore::default()), local);
    let _monitor = SessionMonitor::start(restarted.clone(), auth, SyncTimeouts::default()).await;
    let apps = restarted.applications().await;
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].company_name, "Acme");
    assert_eq!(apps[0].date_applied.as_deref(), Some("2024-01-01"));
}

#[tokio::test]
async fn test_sign_out_restores_local_data_without_overwriting_it() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![remote_app("r-1", "Remote Co")]));
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let seeded = local.get(LocalKey::Applications.as_ref()).await.unwrap();
    let store = new_store(remote, local.clone());
    let auth = Arc::new(MockAuthProvider::new(Session::Authenticated(alice())));
    let monitor = SessionMonitor::start(store.clone(), auth.clone(), SyncTimeouts::default()).await;
    assert_eq!(store.applications().await[0].company_name, "Remote Co");

    auth.emit(AuthEvent::SignedOut);
    monitor.wait_for_events(1).await.unwrap();

    let companies: Vec<String> = store
        .applications()
        .await
        .into_iter()
        .map(|a| a.company_name)
        .collect();
    assert_eq!(companies, vec!["Local Co".to_string()]);
    assert_eq!(store.session().await, Session::Anonymous);
    assert_eq!(local.get(LocalKey::Applications.as_ref()).await.unwrap(), seeded);
}

#[tokio::test(start_paused = true)]
async fn test_slow_sign_in_reload_leaves_collections_empty() {
    let remote = Arc::new(MockRemoteStore::with_applications(vec![remote_app("r-1", "Remote Co")]));
    let local = local_with(&[remote_app("local-1", "Local Co")]);
    let seeded = local.get(LocalKey::Applications.as_ref()).await.unwrap();
    let store = new_store(remote.clone(), local.clone());
    let auth = Arc::new(MockAuthProvider::new(Session::Anonymous));
    let monitor = SessionMonitor::start(store.clone(), auth.clone(), SyncTimeouts::default()).await;
    assert_eq!(store.applications().await.len(), 1);

    *remote.fetch_delay.lock().unwrap() = Some(Duration::from_secs(60));
    auth.emit(AuthEvent::SignedIn { user: alice() });
    let status = monitor.wait_for_events(1).await.unwrap();

    assert_eq!(status.phase, MonitorPhase::Authenticated);
    let state = store.snapshot().await;
    assert_eq!(state.session.user_id(), Some("alice"));
    assert!(state.applications.is_empty());
    assert!(state.resumes.is_empty());
    assert!(state.cover_letters.is_empty());
    assert!(!state.loading);
    assert_eq!(local.get(LocalKey::Applications.as_ref()).await.unwrap(), seeded);
}
