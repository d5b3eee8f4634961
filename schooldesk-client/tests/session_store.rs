use schooldesk_client::{Session, SessionContext, SessionEvent, SessionStore};
use schooldesk_model::prelude::*;

fn teacher() -> Profile {
    Profile::new(AccountId(4), 40, ActorKind::Teacher)
        .with_display_name("Ms. Iyer")
        .with_scd(Some(1), None, None)
        .with_allocations([TeacherAllocation {
            class_id: 3,
            division_id: Some(30),
        }])
}

#[test]
fn missing_blob_is_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn sign_in_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let context = SessionContext::with_store(SessionStore::at(&path)).unwrap();
    context.sign_in(Session::new("tok", teacher())).unwrap();
    assert!(path.exists());

    let reloaded = SessionContext::with_store(SessionStore::at(&path)).unwrap();
    assert_eq!(reloaded.profile(), Some(teacher()));
    assert_eq!(reloaded.access_token().as_deref().map(String::as_str), Some("tok"));
    assert_eq!(
        *reloaded.subscribe().borrow(),
        SessionEvent::SignedIn {
            account_id: AccountId(4)
        }
    );
}

#[cfg(unix)]
#[test]
fn blob_is_private_to_user() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));
    store.save(&Session::new("tok", teacher())).unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn corrupt_blob_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let context = SessionContext::with_store(SessionStore::at(&path)).unwrap();
    assert!(!context.is_signed_in());
    assert!(!path.exists());
}

#[test]
fn invalid_profile_blob_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let unscoped = Profile::new(AccountId(8), 80, ActorKind::Student);
    let raw = serde_json::json!({
        "accessToken": "tok",
        "profile": unscoped,
        "storedAt": "2026-01-05T08:00:00Z"
    });
    std::fs::write(&path, raw.to_string()).unwrap();

    let store = SessionStore::at(&path);
    assert!(store.load().unwrap().is_none());
    assert!(!path.exists());
}

#[test]
fn sign_out_removes_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let context = SessionContext::with_store(SessionStore::at(&path)).unwrap();
    context.sign_in(Session::new("tok", teacher())).unwrap();

    context.sign_out().unwrap();
    assert!(!path.exists());
    assert!(context.access_token().is_none());
}
