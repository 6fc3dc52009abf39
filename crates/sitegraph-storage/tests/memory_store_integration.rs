//! Memory store integration tests.
//!
//! These tests load JSON fixtures into [`MemoryEntityStore`] and drive the
//! [`SiteService`] against it end to end.

use std::io::Write;
use std::sync::{Arc, Mutex};

use sitegraph_domain::model::{AuthorizableId, Sort, SortField};
use sitegraph_domain::{DomainError, EntityStore, EventSink, SiteEvent, SiteEventKind, SiteService};
use sitegraph_storage::{MemoryEntityStore, StorageError};

const FIXTURE: &str = r#"{
    "users": [{ "id": "alice" }, { "id": "bob" }, { "id": "carol" }, { "id": "dave" }],
    "groups": [
        { "id": "g-physics-members", "joinable": "yes", "sites": ["/sites/physics"], "members": ["alice", "g-physics-tas"] },
        { "id": "g-physics-tas", "sites": ["/sites/physics"], "members": ["carol", "g-physics-members"] },
        { "id": "g-chem", "joinable": "no", "sites": ["/sites/chem"], "members": ["alice"] }
    ],
    "others": [{ "id": "svc-backup", "type_name": "service" }],
    "profiles": [
        { "user_id": "alice", "first_name": "Alice", "last_name": "Liddell", "email": "alice@example.org" },
        { "user_id": "bob", "first_name": "Bob", "last_name": "Jones" },
        { "user_id": "carol", "first_name": "Carol", "last_name": "Adams" }
    ],
    "nodes": [
        { "path": "/" },
        { "path": "/sites" },
        { "path": "/sites/physics", "resource_type": "sakai/site", "joinable": "yes",
          "authorizables": ["g-physics-members", "svc-backup", "ghost"], "text": "Physics 101" },
        { "path": "/sites/chem", "resource_type": "sakai/site", "authorizables": ["g-chem"], "text": "Chemistry" }
    ]
}"#;

#[derive(Default)]
struct Recorder(Mutex<Vec<SiteEvent>>);

impl EventSink for Recorder {
    fn post(&self, event: SiteEvent) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }
}

fn service() -> (
    Arc<MemoryEntityStore>,
    Arc<Recorder>,
    SiteService<MemoryEntityStore, MemoryEntityStore>,
) {
    let store = Arc::new(MemoryEntityStore::from_json(FIXTURE).unwrap());
    let events = Arc::new(Recorder::default());
    let service = SiteService::new(Arc::clone(&store), Arc::clone(&store), events.clone());
    (store, events, service)
}

async fn site(store: &MemoryEntityStore, path: &str) -> sitegraph_domain::model::ContentNode {
    store.node(path).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_fixture_site_listing_end_to_end() {
    let (store, _events, service) = service();
    let physics = site(&store, "/sites/physics").await;

    let page = service
        .get_members(&physics, 0, 10, &[Sort::asc(SortField::LastName)])
        .await
        .unwrap();
    assert_eq!(page.total(), 2);
    let ids: Vec<String> = page.map(|u| u.id.to_string()).collect();
    assert_eq!(ids, ["carol", "alice"]);

    let groups = service.get_groups(&physics, 0, 10, &[]).await.unwrap();
    let ids: Vec<String> = groups.map(|g| g.id.to_string()).collect();
    assert_eq!(ids, ["g-physics-members", "g-physics-tas"]);
}

#[tokio::test]
async fn test_fixture_join_and_unjoin() {
    let (store, events, service) = service();
    let physics = site(&store, "/sites/physics").await;
    let bob = AuthorizableId::from("bob");
    let group = AuthorizableId::from("g-physics-members");

    service.join_site(&physics, &bob, &group).await.unwrap();
    assert!(service.is_member(&physics, &bob).await);
    assert_eq!(service.get_member_count(&physics).await.unwrap().count, 3);

    let again = service.join_site(&physics, &bob, &group).await;
    assert!(matches!(again, Err(DomainError::Conflict { .. })));

    service.unjoin_site(&physics, &bob, &group).await.unwrap();
    assert!(!service.is_member(&physics, &bob).await);

    let kinds: Vec<SiteEventKind> = events.0.lock().unwrap().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, [SiteEventKind::JoinedSite, SiteEventKind::UnjoinedSite]);
}

#[tokio::test]
async fn test_fixture_membership_and_lookup() {
    let (_store, _events, service) = service();

    let sites = service.get_membership(&"alice".into()).await.unwrap();
    let paths: Vec<&str> = sites.keys().map(String::as_str).collect();
    assert_eq!(paths, ["/sites/chem", "/sites/physics"]);

    let found = service
        .find_site_by_path("/sites/physics/calendar/2024")
        .await
        .unwrap();
    assert_eq!(found.map(|n| n.path), Some("/sites/physics".to_string()));

    let found = service.find_site_by_name("chemistry").await.unwrap();
    assert_eq!(found.map(|n| n.path), Some("/sites/chem".to_string()));
}

#[tokio::test]
async fn test_fixture_missing_profile_fails_listing() {
    let (store, _events, service) = service();
    store
        .add_member(
            &sitegraph_domain::model::Group::new("g-physics-tas"),
            &"dave".into(),
        )
        .await
        .unwrap();
    let physics = site(&store, "/sites/physics").await;

    let result = service.get_members(&physics, 0, 10, &[]).await;
    assert!(matches!(result, Err(DomainError::ProfileNotFound { .. })));
}

#[test]
fn test_fixture_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();

    let store = MemoryEntityStore::from_path(file.path()).unwrap();
    drop(store);

    let result = MemoryEntityStore::from_path(file.path().with_extension("missing"));
    assert!(matches!(result, Err(StorageError::IoError { .. })));
}

#[test]
fn test_fixture_with_duplicate_ids_is_rejected() {
    let result = MemoryEntityStore::from_json(
        r#"{ "users": [{ "id": "alice" }], "groups": [{ "id": "alice" }] }"#,
    );
    assert!(matches!(result, Err(StorageError::DuplicateEntity { .. })));
}
