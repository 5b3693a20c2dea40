//! Catalog client against the in-process stub server

mod common;

use common::{PASSWORD, StubCatalog, USERNAME};
use futures::future::AbortHandle;
use icat_admin::api::operations::{save_creation, save_modification};
use icat_admin::api::{CatalogClient, CatalogError, Entity, TableFilter};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_login_and_session_info() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    assert!(client.is_logged_in());
    assert_eq!(client.username(), USERNAME);

    let info = client.session_info().await.unwrap();
    assert_eq!(info.user_name, "simple/root");
    assert!(info.remaining_minutes > 100.0);

    client.refresh().await.unwrap();
}

#[tokio::test]
async fn test_bad_credentials_are_reported() {
    let stub = StubCatalog::start().await;
    let mut client = CatalogClient::new(stub.url.clone(), &StubCatalog::client_config()).unwrap();

    let err = client.login("simple", USERNAME, "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "403: The username and password do not match");
    assert!(!client.is_logged_in());

    client.login("simple", USERNAME, PASSWORD).await.unwrap();
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_logout_ends_server_session() {
    let stub = StubCatalog::start().await;
    let mut client = stub.logged_in_client().await;
    let stale = client.connection().unwrap();
    assert_eq!(stub.session_count(), 1);

    client.logout().await.unwrap();
    assert_eq!(stub.session_count(), 0);
    assert!(!client.is_logged_in());

    let filter = TableFilter::new("Facility");
    assert!(matches!(
        client.get_entries(&filter, None).await,
        Err(CatalogError::NotLoggedIn)
    ));

    // a client rebuilt from the old session is rejected by the server
    let revived = CatalogClient::from_connection(&stale, &StubCatalog::client_config()).unwrap();
    let err = revived.session_info().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_entries_by_id() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let filter = TableFilter::new("Facility").with_where("id = 1");
    let rows = client.get_entries(&filter, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("ISIS"));

    let missing = TableFilter::new("Facility").with_where("id = 999");
    assert!(client.get_entries(&missing, None).await.unwrap().is_empty());
    assert_eq!(client.get_count(&missing, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sorting_and_paging() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let filter = TableFilter::new("Facility").with_sort("name", true).with_limit(2);
    let names: Vec<_> = client
        .get_entries(&filter, None)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("DLS"), json!("ESRF")]);

    let rest = client.get_entries(&filter.next_page(), None).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["name"], json!("ISIS"));

    assert_eq!(client.get_count(&filter, None).await.unwrap(), 3);
}

#[tokio::test]
async fn test_unknown_entity_message_is_normalized() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let filter = TableFilter::new("Spaceship");
    let err = client.get_entries(&filter, None).await.unwrap_err();
    assert_eq!(err.to_string(), "400: Unknown entity type 'Spaceship'");
}

#[tokio::test]
async fn test_get_by_id() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let facility = client.get_by_id("Facility", 2, None).await.unwrap();
    assert_eq!(facility["name"], json!("DLS"));

    let err = client.get_by_id("Facility", 42, None).await.unwrap_err();
    assert_eq!(err.to_string(), "404: Facility[id:42] not found.");
}

#[tokio::test]
async fn test_create_update_delete() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let mut draft = Entity::new();
    draft.insert("name".to_string(), json!("ILL"));
    let created = save_creation(&client, "Facility", &draft).await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], json!("ILL"));
    assert_eq!(stub.facility_count(), 4);

    let mut changes = Entity::new();
    changes.insert("fullName".to_string(), json!("Institut Laue-Langevin"));
    let saved = save_modification(&client, "Facility", id, &changes).await.unwrap();
    assert_eq!(saved["fullName"], json!("Institut Laue-Langevin"));
    assert_eq!(saved["name"], json!("ILL"));

    client.delete_entities("Facility", &[id]).await.unwrap();
    assert!(stub.facility(id).is_none());
    assert_eq!(stub.facility_count(), 3);
}

#[tokio::test]
async fn test_rejected_creation_keeps_server_message() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let err = save_creation(&client, "Facility", &Entity::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "400: Facility.name cannot be null");
    assert_eq!(stub.facility_count(), 3);
}

#[tokio::test]
async fn test_empty_delete_sends_nothing() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;
    let before = stub.requests().len();

    client.delete_entities("Facility", &[]).await.unwrap();
    assert_eq!(stub.requests().len(), before);
}

#[tokio::test]
async fn test_transient_read_failures_are_retried() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;
    stub.fail_reads(2);

    let rows = client.get_entries(&TableFilter::new("Facility"), None).await.unwrap();
    assert_eq!(rows.len(), 3);

    stub.fail_reads(5);
    let err = client.get_count(&TableFilter::new("Facility"), None).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_abort_resolves_to_cancelled() {
    let stub = StubCatalog::start().await;
    let client = stub.logged_in_client().await;

    let (handle, registration) = AbortHandle::new_pair();
    let filter = TableFilter::new("Facility").with_where("name = 'slow'");
    let request = tokio::spawn(async move { client.get_entries(&filter, Some(registration)).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();

    let result = tokio::time::timeout(Duration::from_secs(5), request)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(CatalogError::Cancelled)));
}
