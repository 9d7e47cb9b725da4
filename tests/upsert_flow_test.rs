use anyhow::Result;
use faces_sync::core::upsert::{submit_application, sync_submission};
use faces_sync::domain::model::FormSubmission;
use faces_sync::{HubSpotClient, SupabaseStore};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

const SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";
const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";

fn sample_form() -> FormSubmission {
    // Deserialized from the camelCase shape the form frontend posts.
    serde_json::from_value(json!({
        "gender": "female",
        "firstName": "Maya",
        "lastName": "Khalil",
        "email": "maya@example.com",
        "mobile": "71234567",
        "mobileCountryCode": "+961",
        "whatsapp": "71234567",
        "whatsappCountryCode": "+961",
        "governorate": "Beirut",
        "languages": ["English", "Arabic"],
        "languageLevels": { "English": 5, "Arabic": 4 },
        "hairType": "wavy",
        "hasTattoos": false,
        "hasPiercings": false
    }))
    .expect("sample form should deserialize")
}

#[tokio::test]
async fn submission_updates_the_contact_found_by_phone() -> Result<()> {
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(POST)
            .path(SEARCH_PATH)
            .body_contains("+961 71234567");
        then.status(200)
            .json_body(json!({ "total": 1, "results": [{ "id": "301" }] }));
    });
    let update = server.mock(|when, then| {
        when.method(PATCH).path(format!("{}/301", CONTACTS_PATH));
        then.status(200).json_body(json!({ "id": "301" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let outcome = sync_submission(&crm, &sample_form(), None).await;

    search.assert();
    update.assert();
    assert!(outcome.success);
    assert!(outcome.updated);
    assert_eq!(outcome.contact_id.as_deref(), Some("301"));

    Ok(())
}

#[tokio::test]
async fn submission_creates_a_contact_when_the_search_misses() -> Result<()> {
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(200).json_body(json!({ "total": 0, "results": [] }));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path(CONTACTS_PATH)
            .body_contains("maya@example.com");
        then.status(201).json_body(json!({ "id": "77" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let outcome = sync_submission(&crm, &sample_form(), None).await;

    search.assert();
    create.assert();
    assert!(outcome.success);
    assert!(!outcome.updated);
    assert_eq!(outcome.contact_id.as_deref(), Some("77"));

    Ok(())
}

#[tokio::test]
async fn search_failure_falls_open_to_create() -> Result<()> {
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(500).body("search is down");
    });
    let create = server.mock(|when, then| {
        when.method(POST).path(CONTACTS_PATH);
        then.status(201).json_body(json!({ "id": "88" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let outcome = sync_submission(&crm, &sample_form(), None).await;

    search.assert();
    create.assert();
    assert!(outcome.success);
    assert!(!outcome.updated);

    Ok(())
}

#[tokio::test]
async fn create_failure_surfaces_as_a_structured_outcome() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(200).json_body(json!({ "total": 0, "results": [] }));
    });
    server.mock(|when, then| {
        when.method(POST).path(CONTACTS_PATH);
        then.status(400).body("INVALID_EMAIL");
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let outcome = sync_submission(&crm, &sample_form(), None).await;

    assert!(!outcome.success);
    assert!(outcome.contact_id.is_none());
    assert!(outcome.error.as_deref().unwrap_or("").contains("INVALID_EMAIL"));

    Ok(())
}

#[tokio::test]
async fn submit_stores_the_row_then_mirrors_it_with_the_store_id() -> Result<()> {
    let server = MockServer::start();

    let insert = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/applications")
            .body_contains("Maya");
        then.status(201).json_body(json!([{ "id": "row-42" }]));
    });
    let search = server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(200).json_body(json!({ "total": 0, "results": [] }));
    });
    // The CRM contact must carry the store row id.
    let create = server.mock(|when, then| {
        when.method(POST).path(CONTACTS_PATH).body_contains("row-42");
        then.status(201).json_body(json!({ "id": "99" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let store = SupabaseStore::new(server.base_url(), "anon-key", "applications");

    let outcome = submit_application(&crm, &store, &sample_form()).await;

    insert.assert();
    search.assert();
    create.assert();
    assert!(outcome.success);
    assert_eq!(outcome.contact_id.as_deref(), Some("99"));

    Ok(())
}

#[tokio::test]
async fn crm_failure_after_store_success_is_reported_not_rolled_back() -> Result<()> {
    let server = MockServer::start();

    let insert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/applications");
        then.status(201).json_body(json!([{ "id": "row-7" }]));
    });
    server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(200).json_body(json!({ "total": 0, "results": [] }));
    });
    server.mock(|when, then| {
        when.method(POST).path(CONTACTS_PATH);
        then.status(502).body("upstream unavailable");
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let store = SupabaseStore::new(server.base_url(), "anon-key", "applications");

    let outcome = submit_application(&crm, &store, &sample_form()).await;

    // The store insert stands; only the mirror failed.
    insert.assert();
    assert!(!outcome.success);
    assert!(outcome
        .error
        .as_deref()
        .unwrap_or("")
        .contains("upstream unavailable"));

    Ok(())
}

#[tokio::test]
async fn store_failure_still_syncs_the_crm_without_a_store_id() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/applications");
        then.status(500).body("db down");
    });
    server.mock(|when, then| {
        when.method(POST).path(SEARCH_PATH);
        then.status(200).json_body(json!({ "total": 0, "results": [] }));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path(CONTACTS_PATH);
        then.status(201).json_body(json!({ "id": "55" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");
    let store = SupabaseStore::new(server.base_url(), "anon-key", "applications");

    let outcome = submit_application(&crm, &store, &sample_form()).await;

    create.assert();
    assert!(outcome.success);
    assert_eq!(outcome.contact_id.as_deref(), Some("55"));

    Ok(())
}
