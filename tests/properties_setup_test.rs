use anyhow::Result;
use faces_sync::adapters::properties::PROPERTIES;
use faces_sync::HubSpotClient;
use httpmock::prelude::*;
use serde_json::json;

const GROUP_PATH: &str = "/crm/v3/properties/contacts/groups";
const PROPERTIES_PATH: &str = "/crm/v3/properties/contacts";

#[tokio::test]
async fn provisioning_creates_every_catalog_property() -> Result<()> {
    let server = MockServer::start();

    let group = server.mock(|when, then| {
        when.method(POST).path(GROUP_PATH);
        then.status(201).json_body(json!({ "name": "faces_agency" }));
    });
    let properties = server.mock(|when, then| {
        when.method(POST).path(PROPERTIES_PATH);
        then.status(201).json_body(json!({ "createdAt": "now" }));
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");

    assert!(crm.ensure_property_group().await?);
    let report = crm.ensure_contact_properties().await?;

    group.assert();
    assert_eq!(properties.hits(), PROPERTIES.len());
    assert_eq!(report.created, PROPERTIES.len());
    assert_eq!(report.skipped, 0);
    assert!(report.is_success());

    Ok(())
}

#[tokio::test]
async fn provisioning_is_idempotent_over_conflicts() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(GROUP_PATH);
        then.status(409).body("group exists");
    });
    server.mock(|when, then| {
        when.method(POST).path(PROPERTIES_PATH);
        then.status(409).body("property exists");
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");

    // A conflicting group is fine, it just was not created this run.
    assert!(!crm.ensure_property_group().await?);
    let report = crm.ensure_contact_properties().await?;

    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, PROPERTIES.len());
    assert!(report.is_success());

    Ok(())
}

#[tokio::test]
async fn provisioning_collects_failures_without_aborting() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(GROUP_PATH);
        then.status(201).json_body(json!({}));
    });
    let properties = server.mock(|when, then| {
        when.method(POST).path(PROPERTIES_PATH);
        then.status(400).body("bad definition");
    });

    let crm = HubSpotClient::new(server.base_url(), "test-token");

    crm.ensure_property_group().await?;
    let report = crm.ensure_contact_properties().await?;

    // Every property was still attempted.
    assert_eq!(properties.hits(), PROPERTIES.len());
    assert_eq!(report.failed.len(), PROPERTIES.len());
    assert!(!report.is_success());
    assert!(report.failed[0].contains("bad definition"));

    Ok(())
}
