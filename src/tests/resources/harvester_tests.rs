use super::create_test_client;
use crate::{ImportError, MigrationBackend};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

#[tokio::test]
async fn test_capabilities() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/capabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "harvesterVersion": "v1.6.1",
            "hasAdvancedPower": true
        })))
        .mount(&mock_server)
        .await;

    let caps = client.capabilities().await.unwrap();
    assert_eq!(caps.harvester_version, "v1.6.1");
    assert!(caps.has_advanced_power);
    assert!(caps.compatibility_notice().is_none());
}

#[tokio::test]
async fn test_capabilities_or_default_on_error() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/capabilities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let caps = client.capabilities_or_default().await;
    assert!(!caps.has_advanced_power);
    assert!(caps.harvester_version.is_empty());
}

#[tokio::test]
async fn test_wizard_catalog_lists() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"metadata": {"name": "default"}},
            {"metadata": {"name": "ns1"}}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vlanconfigs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"metadata": {"name": "mgmt-vlan", "namespace": "ns1"}}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/storageclasses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"metadata": {"name": "longhorn"}, "provisioner": "driver.longhorn.io"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/virtualmachines/ns1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let namespaces = client.list_namespaces().await.unwrap();
    assert_eq!(
        namespaces.iter().map(|ns| ns.name()).collect::<Vec<_>>(),
        vec!["default", "ns1"]
    );

    let networks = client.list_networks().await.unwrap();
    assert_eq!(networks[0].destination(), "ns1/mgmt-vlan");

    let classes = client.list_storage_classes().await.unwrap();
    assert_eq!(classes[0].name(), "longhorn");
    assert_eq!(classes[0].provisioner.as_deref(), Some("driver.longhorn.io"));

    assert!(client.list_virtual_machines("ns1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_namespace() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/v1/harvester/namespaces"))
        .and(body_json(json!({"name": "imports"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "created"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client.create_namespace("imports").await.unwrap();
}

#[tokio::test]
async fn test_create_namespace_forbidden() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/v1/harvester/namespaces"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "namespaces is forbidden"
        })))
        .mount(&mock_server)
        .await;

    let err = client.create_namespace("imports").await.unwrap_err();
    assert!(matches!(err, ImportError::Api { status: 403, .. }));
    assert_eq!(err.user_message(), "namespaces is forbidden");
}
