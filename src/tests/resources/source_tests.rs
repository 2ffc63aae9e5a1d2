use super::create_test_client;
use crate::dashboard::{OvaSourceForm, SourceForm, VmwareSourceForm};
use crate::{MigrationBackend, ObjectKey, SourceKind};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn vc1_json() -> serde_json::Value {
    json!({
        "apiVersion": "migration.harvesterhci.io/v1beta1",
        "kind": "VmwareSource",
        "metadata": {"name": "vc1", "namespace": "ns1"},
        "spec": {
            "endpoint": "https://vcenter.example.com/sdk",
            "dc": "DC1",
            "credentials": {"name": "vc1", "namespace": "ns1"}
        }
    })
}

#[tokio::test]
async fn test_vmware_sources_list_and_get() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([vc1_json()])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources/ns1/vc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vc1_json()))
        .mount(&mock_server)
        .await;

    let sources = client.list_vmware_sources().await.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].spec.dc, "DC1");
    assert_eq!(sources[0].spec.credentials.to_string(), "ns1/vc1");

    let source = client
        .get_vmware_source(&ObjectKey::new("ns1", "vc1"))
        .await
        .unwrap();
    assert_eq!(source.spec.endpoint, "https://vcenter.example.com/sdk");
}

#[tokio::test]
async fn test_create_vmware_source_from_form() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/v1/harvester/vmwaresources"))
        .and(body_json(json!({
            "name": "vc2",
            "namespace": "default",
            "endpoint": "https://vc2.example.com/sdk",
            "datacenter": "DC2",
            "username": "administrator@vsphere.local",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(vc1_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut form = VmwareSourceForm::create();
    form.set_name("vc2").unwrap();
    form.endpoint = "https://vc2.example.com/sdk".to_string();
    form.datacenter = "DC2".to_string();
    form.username = "administrator@vsphere.local".to_string();
    form.password = "s3cret".to_string();

    form.submit(&client).await.unwrap();
}

#[tokio::test]
async fn test_edit_with_blank_password_omits_it() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources/ns1/vc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vc1_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/harvester/vmwaresources/ns1/vc1"))
        .and(body_json(json!({
            "name": "vc1",
            "namespace": "ns1",
            "endpoint": "https://vcenter.example.com/sdk",
            "datacenter": "DC9",
            "username": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vc1_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = client
        .get_vmware_source(&ObjectKey::new("ns1", "vc1"))
        .await
        .unwrap();
    let mut form = VmwareSourceForm::edit(&source);
    assert!(form.password.is_empty());
    assert!(form.set_name("other").is_err());

    form.datacenter = "DC9".to_string();
    SourceForm::Vmware(form).submit(&client).await.unwrap();
}

#[tokio::test]
async fn test_ova_source_create_and_list() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/v1/harvester/ovasources"))
        .and(body_json(json!({
            "name": "ova1",
            "namespace": "ns1",
            "url": "https://files.example.com/web.ova",
            "httpTimeoutSeconds": 600,
            "username": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "metadata": {"name": "ova1", "namespace": "ns1"},
            "spec": {"url": "https://files.example.com/web.ova", "httpTimeoutSeconds": 600}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/ovasources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "metadata": {"name": "ova1", "namespace": "ns1"},
            "spec": {"url": "https://files.example.com/web.ova", "httpTimeoutSeconds": 600}
        }])))
        .mount(&mock_server)
        .await;

    let mut form = OvaSourceForm::create();
    form.set_name("ova1").unwrap();
    form.set_namespace("ns1").unwrap();
    form.url = "https://files.example.com/web.ova".to_string();
    form.http_timeout_seconds = Some(600);
    form.submit(&client).await.unwrap();

    let sources = client.list_ova_sources().await.unwrap();
    assert_eq!(sources[0].spec.http_timeout_seconds, Some(600));
    assert!(sources[0].spec.credentials.is_none());
}

#[tokio::test]
async fn test_delete_source_then_list_no_longer_contains_it() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([vc1_json()])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/harvester/vmwaresources/ns1/vc1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let key = ObjectKey::new("ns1", "vc1");
    let before = client.list_vmware_sources().await.unwrap();
    assert!(before.iter().any(|s| s.key() == key));

    client.delete_source(SourceKind::Vmware, &key).await.unwrap();

    let after = client.list_vmware_sources().await.unwrap();
    assert!(after.iter().all(|s| s.key() != key));
}

#[tokio::test]
async fn test_source_yaml_and_encoded_names() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/ovasources/ns1/ova%201/yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("kind: OvaSource\n"))
        .mount(&mock_server)
        .await;

    let yaml = client
        .source_yaml(SourceKind::Ova, &ObjectKey::new("ns1", "ova 1"))
        .await
        .unwrap();
    assert_eq!(yaml, "kind: OvaSource\n");
}
