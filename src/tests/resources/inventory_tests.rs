use super::create_test_client;
use crate::dashboard::PlanWizard;
use crate::{Capabilities, MigrationBackend, NodeKind, ObjectKey};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn tree(vm: &str) -> serde_json::Value {
    json!({
        "name": "DC1",
        "type": "datacenter",
        "children": [{
            "name": "Cluster",
            "type": "ClusterComputeResource",
            "children": [{
                "name": vm,
                "type": "VirtualMachine",
                "cpu": 2,
                "memoryMB": 4096,
                "diskSizeGB": 40,
                "folder": "Prod/Web",
                "networks": ["VM Network", "VM Network"]
            }]
        }]
    })
}

async fn mount_empty_catalog(mock_server: &MockServer) {
    for endpoint in [
        "/api/v1/harvester/vmwaresources",
        "/api/v1/harvester/ovasources",
        "/api/v1/harvester/namespaces",
        "/api/v1/harvester/vlanconfigs",
        "/api/v1/harvester/storageclasses",
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(mock_server)
            .await;
    }
}

#[tokio::test]
async fn test_inventory_tree() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/vcenter/inventory/ns1/vc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree("web01")))
        .mount(&mock_server)
        .await;

    let root = client.inventory(&ObjectKey::new("ns1", "vc1")).await.unwrap();
    assert_eq!(root.kind, NodeKind::Datacenter);
    let vms = root.virtual_machines();
    assert_eq!(vms.len(), 1);
    assert_eq!(vms[0].memory_mb, Some(4096));
    assert_eq!(vms[0].distinct_networks(), vec!["VM Network"]);
}

#[tokio::test]
async fn test_inventory_connection_failure_is_inline() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_empty_catalog(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/vcenter/inventory/ns1/vc1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "failed to login to vCenter"
        })))
        .mount(&mock_server)
        .await;

    let wizard = PlanWizard::open(Arc::new(client), Capabilities::default()).await;
    wizard
        .select_vmware_source(Some(ObjectKey::new("ns1", "vc1")))
        .await
        .unwrap();

    let state = wizard.state().await;
    assert_eq!(
        state.connection_error.as_deref(),
        Some("failed to login to vCenter")
    );
    assert!(state.inventory.is_none());
}

#[tokio::test]
async fn test_rapid_reselection_keeps_latest_inventory() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_empty_catalog(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/vcenter/inventory/ns1/vc1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tree("from-vc1"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/vcenter/inventory/ns1/vc2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree("from-vc2")))
        .mount(&mock_server)
        .await;

    let wizard = PlanWizard::open(Arc::new(client), Capabilities::default()).await;
    let first = wizard.select_vmware_source(Some(ObjectKey::new("ns1", "vc1")));
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        wizard
            .select_vmware_source(Some(ObjectKey::new("ns1", "vc2")))
            .await
    };
    let (first, second) = tokio::join!(first, second);
    first.unwrap();
    second.unwrap();

    let state = wizard.state().await;
    assert_eq!(state.selected_source, Some(ObjectKey::new("ns1", "vc2")));
    let inventory = state.inventory.unwrap();
    assert_eq!(inventory.virtual_machines()[0].name, "from-vc2");
    assert!(!state.connecting);
}
