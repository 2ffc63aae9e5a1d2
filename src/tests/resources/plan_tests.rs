use super::create_test_client;
use crate::{
    AdvancedOptions, BasePlanSpec, Capabilities, ImportError, MigrationBackend, NetworkMapping,
    ObjectKey, PlanRequest, PlanSpec, ResourceName, SourceCluster, SourceKind,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

#[tokio::test]
async fn test_plans_list_success() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "apiVersion": "migration.harvesterhci.io/v1beta1",
                "kind": "VirtualMachineImport",
                "metadata": {"name": "web01-plan", "namespace": "ns1", "uid": "1234"},
                "spec": {
                    "virtualMachineName": "web01",
                    "sourceCluster": {
                        "name": "vc1",
                        "namespace": "ns1",
                        "kind": "VmwareSource",
                        "apiVersion": "migration.harvesterhci.io/v1beta1"
                    },
                    "storageClass": "longhorn",
                    "networkMapping": [
                        {"sourceNetwork": "VM Network", "destinationNetwork": "ns1/mgmt-vlan"}
                    ]
                },
                "status": {"importStatus": "virtualMachineRunning"}
            },
            {
                "metadata": {"name": "db01-plan", "namespace": "ns1"},
                "spec": {"virtualMachineName": "db01"},
                "status": {"conditions": [{"type": "VirtualMachineImported", "status": "True"}]}
            },
            {
                "metadata": {"name": "new-plan", "namespace": "ns2"},
                "spec": {"virtualMachineName": "app01"}
            }
        ])))
        .mount(&mock_server)
        .await;

    let plans = client.list_plans().await.unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0].key(), ObjectKey::new("ns1", "web01-plan"));
    assert_eq!(plans[0].display_status(), "virtualMachineRunning");
    assert_eq!(plans[1].display_status(), "VirtualMachineImported");
    assert_eq!(plans[2].display_status(), "Pending");
    assert_eq!(plans[0].spec.network_mapping[0].destination_network, "ns1/mgmt-vlan");
}

#[tokio::test]
async fn test_plans_list_null_is_empty() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    assert!(client.list_plans().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_plan_sends_basic_payload() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    let expected = json!({
        "apiVersion": "migration.harvesterhci.io/v1beta1",
        "kind": "VirtualMachineImport",
        "metadata": {"name": "web01-plan", "namespace": "ns1"},
        "spec": {
            "virtualMachineName": "web01",
            "sourceCluster": {
                "name": "vc1",
                "namespace": "ns1",
                "kind": "VmwareSource",
                "apiVersion": "migration.harvesterhci.io/v1beta1"
            },
            "storageClass": "longhorn",
            "networkMapping": [
                {"sourceNetwork": "VM Network", "destinationNetwork": "ns1/mgmt-vlan"}
            ]
        }
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(&expected))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = BasePlanSpec {
        virtual_machine_name: "web01".to_string(),
        source_cluster: SourceCluster::new(SourceKind::Vmware, &ObjectKey::new("ns1", "vc1")),
        storage_class: Some("longhorn".to_string()),
        network_mapping: vec![NetworkMapping {
            source_network: "VM Network".to_string(),
            destination_network: "ns1/mgmt-vlan".to_string(),
            network_interface_model: Some("e1000".to_string()),
        }],
        folder: None,
    };
    let spec = PlanSpec::from_capabilities(
        &Capabilities::default(),
        base,
        AdvancedOptions {
            force_power_off: true,
            ..AdvancedOptions::default()
        },
    );
    let request = PlanRequest::new(ResourceName::new("web01-plan").unwrap(), "ns1", spec);

    client.create_plan(&request).await.unwrap();
}

#[tokio::test]
async fn test_create_plan_conflict_surfaces_server_message() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "virtualmachineimports.migration.harvesterhci.io \"web01-plan\" already exists"
        })))
        .mount(&mock_server)
        .await;

    let base = BasePlanSpec {
        virtual_machine_name: "web01".to_string(),
        source_cluster: SourceCluster::new(SourceKind::Vmware, &ObjectKey::new("ns1", "vc1")),
        storage_class: None,
        network_mapping: Vec::new(),
        folder: None,
    };
    let spec = PlanSpec::from_capabilities(&Capabilities::default(), base, AdvancedOptions::default());
    let request = PlanRequest::new(ResourceName::new("web01-plan").unwrap(), "ns1", spec);

    let err = client.create_plan(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(err.user_message().contains("already exists"));
}

#[tokio::test]
async fn test_run_and_delete_plan() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    let key = ObjectKey::new("ns1", "web01-plan");

    Mock::given(method("POST"))
        .and(path("/api/v1/plans/ns1/web01-plan/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"name": "web01-plan", "namespace": "ns1"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/plans/ns1/web01-plan"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    client.run_plan(&key).await.unwrap();
    client.delete_plan(&key).await.unwrap();
}

#[tokio::test]
async fn test_plan_logs_and_yaml_are_text() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    let key = ObjectKey::new("ns1", "web01-plan");

    Mock::given(method("GET"))
        .and(path("/api/v1/plans/ns1/web01-plan/logs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("importing disk 1 of 2\ndisk copied\n"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/plans/ns1/web01-plan/yaml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("apiVersion: migration.harvesterhci.io/v1beta1\n"),
        )
        .mount(&mock_server)
        .await;

    let logs = client.plan_logs(&key).await.unwrap();
    assert_eq!(logs.lines().count(), 2);
    let yaml = client.plan_yaml(&key).await.unwrap();
    assert!(yaml.starts_with("apiVersion"));
}

#[tokio::test]
async fn test_get_plan_not_found() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/v1/plans/ns1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "plan not found"
        })))
        .mount(&mock_server)
        .await;

    let err = client
        .get_plan(&ObjectKey::new("ns1", "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Api { status: 404, ref message } if message == "plan not found"));
}
