use super::create_test_client;
use crate::dashboard::{AppShell, DeleteTarget, NamespaceChoice, Overlay, View, WizardStep};
use crate::dashboard::PlanWizard;
use crate::{DashboardConfig, ImportError, MigrationBackend, ObjectKey, SourceKind};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_get(mock_server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

async fn mount_catalog(mock_server: &MockServer) {
    mount_get(
        mock_server,
        "/api/v1/capabilities",
        json!({"harvesterVersion": "v1.5.1", "hasAdvancedPower": false}),
    )
    .await;
    mount_get(mock_server, "/api/v1/plans", json!([])).await;
    mount_get(
        mock_server,
        "/api/v1/harvester/vmwaresources",
        json!([{
            "metadata": {"name": "vc1", "namespace": "ns1"},
            "spec": {
                "endpoint": "https://vcenter.example.com/sdk",
                "dc": "DC1",
                "credentials": {"name": "vc1", "namespace": "ns1"}
            }
        }]),
    )
    .await;
    mount_get(mock_server, "/api/v1/harvester/ovasources", json!(null)).await;
    mount_get(
        mock_server,
        "/api/v1/harvester/namespaces",
        json!([{"metadata": {"name": "ns1"}}]),
    )
    .await;
    mount_get(
        mock_server,
        "/api/v1/harvester/vlanconfigs",
        json!([{"metadata": {"name": "mgmt-vlan", "namespace": "ns1"}}]),
    )
    .await;
    mount_get(
        mock_server,
        "/api/v1/harvester/storageclasses",
        json!([{"metadata": {"name": "longhorn"}}]),
    )
    .await;
    mount_get(mock_server, "/api/v1/harvester/virtualmachines/ns1", json!([])).await;
    mount_get(
        mock_server,
        "/api/v1/vcenter/inventory/ns1/vc1",
        json!({
            "name": "DC1",
            "type": "datacenter",
            "children": [{
                "name": "web01",
                "type": "VirtualMachine",
                "networks": ["VM Network"]
            }]
        }),
    )
    .await;
}

#[tokio::test]
async fn test_end_to_end_plan_creation() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .and(body_json(json!({
            "apiVersion": "migration.harvesterhci.io/v1beta1",
            "kind": "VirtualMachineImport",
            "metadata": {"name": "web01-migration", "namespace": "ns1"},
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
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend: Arc<dyn MigrationBackend> = Arc::new(create_test_client(&mock_server));
    let shell = AppShell::start(backend, DashboardConfig::default()).await;
    assert!(shell.capabilities().await.compatibility_notice().is_some());

    let wizard = shell.new_plan_wizard().await;
    assert_eq!(shell.view().await, View::CreatePlan);
    assert_eq!(
        wizard.state().await.vmware_sources,
        vec![ObjectKey::new("ns1", "vc1")]
    );

    wizard
        .select_vmware_source(Some(ObjectKey::new("ns1", "vc1")))
        .await
        .unwrap();
    wizard.select_vm("web01").await.unwrap();
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Configuration);

    wizard.set_plan_name("Web01 Migration").await.unwrap();
    wizard
        .set_namespace(NamespaceChoice::Existing("ns1".to_string()))
        .await
        .unwrap();
    wizard
        .set_storage_class(Some("longhorn".to_string()))
        .await
        .unwrap();
    assert_eq!(wizard.next().await.unwrap(), WizardStep::NetworkMapping);

    wizard
        .map_network("VM Network", Some("ns1/mgmt-vlan".to_string()))
        .await
        .unwrap();
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Review);

    shell.submit_plan_wizard(&wizard).await.unwrap();
    assert_eq!(shell.view().await, View::Plans);
    assert!(shell.alert().await.is_none());
}

async fn wizard_at_review(shell: &AppShell) -> PlanWizard {
    let wizard = shell.new_plan_wizard().await;
    wizard
        .select_vmware_source(Some(ObjectKey::new("ns1", "vc1")))
        .await
        .unwrap();
    wizard.select_vm("web01").await.unwrap();
    wizard.next().await.unwrap();
    wizard.set_plan_name("web01-migration").await.unwrap();
    wizard
        .set_namespace(NamespaceChoice::Existing("ns1".to_string()))
        .await
        .unwrap();
    wizard.next().await.unwrap();
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Review);
    wizard
}

#[tokio::test]
async fn test_submit_waits_for_namespace_vm_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/virtualmachines/ns2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"metadata": {"name": "web01", "namespace": "ns2"}}]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_catalog(&mock_server).await;

    let shell = AppShell::start(
        Arc::new(create_test_client(&mock_server)),
        DashboardConfig::default(),
    )
    .await;
    let wizard = wizard_at_review(&shell).await;

    let (changed, submitted) = tokio::join!(
        wizard.set_namespace(NamespaceChoice::Existing("ns2".to_string())),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            wizard.submit().await
        }
    );
    changed.unwrap();
    assert!(matches!(submitted, Err(ImportError::Conflict(_))));

    let state = wizard.state().await;
    assert_eq!(state.existing_vm_names, vec!["web01".to_string()]);
    assert!(state.vm_name_conflict());
    assert!(!state.submitted);
    assert!(matches!(wizard.submit().await, Err(ImportError::Conflict(_))));
}

#[tokio::test]
async fn test_wizard_edits_refused_while_submitting() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/plans"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_catalog(&mock_server).await;

    let shell = AppShell::start(
        Arc::new(create_test_client(&mock_server)),
        DashboardConfig::default(),
    )
    .await;
    let wizard = wizard_at_review(&shell).await;

    let (submitted, renamed) = tokio::join!(wizard.submit(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        wizard
            .set_namespace(NamespaceChoice::Existing("ns2".to_string()))
            .await
    });
    submitted.unwrap();
    assert!(matches!(renamed, Err(ImportError::Conflict(_))));
    assert_eq!(
        wizard.state().await.namespace,
        Some(NamespaceChoice::Existing("ns1".to_string()))
    );
}

#[tokio::test]
async fn test_shell_delete_source_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/harvester/vmwaresources/ns1/vc1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    // first listing at start-up, then empty after the delete
    Mock::given(method("GET"))
        .and(path("/api/v1/harvester/vmwaresources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "metadata": {"name": "vc1", "namespace": "ns1"},
            "spec": {
                "endpoint": "https://vcenter.example.com/sdk",
                "dc": "DC1",
                "credentials": {"name": "vc1", "namespace": "ns1"}
            }
        }])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_get(&mock_server, "/api/v1/harvester/vmwaresources", json!([])).await;
    mount_catalog(&mock_server).await;

    let shell = AppShell::start(
        Arc::new(create_test_client(&mock_server)),
        DashboardConfig::default(),
    )
    .await;
    assert_eq!(shell.source_rows(SourceKind::Vmware).await.len(), 1);

    let target = DeleteTarget::Source(SourceKind::Vmware, ObjectKey::new("ns1", "vc1"));
    assert!(target.prompt().contains("credentials secret"));
    shell.request_delete(target).await;
    shell.confirm_delete().await.unwrap();

    assert_eq!(shell.overlay().await, Overlay::None);
    assert!(shell.source_rows(SourceKind::Vmware).await.is_empty());
}
