use crate::ImportClient;
use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::error::ImportResult;
use crate::core::domain::model::capabilities::Capabilities;
use crate::core::domain::model::harvester::{
    CreateNamespaceRequest, HarvesterVm, Namespace, NetworkAttachment, StorageClass,
};
use crate::core::domain::model::inventory::InventoryNode;
use crate::core::domain::model::migration_plan::MigrationPlan;
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::plan_request::PlanRequest;
use crate::core::domain::model::source::{
    OvaSource, OvaSourcePayload, SourceKind, VmwareSource, VmwareSourcePayload,
};
use async_trait::async_trait;
use tracing::info;

const PLANS: &str = "plans";
const HARVESTER: &str = "harvester";

#[async_trait]
impl MigrationBackend for ImportClient {
    async fn capabilities(&self) -> ImportResult<Capabilities> {
        self.api_client.get(&["capabilities"]).await
    }

    async fn list_plans(&self) -> ImportResult<Vec<MigrationPlan>> {
        self.api_client.get_list(&[PLANS]).await
    }

    async fn get_plan(&self, key: &ObjectKey) -> ImportResult<MigrationPlan> {
        self.api_client
            .get(&[PLANS, &key.namespace, &key.name])
            .await
    }

    async fn create_plan(&self, request: &PlanRequest) -> ImportResult<()> {
        info!(
            plan = %request.metadata.name,
            namespace = %request.metadata.namespace,
            "creating migration plan"
        );
        self.api_client.post(&[PLANS], request).await
    }

    async fn delete_plan(&self, key: &ObjectKey) -> ImportResult<()> {
        info!(plan = %key, "deleting migration plan");
        self.api_client
            .delete(&[PLANS, &key.namespace, &key.name])
            .await
    }

    async fn run_plan(&self, key: &ObjectKey) -> ImportResult<()> {
        info!(plan = %key, "running migration plan now");
        self.api_client
            .post_empty(&[PLANS, &key.namespace, &key.name, "run"])
            .await
    }

    async fn plan_logs(&self, key: &ObjectKey) -> ImportResult<String> {
        self.api_client
            .get_text(&[PLANS, &key.namespace, &key.name, "logs"])
            .await
    }

    async fn plan_yaml(&self, key: &ObjectKey) -> ImportResult<String> {
        self.api_client
            .get_text(&[PLANS, &key.namespace, &key.name, "yaml"])
            .await
    }

    async fn list_vmware_sources(&self) -> ImportResult<Vec<VmwareSource>> {
        self.api_client
            .get_list(&[HARVESTER, SourceKind::Vmware.collection()])
            .await
    }

    async fn get_vmware_source(&self, key: &ObjectKey) -> ImportResult<VmwareSource> {
        self.api_client
            .get(&[
                HARVESTER,
                SourceKind::Vmware.collection(),
                &key.namespace,
                &key.name,
            ])
            .await
    }

    async fn create_vmware_source(&self, payload: &VmwareSourcePayload) -> ImportResult<()> {
        info!(source = %payload.name, namespace = %payload.namespace, "creating vCenter source");
        self.api_client
            .post(&[HARVESTER, SourceKind::Vmware.collection()], payload)
            .await
    }

    async fn update_vmware_source(
        &self,
        key: &ObjectKey,
        payload: &VmwareSourcePayload,
    ) -> ImportResult<()> {
        info!(source = %key, "updating vCenter source");
        self.api_client
            .put(
                &[
                    HARVESTER,
                    SourceKind::Vmware.collection(),
                    &key.namespace,
                    &key.name,
                ],
                payload,
            )
            .await
    }

    async fn list_ova_sources(&self) -> ImportResult<Vec<OvaSource>> {
        self.api_client
            .get_list(&[HARVESTER, SourceKind::Ova.collection()])
            .await
    }

    async fn get_ova_source(&self, key: &ObjectKey) -> ImportResult<OvaSource> {
        self.api_client
            .get(&[
                HARVESTER,
                SourceKind::Ova.collection(),
                &key.namespace,
                &key.name,
            ])
            .await
    }

    async fn create_ova_source(&self, payload: &OvaSourcePayload) -> ImportResult<()> {
        info!(source = %payload.name, namespace = %payload.namespace, "creating OVA source");
        self.api_client
            .post(&[HARVESTER, SourceKind::Ova.collection()], payload)
            .await
    }

    async fn update_ova_source(
        &self,
        key: &ObjectKey,
        payload: &OvaSourcePayload,
    ) -> ImportResult<()> {
        info!(source = %key, "updating OVA source");
        self.api_client
            .put(
                &[HARVESTER, SourceKind::Ova.collection(), &key.namespace, &key.name],
                payload,
            )
            .await
    }

    async fn delete_source(&self, kind: SourceKind, key: &ObjectKey) -> ImportResult<()> {
        info!(source = %key, %kind, "deleting source");
        self.api_client
            .delete(&[HARVESTER, kind.collection(), &key.namespace, &key.name])
            .await
    }

    async fn source_yaml(&self, kind: SourceKind, key: &ObjectKey) -> ImportResult<String> {
        self.api_client
            .get_text(&[HARVESTER, kind.collection(), &key.namespace, &key.name, "yaml"])
            .await
    }

    async fn list_namespaces(&self) -> ImportResult<Vec<Namespace>> {
        self.api_client.get_list(&[HARVESTER, "namespaces"]).await
    }

    async fn create_namespace(&self, name: &str) -> ImportResult<()> {
        info!(namespace = %name, "creating namespace");
        let body = CreateNamespaceRequest {
            name: name.to_string(),
        };
        self.api_client.post(&[HARVESTER, "namespaces"], &body).await
    }

    async fn list_networks(&self) -> ImportResult<Vec<NetworkAttachment>> {
        self.api_client.get_list(&[HARVESTER, "vlanconfigs"]).await
    }

    async fn list_storage_classes(&self) -> ImportResult<Vec<StorageClass>> {
        self.api_client.get_list(&[HARVESTER, "storageclasses"]).await
    }

    async fn list_virtual_machines(&self, namespace: &str) -> ImportResult<Vec<HarvesterVm>> {
        self.api_client
            .get_list(&[HARVESTER, "virtualmachines", namespace])
            .await
    }

    async fn inventory(&self, source: &ObjectKey) -> ImportResult<InventoryNode> {
        self.api_client
            .get(&["vcenter", "inventory", &source.namespace, &source.name])
            .await
    }
}
