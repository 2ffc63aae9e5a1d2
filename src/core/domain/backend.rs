//! The seam between the dashboard view-model and the gateway.

use crate::core::domain::error::ImportResult;
use crate::core::domain::model::capabilities::Capabilities;
use crate::core::domain::model::harvester::{
    HarvesterVm, Namespace, NetworkAttachment, StorageClass,
};
use crate::core::domain::model::inventory::InventoryNode;
use crate::core::domain::model::migration_plan::MigrationPlan;
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::plan_request::PlanRequest;
use crate::core::domain::model::source::{
    OvaSource, OvaSourcePayload, SourceKind, VmwareSource, VmwareSourcePayload,
};
use async_trait::async_trait;

/// Every gateway operation the dashboard consumes.
///
/// [`ImportClient`](crate::ImportClient) implements this over HTTP; tests use
/// the generated `MockMigrationBackend`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MigrationBackend: Send + Sync {
    async fn capabilities(&self) -> ImportResult<Capabilities>;

    async fn list_plans(&self) -> ImportResult<Vec<MigrationPlan>>;
    async fn get_plan(&self, key: &ObjectKey) -> ImportResult<MigrationPlan>;
    async fn create_plan(&self, request: &PlanRequest) -> ImportResult<()>;
    async fn delete_plan(&self, key: &ObjectKey) -> ImportResult<()>;
    /// Starts a scheduled plan immediately.
    async fn run_plan(&self, key: &ObjectKey) -> ImportResult<()>;
    async fn plan_logs(&self, key: &ObjectKey) -> ImportResult<String>;
    async fn plan_yaml(&self, key: &ObjectKey) -> ImportResult<String>;

    async fn list_vmware_sources(&self) -> ImportResult<Vec<VmwareSource>>;
    async fn get_vmware_source(&self, key: &ObjectKey) -> ImportResult<VmwareSource>;
    async fn create_vmware_source(&self, payload: &VmwareSourcePayload) -> ImportResult<()>;
    async fn update_vmware_source(
        &self,
        key: &ObjectKey,
        payload: &VmwareSourcePayload,
    ) -> ImportResult<()>;

    async fn list_ova_sources(&self) -> ImportResult<Vec<OvaSource>>;
    async fn get_ova_source(&self, key: &ObjectKey) -> ImportResult<OvaSource>;
    async fn create_ova_source(&self, payload: &OvaSourcePayload) -> ImportResult<()>;
    async fn update_ova_source(&self, key: &ObjectKey, payload: &OvaSourcePayload)
    -> ImportResult<()>;

    async fn delete_source(&self, kind: SourceKind, key: &ObjectKey) -> ImportResult<()>;
    async fn source_yaml(&self, kind: SourceKind, key: &ObjectKey) -> ImportResult<String>;

    async fn list_namespaces(&self) -> ImportResult<Vec<Namespace>>;
    async fn create_namespace(&self, name: &str) -> ImportResult<()>;
    async fn list_networks(&self) -> ImportResult<Vec<NetworkAttachment>>;
    async fn list_storage_classes(&self) -> ImportResult<Vec<StorageClass>>;
    /// Names of the VMs that already exist in `namespace`.
    async fn list_virtual_machines(&self, namespace: &str) -> ImportResult<Vec<HarvesterVm>>;

    /// vCenter inventory tree of a registered source.
    async fn inventory(&self, source: &ObjectKey) -> ImportResult<InventoryNode>;
}
