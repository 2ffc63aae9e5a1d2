//! Harvester-side listings used to fill wizard choices.

use crate::core::domain::model::object_meta::{ObjectKey, ObjectMeta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

impl Namespace {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClass {
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
}

impl StorageClass {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// A VLAN network (network-attachment-definition) VMs can attach to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkAttachment {
    pub metadata: ObjectMeta,
}

impl NetworkAttachment {
    /// Value used as `destinationNetwork` in a mapping.
    pub fn destination(&self) -> String {
        self.key().to_string()
    }

    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }
}

/// An existing Harvester virtual machine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HarvesterVm {
    pub metadata: ObjectMeta,
}

impl HarvesterVm {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// Body of `POST /api/v1/harvester/namespaces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNamespaceRequest {
    pub name: String,
}
