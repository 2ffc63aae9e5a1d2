//! vCenter inventory tree as returned by `/api/v1/vcenter/inventory/{ns}/{name}`.

use crate::core::domain::value_object::serde_helpers::{empty_string_as_none, null_as_default};
use serde::{Deserialize, Serialize};

/// Kind of an inventory node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum NodeKind {
    #[serde(rename = "datacenter")]
    Datacenter,
    Folder,
    ClusterComputeResource,
    VirtualMachine,
    /// Any managed-object type the dashboard does not know about.
    #[serde(other)]
    Other,
}

/// One node of the vCenter inventory.
///
/// Only `VirtualMachine` leaves carry hardware figures, a folder path and
/// their attached networks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<InventoryNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(rename = "memoryMB", default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u64>,
    #[serde(rename = "diskSizeGB", default, skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<u64>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder: Option<String>,
}

impl InventoryNode {
    pub fn is_vm(&self) -> bool {
        self.kind == NodeKind::VirtualMachine
    }

    /// All `VirtualMachine` leaves in depth-first order.
    pub fn virtual_machines(&self) -> Vec<&InventoryNode> {
        let mut found = Vec::new();
        self.collect_vms(&mut found);
        found
    }

    fn collect_vms<'a>(&'a self, found: &mut Vec<&'a InventoryNode>) {
        if self.is_vm() {
            found.push(self);
        }
        for child in &self.children {
            child.collect_vms(found);
        }
    }

    /// First VM leaf named `name`, depth-first.
    pub fn find_vm(&self, name: &str) -> Option<&InventoryNode> {
        if self.is_vm() && self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_vm(name))
    }

    /// Distinct network names in first-seen order.
    pub fn distinct_networks(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::with_capacity(self.networks.len());
        for network in &self.networks {
            if !seen.contains(network) {
                seen.push(network.clone());
            }
        }
        seen
    }

    /// Inventory path of the node's folder, `/` when it has none.
    pub fn folder_display(&self) -> &str {
        self.folder.as_deref().unwrap_or("/")
    }
}
