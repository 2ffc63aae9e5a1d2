//! Domain models for migration plans (`VirtualMachineImport` resources).
//!
//! This module defines the read model returned by `/api/v1/plans` together
//! with the value types shared with the plan payload: source references,
//! network mappings and the interface/disk-bus enumerations.

use crate::core::domain::error::{ImportError, ValidationError};
use crate::core::domain::model::object_meta::{ObjectKey, ObjectMeta};
use crate::core::domain::model::source::SourceKind;
use crate::core::domain::value_object::serde_helpers::{empty_string_as_none, null_as_default};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// API group/version of every resource owned by the import controller.
pub const IMPORT_API_VERSION: &str = "migration.harvesterhci.io/v1beta1";

/// Kind of a migration plan.
pub const IMPORT_KIND: &str = "VirtualMachineImport";

/// Status shown when the controller has not reported anything yet.
pub const PENDING_STATUS: &str = "Pending";

/// A migration plan as listed by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: ImportSpec,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PlanStatus,
}

impl MigrationPlan {
    /// Returns the `(namespace, name)` identity of the plan.
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    /// Status as displayed in the plan table.
    ///
    /// `status.importStatus` wins, then the type of the first condition, and
    /// `"Pending"` when neither is reported.
    pub fn display_status(&self) -> &str {
        if let Some(status) = self.status.import_status.as_deref() {
            return status;
        }
        self.status
            .conditions
            .first()
            .map(|c| c.condition_type.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(PENDING_STATUS)
    }

    /// Builds the read-only summary shown in the plan details view.
    pub fn summary(&self) -> PlanSummary {
        let spec = &self.spec;
        let mut advanced = Vec::new();
        if spec.force_power_off {
            advanced.push(("Force Power Off".to_string(), "Yes".to_string()));
        }
        if let Some(timeout) = spec.graceful_shutdown_timeout_seconds.filter(|t| *t > 0) {
            advanced.push(("Shutdown Timeout".to_string(), format!("{}s", timeout)));
        }
        if let Some(model) = &spec.default_network_interface_model {
            advanced.push(("Default Interface".to_string(), model.clone()));
        }
        if spec.skip_preflight_checks {
            advanced.push(("Skip Validation".to_string(), "Yes".to_string()));
        }
        if let Some(bus) = &spec.default_disk_bus_type {
            advanced.push(("Disk Bus".to_string(), bus.clone()));
        }

        PlanSummary {
            name: self.metadata.name.clone(),
            status: self.display_status().to_string(),
            vm_name: non_empty_or_na(&spec.virtual_machine_name),
            source: spec
                .source_cluster
                .as_ref()
                .map(|s| s.key().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            storage_class: spec
                .storage_class
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            folder: spec.folder.clone().unwrap_or_else(|| "/".to_string()),
            network_mapping: spec.network_mapping.clone(),
            advanced,
        }
    }
}

fn non_empty_or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

/// Spec of a plan as stored on the server.
///
/// Every field is optional on the read side because plans created by other
/// tools may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    #[serde(default)]
    pub virtual_machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cluster: Option<SourceRef>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_class: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_mapping: Vec<NetworkMapping>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder: Option<String>,
    /// RFC 3339 time at which the import is scheduled to start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default)]
    pub force_power_off: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graceful_shutdown_timeout_seconds: Option<u32>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_network_interface_model: Option<String>,
    #[serde(default)]
    pub skip_preflight_checks: bool,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_disk_bus_type: Option<String>,
}

/// Observed state reported by the import controller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatus {
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub import_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conditions: Vec<Condition>,
}

/// A standard Kubernetes status condition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// Reference from a plan to the source it imports from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCluster {
    pub name: String,
    pub namespace: String,
    pub kind: SourceKind,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    IMPORT_API_VERSION.to_string()
}

impl SourceCluster {
    pub fn new(kind: SourceKind, key: &ObjectKey) -> Self {
        Self {
            name: key.name.clone(),
            namespace: key.namespace.clone(),
            kind,
            api_version: IMPORT_API_VERSION.to_string(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }
}

/// Source reference as read back from a stored plan.
///
/// The controller accepts source kinds this crate cannot create, so `kind`
/// stays a plain string here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

impl SourceRef {
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }

    /// Returns the kind when it is one this crate manages.
    pub fn source_kind(&self) -> Option<SourceKind> {
        [SourceKind::Vmware, SourceKind::Ova]
            .into_iter()
            .find(|k| k.kind() == self.kind)
    }
}

/// Maps one source network onto a Harvester network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMapping {
    pub source_network: String,
    /// Harvester network in `namespace/name` form.
    pub destination_network: String,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub network_interface_model: Option<String>,
}

/// Read-only summary of a plan for the details view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub name: String,
    pub status: String,
    pub vm_name: String,
    /// Source as `namespace/name`, or `N/A`.
    pub source: String,
    pub storage_class: String,
    /// Source folder, `/` when the VM sits at the root.
    pub folder: String,
    pub network_mapping: Vec<NetworkMapping>,
    /// Enabled advanced options as `(label, value)` pairs.
    pub advanced: Vec<(String, String)>,
}

/// Virtual NIC models the controller can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum NicModel {
    #[serde(rename = "e1000")]
    E1000,
    #[serde(rename = "e1000e")]
    E1000e,
    #[serde(rename = "ne2k_pci")]
    Ne2kPci,
    #[serde(rename = "pcnet")]
    Pcnet,
    #[serde(rename = "rtl8139")]
    Rtl8139,
    #[serde(rename = "virtio")]
    Virtio,
}

impl NicModel {
    pub const ALL: [NicModel; 6] = [
        NicModel::E1000,
        NicModel::E1000e,
        NicModel::Ne2kPci,
        NicModel::Pcnet,
        NicModel::Rtl8139,
        NicModel::Virtio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NicModel::E1000 => "e1000",
            NicModel::E1000e => "e1000e",
            NicModel::Ne2kPci => "ne2k_pci",
            NicModel::Pcnet => "pcnet",
            NicModel::Rtl8139 => "rtl8139",
            NicModel::Virtio => "virtio",
        }
    }
}

impl fmt::Display for NicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NicModel {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NicModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                ValidationError::ConstraintViolation(format!("Unknown interface model '{}'", s))
                    .into()
            })
    }
}

/// Disk bus types the controller can assign to imported disks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskBus {
    Virtio,
    Scsi,
    Sata,
    Usb,
}

impl DiskBus {
    pub const ALL: [DiskBus; 4] = [DiskBus::Virtio, DiskBus::Scsi, DiskBus::Sata, DiskBus::Usb];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiskBus::Virtio => "virtio",
            DiskBus::Scsi => "scsi",
            DiskBus::Sata => "sata",
            DiskBus::Usb => "usb",
        }
    }
}

impl fmt::Display for DiskBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskBus {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiskBus::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| {
                ValidationError::ConstraintViolation(format!("Unknown disk bus '{}'", s)).into()
            })
    }
}
