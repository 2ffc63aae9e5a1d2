//! The payload POSTed to `/api/v1/plans`.
//!
//! Which fields a plan may carry depends on the Harvester version behind the
//! gateway. The decision is taken once, from [`Capabilities`], when the spec
//! is built: a [`PlanSpec::Basic`] spec has no way to express the advanced
//! options, so they can never leak into a request for an older cluster.

use crate::core::domain::model::capabilities::Capabilities;
use crate::core::domain::model::migration_plan::{
    DiskBus, IMPORT_API_VERSION, IMPORT_KIND, NetworkMapping, NicModel, SourceCluster,
};
use crate::core::domain::value_object::ResourceName;
use serde::Serialize;

/// A complete `VirtualMachineImport` object ready to be created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub metadata: PlanRequestMeta,
    pub spec: PlanSpec,
}

impl PlanRequest {
    pub fn new(name: ResourceName, namespace: impl Into<String>, spec: PlanSpec) -> Self {
        Self {
            api_version: IMPORT_API_VERSION,
            kind: IMPORT_KIND,
            metadata: PlanRequestMeta {
                name: name.into_inner(),
                namespace: namespace.into(),
            },
            spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequestMeta {
    pub name: String,
    pub namespace: String,
}

/// Spec of a new plan, shaped by cluster capabilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlanSpec {
    /// Fields every supported Harvester version understands.
    Basic(BasePlanSpec),
    /// Base fields plus power, interface and disk-bus options (Harvester v1.6+).
    Advanced(AdvancedPlanSpec),
}

impl PlanSpec {
    /// Chooses the variant from the cluster capabilities.
    ///
    /// Without advanced support the options are discarded and per-network
    /// interface models are stripped from the mappings.
    pub fn from_capabilities(
        capabilities: &Capabilities,
        mut base: BasePlanSpec,
        options: AdvancedOptions,
    ) -> Self {
        if capabilities.has_advanced_power {
            PlanSpec::Advanced(AdvancedPlanSpec { base, options })
        } else {
            for mapping in &mut base.network_mapping {
                mapping.network_interface_model = None;
            }
            PlanSpec::Basic(base)
        }
    }

    pub fn base(&self) -> &BasePlanSpec {
        match self {
            PlanSpec::Basic(base) => base,
            PlanSpec::Advanced(advanced) => &advanced.base,
        }
    }

    pub fn options(&self) -> Option<&AdvancedOptions> {
        match self {
            PlanSpec::Basic(_) => None,
            PlanSpec::Advanced(advanced) => Some(&advanced.options),
        }
    }
}

/// Fields always present in a plan spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePlanSpec {
    pub virtual_machine_name: String,
    pub source_cluster: SourceCluster,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    pub network_mapping: Vec<NetworkMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedPlanSpec {
    #[serde(flatten)]
    pub base: BasePlanSpec,
    #[serde(flatten)]
    pub options: AdvancedOptions,
}

/// Options gated behind `Capabilities::has_advanced_power`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOptions {
    pub force_power_off: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graceful_shutdown_timeout_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_network_interface_model: Option<NicModel>,
    pub skip_preflight_checks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_disk_bus_type: Option<DiskBus>,
}

impl AdvancedOptions {
    /// Review lines for the options that differ from their defaults.
    pub fn enabled(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.force_power_off {
            lines.push("Force Power Off: Enabled".to_string());
        }
        if let Some(timeout) = self.graceful_shutdown_timeout_seconds {
            lines.push(format!("Shutdown Timeout: {}s", timeout));
        }
        if let Some(model) = self.default_network_interface_model {
            lines.push(format!("Default Interface: {}", model));
        }
        if self.skip_preflight_checks {
            lines.push("Skip Validation: Yes".to_string());
        }
        if let Some(bus) = self.default_disk_bus_type {
            lines.push(format!("Disk Bus: {}", bus));
        }
        lines
    }
}
