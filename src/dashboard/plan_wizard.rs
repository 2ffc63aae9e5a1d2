//! The four-step plan creation wizard.
//!
//! The wizard collects a source and VM, plan settings and network mappings,
//! then submits exactly one [`PlanRequest`]. All operations take `&self`, so
//! a renderer can drive several of them concurrently. Inventory and
//! existing-VM-name responses carry generation tickets: a response that is
//! no longer the newest request for its slot is dropped.

use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::error::{ImportError, ImportResult, ValidationError};
use crate::core::domain::model::capabilities::Capabilities;
use crate::core::domain::model::inventory::InventoryNode;
use crate::core::domain::model::migration_plan::{NetworkMapping, NicModel, SourceCluster};
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::plan_request::{
    AdvancedOptions, BasePlanSpec, PlanRequest, PlanSpec,
};
use crate::core::domain::model::source::SourceKind;
use crate::core::domain::value_object::{
    ResourceName, slugify, validate_namespace, validate_resource_name,
};
use crate::dashboard::generation::Generation;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    SourceAndVm,
    Configuration,
    NetworkMapping,
    Review,
}

impl WizardStep {
    /// One-based position shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SourceAndVm => 1,
            WizardStep::Configuration => 2,
            WizardStep::NetworkMapping => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::SourceAndVm => "Source & VM",
            WizardStep::Configuration => "Configuration",
            WizardStep::NetworkMapping => "Network Mapping",
            WizardStep::Review => "Review & Submit",
        }
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SourceAndVm => Some(WizardStep::Configuration),
            WizardStep::Configuration => Some(WizardStep::NetworkMapping),
            WizardStep::NetworkMapping => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SourceAndVm => None,
            WizardStep::Configuration => Some(WizardStep::SourceAndVm),
            WizardStep::NetworkMapping => Some(WizardStep::Configuration),
            WizardStep::Review => Some(WizardStep::NetworkMapping),
        }
    }
}

/// Target namespace of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceChoice {
    Existing(String),
    /// Created with `POST /harvester/namespaces` when the plan is submitted.
    CreateNew(String),
}

impl NamespaceChoice {
    pub fn name(&self) -> &str {
        match self {
            NamespaceChoice::Existing(name) | NamespaceChoice::CreateNew(name) => name,
        }
    }
}

/// One source network and where it is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRow {
    pub source_network: String,
    /// Harvester network as `namespace/name`; unmapped rows are not submitted.
    pub destination: Option<String>,
    pub interface_model: Option<NicModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Assignment {
    destination: Option<String>,
    interface_model: Option<NicModel>,
}

/// Snapshot of everything the wizard shows.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: WizardStep,
    pub source_kind: SourceKind,

    pub vmware_sources: Vec<ObjectKey>,
    pub ova_sources: Vec<ObjectKey>,
    pub namespaces: Vec<String>,
    /// VLAN networks as `namespace/name`.
    pub networks: Vec<String>,
    pub storage_classes: Vec<String>,

    pub selected_source: Option<ObjectKey>,
    pub inventory: Option<InventoryNode>,
    pub connecting: bool,
    pub connection_error: Option<String>,
    pub selected_vm: Option<String>,
    /// Target VM name typed for an OVA import.
    pub ova_vm_name: String,
    /// Source networks entered by hand for an OVA import.
    pub ova_networks: Vec<String>,

    /// Plan name as typed; submitted slugified.
    pub plan_name_input: String,
    pub namespace: Option<NamespaceChoice>,
    pub existing_vm_names: Vec<String>,
    pub checking_vm_names: bool,
    pub storage_class: Option<String>,
    pub options: AdvancedOptions,
    assignments: HashMap<String, Assignment>,

    pub submitting: bool,
    pub submitted: bool,
    pub submit_error: Option<String>,
}

impl WizardState {
    fn new() -> Self {
        Self {
            step: WizardStep::SourceAndVm,
            source_kind: SourceKind::Vmware,
            vmware_sources: Vec::new(),
            ova_sources: Vec::new(),
            namespaces: Vec::new(),
            networks: Vec::new(),
            storage_classes: Vec::new(),
            selected_source: None,
            inventory: None,
            connecting: false,
            connection_error: None,
            selected_vm: None,
            ova_vm_name: String::new(),
            ova_networks: Vec::new(),
            plan_name_input: String::new(),
            namespace: None,
            existing_vm_names: Vec::new(),
            checking_vm_names: false,
            storage_class: None,
            options: AdvancedOptions::default(),
            assignments: HashMap::new(),
            submitting: false,
            submitted: false,
            submit_error: None,
        }
    }

    /// Name of the VM to import, if one is chosen.
    pub fn vm_name(&self) -> Option<&str> {
        match self.source_kind {
            SourceKind::Vmware => self.selected_vm.as_deref(),
            SourceKind::Ova => Some(self.ova_vm_name.trim()).filter(|n| !n.is_empty()),
        }
    }

    /// Inventory node of the selected vCenter VM.
    pub fn selected_vm_node(&self) -> Option<&InventoryNode> {
        let name = self.selected_vm.as_deref()?;
        self.inventory.as_ref()?.find_vm(name)
    }

    /// Resource name the plan will be created with.
    pub fn plan_name(&self) -> String {
        slugify(&self.plan_name_input)
    }

    /// Whether the chosen VM name already exists in the target namespace.
    pub fn vm_name_conflict(&self) -> bool {
        self.vm_name()
            .is_some_and(|name| self.existing_vm_names.iter().any(|n| n == name))
    }

    fn conflict_message(&self) -> Option<String> {
        if !self.vm_name_conflict() {
            return None;
        }
        Some(format!(
            "A virtual machine named '{}' already exists in namespace '{}'",
            self.vm_name().unwrap_or_default(),
            self.namespace.as_ref().map(|n| n.name()).unwrap_or_default()
        ))
    }

    /// Distinct source networks, in the order the VM reports them.
    pub fn source_networks(&self) -> Vec<String> {
        match self.source_kind {
            SourceKind::Vmware => self
                .selected_vm_node()
                .map(|vm| vm.distinct_networks())
                .unwrap_or_default(),
            SourceKind::Ova => self.ova_networks.clone(),
        }
    }

    pub fn network_rows(&self) -> Vec<NetworkRow> {
        self.source_networks()
            .into_iter()
            .map(|network| {
                let assignment = self.assignments.get(&network).cloned().unwrap_or_default();
                NetworkRow {
                    source_network: network,
                    destination: assignment.destination,
                    interface_model: assignment.interface_model,
                }
            })
            .collect()
    }

    /// Checks the inputs that `step` is responsible for.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), ValidationError> {
        match step {
            WizardStep::SourceAndVm => {
                if self.selected_source.is_none() {
                    return Err(ValidationError::field("source", "Select a source"));
                }
                if self.vm_name().is_none() {
                    return Err(ValidationError::field("vm", "Select a virtual machine"));
                }
                Ok(())
            }
            WizardStep::Configuration => {
                validate_resource_name("planName", &self.plan_name())?;
                match &self.namespace {
                    None => Err(ValidationError::field("namespace", "Select a target namespace")),
                    Some(NamespaceChoice::Existing(name)) => validate_namespace("namespace", name),
                    Some(NamespaceChoice::CreateNew(name)) => {
                        validate_namespace("newNamespace", name)?;
                        if self.namespaces.iter().any(|n| n == name) {
                            return Err(ValidationError::field(
                                "newNamespace",
                                format!("Namespace '{}' already exists", name),
                            ));
                        }
                        Ok(())
                    }
                }
            }
            WizardStep::NetworkMapping | WizardStep::Review => Ok(()),
        }
    }

    /// Whether `next()` would currently succeed.
    pub fn can_advance(&self) -> bool {
        !self.submitted
            && !self.checking_vm_names
            && !self.vm_name_conflict()
            && self.step.next().is_some()
            && self.validate_step(self.step).is_ok()
    }
}

/// Read-only summary of the plan about to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReview {
    pub request: PlanRequest,
    /// Namespace that will be created before the plan.
    pub new_namespace: Option<String>,
    /// Enabled advanced options, one line each.
    pub advanced: Vec<String>,
}

impl PlanReview {
    /// `(label, value)` lines of the review step.
    pub fn lines(&self) -> Vec<(String, String)> {
        let base = self.request.spec.base();
        let namespace = match &self.new_namespace {
            Some(ns) => format!("{} (new)", ns),
            None => self.request.metadata.namespace.clone(),
        };
        let mut lines = vec![
            ("Plan Name".to_string(), self.request.metadata.name.clone()),
            ("Target Namespace".to_string(), namespace),
            ("Source".to_string(), base.source_cluster.key().to_string()),
            ("Virtual Machine".to_string(), base.virtual_machine_name.clone()),
            (
                "Storage Class".to_string(),
                base.storage_class.clone().unwrap_or_else(|| "Default".to_string()),
            ),
        ];
        for mapping in &base.network_mapping {
            let mut target = mapping.destination_network.clone();
            if let Some(model) = &mapping.network_interface_model {
                target = format!("{} ({})", target, model);
            }
            lines.push((mapping.source_network.clone(), target));
        }
        for option in &self.advanced {
            lines.push(("Advanced".to_string(), option.clone()));
        }
        lines
    }
}

/// Awaits a list fetch, logging a failure and degrading it to an empty list.
async fn fetch_or_empty<T, F>(what: &str, fetch: F) -> Vec<T>
where
    F: Future<Output = ImportResult<Vec<T>>>,
{
    match fetch.await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "failed to fetch {}", what);
            Vec::new()
        }
    }
}

pub struct PlanWizard {
    backend: Arc<dyn MigrationBackend>,
    capabilities: Capabilities,
    state: RwLock<WizardState>,
    inventory_generation: Generation,
    vm_names_generation: Generation,
}

impl PlanWizard {
    /// Opens the wizard and loads sources, namespaces, networks and storage
    /// classes. A failed list is left empty.
    pub async fn open(backend: Arc<dyn MigrationBackend>, capabilities: Capabilities) -> Self {
        let wizard = Self {
            backend,
            capabilities,
            state: RwLock::new(WizardState::new()),
            inventory_generation: Generation::default(),
            vm_names_generation: Generation::default(),
        };
        tokio::join!(
            wizard.refresh_sources(),
            wizard.refresh_namespaces(),
            wizard.refresh_networks(),
            wizard.refresh_storage_classes(),
        );
        wizard
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub async fn state(&self) -> WizardState {
        self.state.read().await.clone()
    }

    async fn editable(&self) -> ImportResult<RwLockWriteGuard<'_, WizardState>> {
        let state = self.state.write().await;
        if state.submitted {
            return Err(ImportError::Conflict(
                "The plan has already been submitted".to_string(),
            ));
        }
        if state.submitting {
            return Err(ImportError::Conflict(
                "A submission is already in progress".to_string(),
            ));
        }
        Ok(state)
    }

    pub async fn refresh_sources(&self) {
        let (vmware, ova) = tokio::join!(
            fetch_or_empty("vCenter sources", self.backend.list_vmware_sources()),
            fetch_or_empty("OVA sources", self.backend.list_ova_sources()),
        );
        let mut state = self.state.write().await;
        state.vmware_sources = vmware.iter().map(|s| s.key()).collect();
        state.ova_sources = ova.iter().map(|s| s.key()).collect();
    }

    pub async fn refresh_namespaces(&self) {
        let namespaces = fetch_or_empty("namespaces", self.backend.list_namespaces()).await;
        self.state.write().await.namespaces =
            namespaces.into_iter().map(|ns| ns.metadata.name).collect();
    }

    pub async fn refresh_networks(&self) {
        let networks = fetch_or_empty("networks", self.backend.list_networks()).await;
        self.state.write().await.networks = networks.iter().map(|n| n.destination()).collect();
    }

    pub async fn refresh_storage_classes(&self) {
        let classes = fetch_or_empty("storage classes", self.backend.list_storage_classes()).await;
        self.state.write().await.storage_classes =
            classes.into_iter().map(|sc| sc.metadata.name).collect();
    }

    /// Switches between vCenter and OVA imports, clearing the source selection.
    pub async fn set_source_kind(&self, kind: SourceKind) -> ImportResult<()> {
        let mut state = self.editable().await?;
        if state.source_kind == kind {
            return Ok(());
        }
        self.inventory_generation.issue();
        state.source_kind = kind;
        state.selected_source = None;
        state.inventory = None;
        state.connecting = false;
        state.connection_error = None;
        state.selected_vm = None;
        state.ova_vm_name.clear();
        state.ova_networks.clear();
        state.assignments.clear();
        Ok(())
    }

    /// Selects a vCenter source and loads its inventory.
    ///
    /// `None` clears the inventory. Selecting the current source again
    /// reloads it and keeps the VM selection if the VM is still there.
    /// Connection failures are reported in `connection_error`, not as `Err`.
    pub async fn select_vmware_source(&self, source: Option<ObjectKey>) -> ImportResult<()> {
        let (ticket, key) = {
            let mut state = self.editable().await?;
            if state.source_kind != SourceKind::Vmware {
                return Err(ImportError::Conflict(
                    "The wizard is not importing from vCenter".to_string(),
                ));
            }
            let ticket = self.inventory_generation.issue();
            if state.selected_source != source {
                state.selected_vm = None;
            }
            state.selected_source = source.clone();
            state.connection_error = None;
            match source {
                None => {
                    state.inventory = None;
                    state.connecting = false;
                    return Ok(());
                }
                Some(key) => {
                    state.connecting = true;
                    (ticket, key)
                }
            }
        };

        let result = self.backend.inventory(&key).await;

        let mut state = self.state.write().await;
        if !self.inventory_generation.is_current(ticket) {
            debug!(source = %key, "dropping stale inventory response");
            return Ok(());
        }
        state.connecting = false;
        match result {
            Ok(tree) => {
                let still_present = state
                    .selected_vm
                    .as_deref()
                    .is_some_and(|vm| tree.find_vm(vm).is_some());
                if !still_present {
                    state.selected_vm = None;
                }
                state.inventory = Some(tree);
            }
            Err(e) => {
                state.inventory = None;
                state.selected_vm = None;
                state.connection_error = Some(e.user_message());
            }
        }
        Ok(())
    }

    /// Reloads the inventory of the selected vCenter source.
    pub async fn refresh_inventory(&self) -> ImportResult<()> {
        let current = self.state.read().await.selected_source.clone();
        self.select_vmware_source(current).await
    }

    /// Selects a VM leaf of the loaded inventory.
    pub async fn select_vm(&self, name: &str) -> ImportResult<()> {
        let mut state = self.editable().await?;
        let found = state
            .inventory
            .as_ref()
            .and_then(|tree| tree.find_vm(name))
            .is_some();
        if !found {
            return Err(ValidationError::field(
                "vm",
                format!("'{}' is not a virtual machine of the selected source", name),
            )
            .into());
        }
        state.selected_vm = Some(name.to_string());
        Ok(())
    }

    pub async fn select_ova_source(&self, source: Option<ObjectKey>) -> ImportResult<()> {
        let mut state = self.editable().await?;
        if state.source_kind != SourceKind::Ova {
            return Err(ImportError::Conflict(
                "The wizard is not importing from an OVA".to_string(),
            ));
        }
        state.selected_source = source;
        Ok(())
    }

    /// Sets the name of the VM created from an OVA.
    pub async fn set_vm_name(&self, name: impl Into<String>) -> ImportResult<()> {
        let mut state = self.editable().await?;
        if state.source_kind != SourceKind::Ova {
            return Err(ImportError::Conflict(
                "The VM name comes from the vCenter inventory".to_string(),
            ));
        }
        state.ova_vm_name = name.into();
        Ok(())
    }

    /// Adds a source network to map for an OVA import.
    pub async fn add_source_network(&self, network: impl Into<String>) -> ImportResult<()> {
        let network = network.into();
        let mut state = self.editable().await?;
        if state.source_kind != SourceKind::Ova {
            return Err(ImportError::Conflict(
                "Source networks come from the vCenter inventory".to_string(),
            ));
        }
        let trimmed = network.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::field("sourceNetwork", "cannot be empty").into());
        }
        if !state.ova_networks.iter().any(|n| n == trimmed) {
            state.ova_networks.push(trimmed.to_string());
        }
        Ok(())
    }

    pub async fn remove_source_network(&self, network: &str) -> ImportResult<()> {
        let mut state = self.editable().await?;
        if state.source_kind != SourceKind::Ova {
            return Err(ImportError::Conflict(
                "Source networks come from the vCenter inventory".to_string(),
            ));
        }
        state.ova_networks.retain(|n| n != network);
        state.assignments.remove(network);
        Ok(())
    }

    pub async fn set_plan_name(&self, name: impl Into<String>) -> ImportResult<()> {
        self.editable().await?.plan_name_input = name.into();
        Ok(())
    }

    /// Chooses the target namespace and reloads its existing VM names.
    pub async fn set_namespace(&self, choice: NamespaceChoice) -> ImportResult<()> {
        let ticket = {
            let mut state = self.editable().await?;
            let ticket = self.vm_names_generation.issue();
            state.namespace = Some(choice.clone());
            state.existing_vm_names.clear();
            state.checking_vm_names = matches!(choice, NamespaceChoice::Existing(_));
            ticket
        };

        let names: Vec<String> = match &choice {
            NamespaceChoice::Existing(namespace) => {
                fetch_or_empty("virtual machines", self.backend.list_virtual_machines(namespace))
                    .await
                    .into_iter()
                    .map(|vm| vm.metadata.name)
                    .collect()
            }
            NamespaceChoice::CreateNew(_) => Vec::new(),
        };

        let mut state = self.state.write().await;
        if !self.vm_names_generation.is_current(ticket) {
            debug!(namespace = %choice.name(), "dropping stale VM name list");
            return Ok(());
        }
        state.existing_vm_names = names;
        state.checking_vm_names = false;
        Ok(())
    }

    /// Chooses a storage class; `None` uses the cluster default.
    pub async fn set_storage_class(&self, storage_class: Option<String>) -> ImportResult<()> {
        self.editable().await?.storage_class = storage_class.filter(|sc| !sc.is_empty());
        Ok(())
    }

    /// Sets the advanced options. Refused when the cluster lacks support.
    pub async fn set_advanced_options(&self, options: AdvancedOptions) -> ImportResult<()> {
        if !self.capabilities.has_advanced_power {
            return Err(ImportError::Conflict(
                "Advanced options require Harvester v1.6.0 or later".to_string(),
            ));
        }
        if options.graceful_shutdown_timeout_seconds == Some(0) {
            return Err(ValidationError::field(
                "gracefulShutdownTimeoutSeconds",
                "must be a positive number of seconds",
            )
            .into());
        }
        self.editable().await?.options = options;
        Ok(())
    }

    /// Maps a source network to a Harvester network (`namespace/name`), or
    /// unmaps it with `None`.
    pub async fn map_network(
        &self,
        source_network: &str,
        destination: Option<String>,
    ) -> ImportResult<()> {
        if let Some(destination) = &destination {
            destination.parse::<ObjectKey>()?;
        }
        let mut state = self.editable().await?;
        if !state.source_networks().iter().any(|n| n == source_network) {
            return Err(ValidationError::field(
                "sourceNetwork",
                format!("'{}' is not a network of the selected VM", source_network),
            )
            .into());
        }
        state
            .assignments
            .entry(source_network.to_string())
            .or_default()
            .destination = destination;
        Ok(())
    }

    /// Overrides the interface model of one network. Advanced clusters only.
    pub async fn set_interface_model(
        &self,
        source_network: &str,
        model: Option<NicModel>,
    ) -> ImportResult<()> {
        if !self.capabilities.has_advanced_power {
            return Err(ImportError::Conflict(
                "Interface models require Harvester v1.6.0 or later".to_string(),
            ));
        }
        let mut state = self.editable().await?;
        if !state.source_networks().iter().any(|n| n == source_network) {
            return Err(ValidationError::field(
                "sourceNetwork",
                format!("'{}' is not a network of the selected VM", source_network),
            )
            .into());
        }
        state
            .assignments
            .entry(source_network.to_string())
            .or_default()
            .interface_model = model;
        Ok(())
    }

    /// Advances one step.
    ///
    /// Refused when the current step is incomplete. Once a target namespace
    /// is chosen, also refused while its VM list is loading or while the VM
    /// name collides with one of its VMs; before that no collision is known.
    pub async fn next(&self) -> ImportResult<WizardStep> {
        let mut state = self.editable().await?;
        if let Some(message) = state.conflict_message() {
            return Err(ImportError::Conflict(message));
        }
        if state.checking_vm_names {
            return Err(ImportError::Conflict(
                "Still checking existing virtual machines".to_string(),
            ));
        }
        state.validate_step(state.step)?;
        let next = state
            .step
            .next()
            .ok_or_else(|| ImportError::Conflict("Already on the last step".to_string()))?;
        state.step = next;
        Ok(next)
    }

    /// Goes back one step, keeping every input.
    pub async fn back(&self) -> WizardStep {
        let mut state = self.state.write().await;
        if let Some(previous) = state.step.previous() {
            state.step = previous;
        }
        state.step
    }

    fn build_request(&self, state: &WizardState) -> ImportResult<PlanRequest> {
        state.validate_step(WizardStep::SourceAndVm)?;
        state.validate_step(WizardStep::Configuration)?;

        let source = state
            .selected_source
            .as_ref()
            .ok_or_else(|| ValidationError::field("source", "Select a source"))?;
        let vm_name = state
            .vm_name()
            .ok_or_else(|| ValidationError::field("vm", "Select a virtual machine"))?
            .to_string();
        let namespace = state
            .namespace
            .as_ref()
            .ok_or_else(|| ValidationError::field("namespace", "Select a target namespace"))?;

        let folder = match state.source_kind {
            SourceKind::Vmware => state.selected_vm_node().and_then(|vm| vm.folder.clone()),
            SourceKind::Ova => None,
        };
        let network_mapping = state
            .network_rows()
            .into_iter()
            .filter_map(|row| {
                Some(NetworkMapping {
                    destination_network: row.destination?,
                    source_network: row.source_network,
                    network_interface_model: row.interface_model.map(|m| m.as_str().to_string()),
                })
            })
            .collect();

        let base = BasePlanSpec {
            virtual_machine_name: vm_name,
            source_cluster: SourceCluster::new(state.source_kind, source),
            storage_class: state.storage_class.clone(),
            network_mapping,
            folder,
        };
        let spec = PlanSpec::from_capabilities(&self.capabilities, base, state.options.clone());
        let name = ResourceName::from_display_name(&state.plan_name_input)?;
        Ok(PlanRequest::new(name, namespace.name(), spec))
    }

    /// Builds the review of the plan as it would be submitted now.
    pub async fn review(&self) -> ImportResult<PlanReview> {
        let state = self.state.read().await;
        let request = self.build_request(&state)?;
        let advanced = request
            .spec
            .options()
            .map(|options| options.enabled())
            .unwrap_or_default();
        let new_namespace = match &state.namespace {
            Some(NamespaceChoice::CreateNew(name)) => Some(name.clone()),
            _ => None,
        };
        Ok(PlanReview {
            request,
            new_namespace,
            advanced,
        })
    }

    /// Creates the namespace if requested, then POSTs the plan once.
    ///
    /// Refused while the target namespace's VM list is still loading. Edits
    /// are refused while the submission is in flight.
    ///
    /// On failure the wizard stays on the review step with `submit_error`
    /// set and can be submitted again.
    pub async fn submit(&self) -> ImportResult<()> {
        let (request, new_namespace) = {
            let mut state = self.editable().await?;
            if state.step != WizardStep::Review {
                return Err(ImportError::Conflict(
                    "Review the plan before submitting".to_string(),
                ));
            }
            if let Some(message) = state.conflict_message() {
                return Err(ImportError::Conflict(message));
            }
            if state.checking_vm_names {
                return Err(ImportError::Conflict(
                    "Still checking existing virtual machines".to_string(),
                ));
            }
            let request = self.build_request(&state)?;
            let new_namespace = match &state.namespace {
                Some(NamespaceChoice::CreateNew(name)) => Some(name.clone()),
                _ => None,
            };
            state.submitting = true;
            state.submit_error = None;
            (request, new_namespace)
        };

        if let Some(namespace) = new_namespace {
            if let Err(e) = self.backend.create_namespace(&namespace).await {
                let mut state = self.state.write().await;
                state.submitting = false;
                state.submit_error =
                    Some(format!("Failed to create namespace: {}", e.user_message()));
                return Err(e);
            }
            let mut state = self.state.write().await;
            if !state.namespaces.contains(&namespace) {
                state.namespaces.push(namespace.clone());
            }
            state.namespace = Some(NamespaceChoice::Existing(namespace));
        }

        let result = self.backend.create_plan(&request).await;
        let mut state = self.state.write().await;
        state.submitting = false;
        match result {
            Ok(()) => {
                state.submitted = true;
                Ok(())
            }
            Err(e) => {
                state.submit_error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
