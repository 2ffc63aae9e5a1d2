//! Top-level dashboard state: navigation, cached lists and the plan poller.

use crate::config::DashboardConfig;
use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::error::{ImportError, ImportResult};
use crate::core::domain::model::capabilities::Capabilities;
use crate::core::domain::model::migration_plan::{MigrationPlan, PlanSummary};
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::source::{OvaSource, SourceKind, VmwareSource};
use crate::dashboard::generation::Generation;
use crate::dashboard::inspector::{InspectTarget, Inspector};
use crate::dashboard::plan_wizard::PlanWizard;
use crate::dashboard::poller::{PlanFeed, PlanPoller};
use crate::dashboard::router::{DeleteTarget, EditorMode, Overlay, Router, View};
use crate::dashboard::source_form::{OvaSourceForm, SourceForm, VmwareSourceForm};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// A blocking message shown after a failed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// One line of the plans table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub key: ObjectKey,
    pub vm_name: String,
    pub source: String,
    pub status: String,
}

impl From<&MigrationPlan> for PlanRow {
    fn from(plan: &MigrationPlan) -> Self {
        let summary = plan.summary();
        Self {
            key: plan.key(),
            vm_name: summary.vm_name,
            source: summary.source,
            status: summary.status,
        }
    }
}

/// One line of a sources table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub key: ObjectKey,
    pub kind: SourceKind,
    /// vCenter endpoint or OVA URL.
    pub location: String,
    /// Datacenter of a vCenter source.
    pub datacenter: Option<String>,
    /// Credentials secret as `namespace/name`.
    pub credentials: Option<String>,
}

impl From<&VmwareSource> for SourceRow {
    fn from(source: &VmwareSource) -> Self {
        Self {
            key: source.key(),
            kind: SourceKind::Vmware,
            location: source.spec.endpoint.clone(),
            datacenter: Some(source.spec.dc.clone()),
            credentials: Some(source.spec.credentials.to_string()),
        }
    }
}

impl From<&OvaSource> for SourceRow {
    fn from(source: &OvaSource) -> Self {
        Self {
            key: source.key(),
            kind: SourceKind::Ova,
            location: source.spec.url.clone(),
            datacenter: None,
            credentials: source.spec.credentials.as_ref().map(|c| c.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct ShellState {
    router: Router,
    vmware_sources: Vec<VmwareSource>,
    ova_sources: Vec<OvaSource>,
    capabilities: Capabilities,
    alert: Option<Alert>,
}

/// The dashboard application shell.
///
/// Owns the router, the cached source lists, the capabilities snapshot and
/// the plan poller. Dropping the shell stops polling.
pub struct AppShell {
    backend: Arc<dyn MigrationBackend>,
    state: RwLock<ShellState>,
    plans: Arc<PlanFeed>,
    poller: Mutex<PlanPoller>,
    vmware_generation: Generation,
    ova_generation: Generation,
}

impl AppShell {
    /// Loads capabilities and both source lists, then starts polling plans.
    ///
    /// A capabilities failure falls back to a basic cluster. Must be called
    /// from within a tokio runtime.
    pub async fn start(backend: Arc<dyn MigrationBackend>, config: DashboardConfig) -> Self {
        let capabilities = match backend.capabilities().await {
            Ok(capabilities) => capabilities,
            Err(e) => {
                warn!(error = %e, "failed to fetch capabilities, assuming basic cluster");
                Capabilities::default()
            }
        };

        let plans = Arc::new(PlanFeed::new(Arc::clone(&backend)));
        let poller = PlanPoller::start(Arc::clone(&plans), config.effective_poll_interval());
        let shell = Self {
            backend,
            state: RwLock::new(ShellState {
                capabilities,
                ..ShellState::default()
            }),
            plans,
            poller: Mutex::new(poller),
            vmware_generation: Generation::default(),
            ova_generation: Generation::default(),
        };
        tokio::join!(
            shell.refresh_sources(SourceKind::Vmware),
            shell.refresh_sources(SourceKind::Ova),
        );
        shell
    }

    pub async fn view(&self) -> View {
        self.state.read().await.router.view().clone()
    }

    pub async fn overlay(&self) -> Overlay {
        self.state.read().await.router.overlay().clone()
    }

    pub async fn capabilities(&self) -> Capabilities {
        self.state.read().await.capabilities.clone()
    }

    pub async fn alert(&self) -> Option<Alert> {
        self.state.read().await.alert.clone()
    }

    pub async fn dismiss_alert(&self) {
        self.state.write().await.alert = None;
    }

    async fn raise(&self, title: impl Into<String>, error: &ImportError) {
        self.state.write().await.alert = Some(Alert {
            title: title.into(),
            message: error.user_message(),
        });
    }

    pub async fn navigate(&self, view: View) {
        self.state.write().await.router.navigate(view);
    }

    /// Leaves a details or create view for the tab that owns it.
    pub async fn close_view(&self) {
        self.state.write().await.router.close_view();
    }

    pub async fn plans(&self) -> Vec<MigrationPlan> {
        self.plans.plans().await
    }

    pub async fn plan_rows(&self) -> Vec<PlanRow> {
        self.plans.plans().await.iter().map(PlanRow::from).collect()
    }

    pub async fn source_rows(&self, kind: SourceKind) -> Vec<SourceRow> {
        let state = self.state.read().await;
        match kind {
            SourceKind::Vmware => state.vmware_sources.iter().map(SourceRow::from).collect(),
            SourceKind::Ova => state.ova_sources.iter().map(SourceRow::from).collect(),
        }
    }

    pub async fn vmware_sources(&self) -> Vec<VmwareSource> {
        self.state.read().await.vmware_sources.clone()
    }

    pub async fn ova_sources(&self) -> Vec<OvaSource> {
        self.state.read().await.ova_sources.clone()
    }

    /// Manual refresh. The poll timer keeps its schedule.
    pub async fn refresh_plans(&self) {
        self.plans.refresh().await;
    }

    /// Re-fetches one source list. A failure leaves it empty.
    pub async fn refresh_sources(&self, kind: SourceKind) {
        match kind {
            SourceKind::Vmware => {
                let ticket = self.vmware_generation.issue();
                let result = self.backend.list_vmware_sources().await;
                let mut state = self.state.write().await;
                if !self.vmware_generation.is_current(ticket) {
                    debug!("dropping stale vCenter source list");
                    return;
                }
                state.vmware_sources = result.unwrap_or_else(|e| {
                    warn!(error = %e, "failed to fetch vCenter sources");
                    Vec::new()
                });
            }
            SourceKind::Ova => {
                let ticket = self.ova_generation.issue();
                let result = self.backend.list_ova_sources().await;
                let mut state = self.state.write().await;
                if !self.ova_generation.is_current(ticket) {
                    debug!("dropping stale OVA source list");
                    return;
                }
                state.ova_sources = result.unwrap_or_else(|e| {
                    warn!(error = %e, "failed to fetch OVA sources");
                    Vec::new()
                });
            }
        }
    }

    pub async fn poll_interval(&self) -> Duration {
        self.poller.lock().await.interval()
    }

    /// Restarts the plan poller with a new interval.
    pub async fn set_poll_interval(&self, interval: Duration) {
        self.poller.lock().await.set_interval(interval);
    }

    /// Shows the create view and opens a wizard over the current capabilities.
    pub async fn new_plan_wizard(&self) -> PlanWizard {
        let capabilities = {
            let mut state = self.state.write().await;
            state.router.navigate(View::CreatePlan);
            state.capabilities.clone()
        };
        PlanWizard::open(Arc::clone(&self.backend), capabilities).await
    }

    /// Submits the wizard; on success returns to the refreshed plan list.
    pub async fn submit_plan_wizard(&self, wizard: &PlanWizard) -> ImportResult<()> {
        if let Err(e) = wizard.submit().await {
            self.raise("Failed to create plan", &e).await;
            return Err(e);
        }
        self.plans.refresh().await;
        self.navigate(View::Plans).await;
        Ok(())
    }

    /// Summary of a cached plan.
    pub async fn plan_summary(&self, key: &ObjectKey) -> Option<PlanSummary> {
        self.plans
            .plans()
            .await
            .iter()
            .find(|plan| &plan.key() == key)
            .map(MigrationPlan::summary)
    }

    /// Shows the details view of a plan.
    pub async fn plan_inspector(&self, key: ObjectKey) -> Inspector {
        self.navigate(View::PlanDetails(key.clone())).await;
        Inspector::new(Arc::clone(&self.backend), InspectTarget::Plan(key))
    }

    /// Shows the details view of a source.
    pub async fn source_inspector(&self, kind: SourceKind, key: ObjectKey) -> Inspector {
        self.navigate(View::SourceDetails(kind, key.clone())).await;
        Inspector::new(Arc::clone(&self.backend), InspectTarget::Source(kind, key))
    }

    /// Triggers a scheduled plan now, then refreshes the plan list.
    pub async fn run_plan(&self, key: &ObjectKey) -> ImportResult<()> {
        if let Err(e) = self.backend.run_plan(key).await {
            self.raise("Failed to run plan", &e).await;
            return Err(e);
        }
        self.plans.refresh().await;
        Ok(())
    }

    /// Opens a source editor.
    ///
    /// With a key, the source is fetched first so the form is pre-filled; a
    /// failed fetch raises an alert and leaves the editor closed.
    pub async fn open_source_editor(
        &self,
        kind: SourceKind,
        key: Option<&ObjectKey>,
    ) -> ImportResult<SourceForm> {
        let form = match (kind, key) {
            (SourceKind::Vmware, None) => SourceForm::Vmware(VmwareSourceForm::create()),
            (SourceKind::Ova, None) => SourceForm::Ova(OvaSourceForm::create()),
            (SourceKind::Vmware, Some(key)) => match self.backend.get_vmware_source(key).await {
                Ok(source) => SourceForm::Vmware(VmwareSourceForm::edit(&source)),
                Err(e) => {
                    self.raise("Failed to load vCenter source", &e).await;
                    return Err(e);
                }
            },
            (SourceKind::Ova, Some(key)) => match self.backend.get_ova_source(key).await {
                Ok(source) => SourceForm::Ova(OvaSourceForm::edit(&source)),
                Err(e) => {
                    self.raise("Failed to load OVA source", &e).await;
                    return Err(e);
                }
            },
        };
        self.state.write().await.router.open(Overlay::SourceEditor {
            kind,
            mode: form.mode().clone(),
        });
        Ok(form)
    }

    /// Saves an editor. Success refreshes the list and closes the editor;
    /// failure raises an alert and keeps it open.
    pub async fn save_source(&self, form: &SourceForm) -> ImportResult<()> {
        let kind = form.kind();
        if let Err(e) = form.submit(self.backend.as_ref()).await {
            let verb = match form.mode() {
                EditorMode::Create => "create",
                EditorMode::Edit(_) => "update",
            };
            self.raise(format!("Failed to {} {}", verb, kind.label()), &e)
                .await;
            return Err(e);
        }
        self.refresh_sources(kind).await;
        self.cancel_editor().await;
        Ok(())
    }

    pub async fn cancel_editor(&self) {
        let mut state = self.state.write().await;
        if matches!(state.router.overlay(), Overlay::SourceEditor { .. }) {
            state.router.close_overlay();
        }
    }

    /// Opens the delete confirmation dialog.
    pub async fn request_delete(&self, target: DeleteTarget) {
        self.state
            .write()
            .await
            .router
            .open(Overlay::ConfirmDelete(target));
    }

    pub async fn cancel_delete(&self) {
        let mut state = self.state.write().await;
        if matches!(state.router.overlay(), Overlay::ConfirmDelete(_)) {
            state.router.close_overlay();
        }
    }

    /// Deletes the target of the open confirmation dialog with one DELETE.
    ///
    /// The dialog closes either way. On success the affected list is
    /// re-fetched and a details view of the deleted object is left.
    pub async fn confirm_delete(&self) -> ImportResult<()> {
        let target = {
            let mut state = self.state.write().await;
            let target = match state.router.overlay() {
                Overlay::ConfirmDelete(target) => target.clone(),
                _ => {
                    return Err(ImportError::Conflict(
                        "No deletion is awaiting confirmation".to_string(),
                    ));
                }
            };
            state.router.close_overlay();
            target
        };

        let result = match &target {
            DeleteTarget::Plan(key) => self.backend.delete_plan(key).await,
            DeleteTarget::Source(kind, key) => self.backend.delete_source(*kind, key).await,
        };
        if let Err(e) = result {
            self.raise("Failed to delete", &e).await;
            return Err(e);
        }

        match &target {
            DeleteTarget::Plan(key) => {
                info!(plan = %key, "plan deleted");
                self.plans.refresh().await;
                self.leave_details(&View::PlanDetails(key.clone())).await;
            }
            DeleteTarget::Source(kind, key) => {
                info!(source = %key, %kind, "source deleted");
                self.refresh_sources(*kind).await;
                self.leave_details(&View::SourceDetails(*kind, key.clone()))
                    .await;
            }
        }
        Ok(())
    }

    async fn leave_details(&self, details: &View) {
        let mut state = self.state.write().await;
        if state.router.view() == details {
            state.router.close_view();
        }
    }
}
