//! Headless view-model of the VM import dashboard.
//!
//! A renderer drives [`AppShell`] and the editors it hands out, and reads
//! their snapshots back. Nothing here draws anything.

pub mod format;
pub(crate) mod generation;
pub mod inspector;
pub mod plan_wizard;
pub mod poller;
pub mod router;
pub mod shell;
pub mod source_form;

pub use inspector::{InspectTarget, Inspector, Pane};
pub use plan_wizard::{
    NamespaceChoice, NetworkRow, PlanReview, PlanWizard, WizardState, WizardStep,
};
pub use poller::{PlanFeed, PlanPoller};
pub use router::{DeleteTarget, EditorMode, Overlay, Router, View};
pub use shell::{Alert, AppShell, PlanRow, SourceRow};
pub use source_form::{OvaSourceForm, SourceForm, VmwareSourceForm};
