//! Typed navigation state of the dashboard.

use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::source::SourceKind;

/// The main content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Plans,
    VmwareSources,
    OvaSources,
    About,
    CreatePlan,
    PlanDetails(ObjectKey),
    SourceDetails(SourceKind, ObjectKey),
}

impl View {
    /// Navigation tab highlighted while this view is shown.
    pub fn tab(&self) -> View {
        match self {
            View::Plans | View::CreatePlan | View::PlanDetails(_) => View::Plans,
            View::VmwareSources | View::SourceDetails(SourceKind::Vmware, _) => {
                View::VmwareSources
            }
            View::OvaSources | View::SourceDetails(SourceKind::Ova, _) => View::OvaSources,
            View::About => View::About,
        }
    }

    pub fn is_tab(&self) -> bool {
        matches!(
            self,
            View::Plans | View::VmwareSources | View::OvaSources | View::About
        )
    }

    /// Tab listing sources of `kind`.
    pub fn sources_tab(kind: SourceKind) -> View {
        match kind {
            SourceKind::Vmware => View::VmwareSources,
            SourceKind::Ova => View::OvaSources,
        }
    }
}

/// Whether a source editor creates a new source or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ObjectKey),
}

/// What a delete confirmation dialog would remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Plan(ObjectKey),
    Source(SourceKind, ObjectKey),
}

impl DeleteTarget {
    /// Confirmation text of the dialog.
    pub fn prompt(&self) -> String {
        match self {
            DeleteTarget::Plan(key) => {
                format!("Are you sure you want to delete the plan \"{}\"?", key.name)
            }
            DeleteTarget::Source(kind, key) => format!(
                "Are you sure you want to delete the {} \"{}\"? This will also delete the associated credentials secret.",
                kind.label(),
                key.name
            ),
        }
    }
}

/// A modal shown above the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    SourceEditor { kind: SourceKind, mode: EditorMode },
    ConfirmDelete(DeleteTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    view: View,
    overlay: Overlay,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            view: View::Plans,
            overlay: Overlay::None,
        }
    }
}

impl Router {
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Switches the main view. Switching to a tab closes any overlay.
    pub fn navigate(&mut self, view: View) {
        if view.is_tab() {
            self.overlay = Overlay::None;
        }
        self.view = view;
    }

    /// Leaves a details or create view for the tab that owns it.
    pub fn close_view(&mut self) {
        self.view = self.view.tab();
    }

    pub fn open(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }
}
