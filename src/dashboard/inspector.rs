//! On-demand YAML and log viewers for plans and sources.

use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::error::{ImportError, ImportResult};
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::source::SourceKind;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

pub const NO_LOGS: &str = "No relevant logs found.";
pub const NO_YAML: &str = "Could not generate YAML.";
pub const LOGS_FAILED: &str = "Failed to fetch logs.";
pub const YAML_FAILED: &str = "Failed to fetch YAML.";

/// What is being inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectTarget {
    Plan(ObjectKey),
    Source(SourceKind, ObjectKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Logs,
    Yaml,
}

impl Pane {
    fn empty_text(&self) -> &'static str {
        match self {
            Pane::Logs => NO_LOGS,
            Pane::Yaml => NO_YAML,
        }
    }

    fn failure_text(&self) -> &'static str {
        match self {
            Pane::Logs => LOGS_FAILED,
            Pane::Yaml => YAML_FAILED,
        }
    }
}

#[derive(Debug, Default)]
struct InspectorState {
    shown: Option<Pane>,
    fetched: HashMap<Pane, String>,
    failed: Option<Pane>,
}

/// Details panel of one plan or source.
///
/// Each pane is fetched the first time it is shown and kept until the
/// inspector is dropped. Failures are not kept, so showing the pane again
/// retries.
pub struct Inspector {
    backend: Arc<dyn MigrationBackend>,
    target: InspectTarget,
    state: RwLock<InspectorState>,
}

impl Inspector {
    pub fn new(backend: Arc<dyn MigrationBackend>, target: InspectTarget) -> Self {
        Self {
            backend,
            target,
            state: RwLock::new(InspectorState::default()),
        }
    }

    pub fn target(&self) -> &InspectTarget {
        &self.target
    }

    pub fn panes(&self) -> &'static [Pane] {
        match self.target {
            InspectTarget::Plan(_) => &[Pane::Logs, Pane::Yaml],
            InspectTarget::Source(..) => &[Pane::Yaml],
        }
    }

    /// Currently shown pane and its text.
    pub async fn shown(&self) -> Option<(Pane, String)> {
        let state = self.state.read().await;
        let pane = state.shown?;
        match state.fetched.get(&pane) {
            Some(text) => Some((pane, text.clone())),
            None if state.failed == Some(pane) => Some((pane, pane.failure_text().to_string())),
            None => None,
        }
    }

    /// Hides `pane` if it is shown; otherwise shows it, fetching on first use.
    ///
    /// Returns the text now displayed, or `None` when the pane was hidden.
    pub async fn toggle(&self, pane: Pane) -> ImportResult<Option<String>> {
        if !self.panes().contains(&pane) {
            return Err(ImportError::Conflict(
                "Logs are only available for plans".to_string(),
            ));
        }

        {
            let mut state = self.state.write().await;
            if state.shown == Some(pane) {
                state.shown = None;
                return Ok(None);
            }
            state.shown = Some(pane);
            state.failed = None;
            if let Some(text) = state.fetched.get(&pane) {
                return Ok(Some(text.clone()));
            }
        }

        let text = match self.fetch(pane).await {
            Ok(body) if body.trim().is_empty() => pane.empty_text().to_string(),
            Ok(body) => {
                self.state.write().await.fetched.insert(pane, body.clone());
                return Ok(Some(body));
            }
            Err(e) => {
                warn!(error = %e, ?pane, "inspector fetch failed");
                self.state.write().await.failed = Some(pane);
                return Ok(Some(pane.failure_text().to_string()));
            }
        };
        self.state.write().await.fetched.insert(pane, text.clone());
        Ok(Some(text))
    }

    async fn fetch(&self, pane: Pane) -> ImportResult<String> {
        match (&self.target, pane) {
            (InspectTarget::Plan(key), Pane::Logs) => self.backend.plan_logs(key).await,
            (InspectTarget::Plan(key), Pane::Yaml) => self.backend.plan_yaml(key).await,
            (InspectTarget::Source(kind, key), Pane::Yaml) => {
                self.backend.source_yaml(*kind, key).await
            }
            (InspectTarget::Source(..), Pane::Logs) => Err(ImportError::Conflict(
                "Logs are only available for plans".to_string(),
            )),
        }
    }
}
