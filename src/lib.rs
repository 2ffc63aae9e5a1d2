#![feature(error_generic_member_access)] // required by thiserror for the Backtrace field in ImportError::Validation
mod config;
mod core;
pub mod dashboard;

pub use crate::config::{
    ClientConfig, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, DashboardConfig,
    MIN_POLL_INTERVAL, RateLimitConfig,
};
pub use crate::core::domain::backend::MigrationBackend;
pub use crate::core::domain::error::{ImportError, ImportResult, ValidationError};
pub use crate::core::domain::model::{
    capabilities::Capabilities,
    harvester::{HarvesterVm, Namespace, NetworkAttachment, StorageClass},
    inventory::{InventoryNode, NodeKind},
    migration_plan::{
        Condition, DiskBus, IMPORT_API_VERSION, IMPORT_KIND, ImportSpec, MigrationPlan,
        NetworkMapping, NicModel, PENDING_STATUS, PlanStatus, PlanSummary, SourceCluster,
        SourceRef,
    },
    object_meta::{ObjectKey, ObjectMeta},
    plan_request::{
        AdvancedOptions, AdvancedPlanSpec, BasePlanSpec, PlanRequest, PlanRequestMeta, PlanSpec,
    },
    source::{
        CredentialsRef, OvaSource, OvaSourcePayload, OvaSourceSpec, SourceKind, VmwareSource,
        VmwareSourcePayload, VmwareSourceSpec,
    },
};
pub use crate::core::domain::value_object::{GatewayUrl, ResourceName, slugify};

use crate::core::infrastructure::api_client::ApiClient;
use std::backtrace::Backtrace;

/// A client for the Harvester VM import gateway.
///
/// This client provides a typed, async interface for:
/// - Migration plans (list, create, run, delete, logs, YAML)
/// - vCenter and OVA sources
/// - Harvester namespaces, networks, storage classes and VMs
/// - vCenter inventory browsing
///
/// All operations are exposed through the [`MigrationBackend`] trait.
///
/// # Examples
///
/// ```no_run
/// use harvester_vm_import::{ImportClient, ImportResult, MigrationBackend};
///
/// #[tokio::main]
/// async fn main() -> ImportResult<()> {
///     let client = ImportClient::builder()
///         .base_url("https://import.example.com")?
///         .accept_invalid_certs(true)
///         .build()?;
///
///     for plan in client.list_plans().await? {
///         println!("{} {}", plan.key(), plan.display_status());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ImportClient {
    pub(crate) api_client: ApiClient,
}

/// Builder for ImportClient configuration
#[derive(Debug, Default)]
pub struct ImportClientBuilder {
    base_url: Option<GatewayUrl>,
    config: ClientConfig,
}

impl ImportClientBuilder {
    /// Sets the gateway base URL, e.g. `https://import.example.com`.
    pub fn base_url(mut self, url: impl AsRef<str>) -> ImportResult<Self> {
        self.base_url = Some(GatewayUrl::new(url.as_ref())?);
        Ok(self)
    }

    /// Replaces the whole transport configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    /// Reads `HARVESTER_IMPORT_URL` (required), `HARVESTER_IMPORT_TIMEOUT_SECS`
    /// and `HARVESTER_IMPORT_INSECURE` from the process environment.
    pub fn from_env() -> ImportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(config::ENV_URL).ok_or_else(|| ImportError::Validation {
            source: ValidationError::Field {
                field: config::ENV_URL.to_string(),
                message: "Gateway URL is required".to_string(),
            },
            backtrace: Backtrace::capture(),
        })?;
        let config = ClientConfig::default().with_env(&lookup)?;
        Ok(Self::default().base_url(url)?.config(config))
    }

    pub fn build(self) -> ImportResult<ImportClient> {
        let base_url = self.base_url.ok_or_else(|| ImportError::Validation {
            source: ValidationError::Field {
                field: "base_url".to_string(),
                message: "Base URL is required".to_string(),
            },
            backtrace: Backtrace::capture(),
        })?;

        let api_client = ApiClient::new(base_url, &self.config)?;
        Ok(ImportClient { api_client })
    }
}

impl ImportClient {
    /// Creates a new builder for ImportClient configuration
    pub fn builder() -> ImportClientBuilder {
        ImportClientBuilder::default()
    }

    /// Returns the gateway base URL.
    pub fn base_url(&self) -> &GatewayUrl {
        self.api_client.base_url()
    }

    /// Fetches capabilities, falling back to the defaults when unreachable.
    pub async fn capabilities_or_default(&self) -> Capabilities {
        match MigrationBackend::capabilities(self).await {
            Ok(caps) => caps,
            Err(e) => {
                tracing::warn!(error = %e, "capabilities unavailable, assuming basic features");
                Capabilities::default()
            }
        }
    }
}

#[cfg(test)]
mod tests;
