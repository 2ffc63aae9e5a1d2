//! Create/edit forms for vCenter and OVA sources.
//!
//! In edit mode the identity (name and namespace) is fixed and the password
//! starts blank. Submitting with a blank password leaves the stored secret
//! untouched: the field is omitted from the request body.

use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::error::{ImportError, ImportResult, ValidationError};
use crate::core::domain::model::object_meta::ObjectKey;
use crate::core::domain::model::source::{
    OvaSource, OvaSourcePayload, SourceKind, VmwareSource, VmwareSourcePayload,
};
use crate::core::domain::value_object::{validate_namespace, validate_resource_name};
use crate::dashboard::router::EditorMode;
use url::Url;

const DEFAULT_NAMESPACE: &str = "default";

fn read_only(field: &str) -> ImportError {
    ImportError::Conflict(format!("'{}' cannot be changed on an existing source", field))
}

fn non_blank(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn validate_identity(name: &str, namespace: &str) -> Result<(), ValidationError> {
    validate_resource_name("name", name)?;
    validate_namespace("namespace", namespace)
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::field(field, "cannot be empty"));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| ValidationError::field(field, format!("invalid URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::field(field, "must be an http or https URL"));
    }
    Ok(())
}

/// Form state of a vCenter source.
#[derive(Debug, Clone, PartialEq)]
pub struct VmwareSourceForm {
    mode: EditorMode,
    name: String,
    namespace: String,
    pub endpoint: String,
    pub datacenter: String,
    pub username: String,
    pub password: String,
}

impl VmwareSourceForm {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            endpoint: String::new(),
            datacenter: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }

    /// Pre-populates from the detail view of an existing source.
    pub fn edit(source: &VmwareSource) -> Self {
        Self {
            mode: EditorMode::Edit(source.key()),
            name: source.metadata.name.clone(),
            namespace: source.metadata.namespace.clone(),
            endpoint: source.spec.endpoint.clone(),
            datacenter: source.spec.dc.clone(),
            username: source.spec.username.clone().unwrap_or_default(),
            password: String::new(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ImportResult<()> {
        if self.is_edit() {
            return Err(read_only("name"));
        }
        self.name = name.into();
        Ok(())
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> ImportResult<()> {
        if self.is_edit() {
            return Err(read_only("namespace"));
        }
        self.namespace = namespace.into();
        Ok(())
    }

    pub fn validate(&self) -> ImportResult<()> {
        validate_identity(&self.name, &self.namespace)?;
        validate_http_url("endpoint", &self.endpoint)?;
        if self.datacenter.trim().is_empty() {
            return Err(ValidationError::field("datacenter", "cannot be empty").into());
        }
        if !self.is_edit() && (self.username.is_empty() || self.password.is_empty()) {
            return Err(ValidationError::ConstraintViolation(
                "Username and password are required for a new source".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn payload(&self) -> VmwareSourcePayload {
        VmwareSourcePayload {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            endpoint: self.endpoint.trim().to_string(),
            datacenter: self.datacenter.trim().to_string(),
            username: self.username.clone(),
            password: non_blank(&self.password),
        }
    }

    /// Validates, then POSTs (create) or PUTs (edit) the source.
    pub async fn submit(&self, backend: &dyn MigrationBackend) -> ImportResult<()> {
        self.validate()?;
        let payload = self.payload();
        match &self.mode {
            EditorMode::Create => backend.create_vmware_source(&payload).await,
            EditorMode::Edit(key) => backend.update_vmware_source(key, &payload).await,
        }
    }
}

/// Form state of an OVA source.
#[derive(Debug, Clone, PartialEq)]
pub struct OvaSourceForm {
    mode: EditorMode,
    name: String,
    namespace: String,
    pub url: String,
    pub http_timeout_seconds: Option<u32>,
    pub username: String,
    pub password: String,
}

impl OvaSourceForm {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            url: String::new(),
            http_timeout_seconds: None,
            username: String::new(),
            password: String::new(),
        }
    }

    pub fn edit(source: &OvaSource) -> Self {
        Self {
            mode: EditorMode::Edit(source.key()),
            name: source.metadata.name.clone(),
            namespace: source.metadata.namespace.clone(),
            url: source.spec.url.clone(),
            http_timeout_seconds: source.spec.http_timeout_seconds,
            username: source.spec.username.clone().unwrap_or_default(),
            password: String::new(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ImportResult<()> {
        if self.is_edit() {
            return Err(read_only("name"));
        }
        self.name = name.into();
        Ok(())
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> ImportResult<()> {
        if self.is_edit() {
            return Err(read_only("namespace"));
        }
        self.namespace = namespace.into();
        Ok(())
    }

    pub fn validate(&self) -> ImportResult<()> {
        validate_identity(&self.name, &self.namespace)?;
        validate_http_url("url", &self.url)?;
        if self.http_timeout_seconds == Some(0) {
            return Err(ValidationError::field("httpTimeoutSeconds", "must be positive").into());
        }
        Ok(())
    }

    pub fn payload(&self) -> OvaSourcePayload {
        OvaSourcePayload {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            url: self.url.trim().to_string(),
            http_timeout_seconds: self.http_timeout_seconds,
            username: self.username.clone(),
            password: non_blank(&self.password),
        }
    }

    pub async fn submit(&self, backend: &dyn MigrationBackend) -> ImportResult<()> {
        self.validate()?;
        let payload = self.payload();
        match &self.mode {
            EditorMode::Create => backend.create_ova_source(&payload).await,
            EditorMode::Edit(key) => backend.update_ova_source(key, &payload).await,
        }
    }
}

/// Either source editor, as held by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceForm {
    Vmware(VmwareSourceForm),
    Ova(OvaSourceForm),
}

impl SourceForm {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceForm::Vmware(_) => SourceKind::Vmware,
            SourceForm::Ova(_) => SourceKind::Ova,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        match self {
            SourceForm::Vmware(form) => form.mode(),
            SourceForm::Ova(form) => form.mode(),
        }
    }

    /// Identity the form creates or edits.
    pub fn key(&self) -> ObjectKey {
        match self {
            SourceForm::Vmware(form) => ObjectKey::new(form.namespace(), form.name()),
            SourceForm::Ova(form) => ObjectKey::new(form.namespace(), form.name()),
        }
    }

    pub async fn submit(&self, backend: &dyn MigrationBackend) -> ImportResult<()> {
        match self {
            SourceForm::Vmware(form) => form.submit(backend).await,
            SourceForm::Ova(form) => form.submit(backend).await,
        }
    }
}
