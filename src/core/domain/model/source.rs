//! Domain models for import sources (`VmwareSource` and `OvaSource`).
//!
//! Sources are read back without their password: credentials live in a
//! Kubernetes secret owned by the gateway, and the password is write-only.

use crate::core::domain::model::object_meta::{ObjectKey, ObjectMeta};
use crate::core::domain::value_object::serde_helpers::empty_string_as_none;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of source a plan can import from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SourceKind {
    /// A VMware vCenter endpoint with a browsable inventory.
    #[serde(rename = "VmwareSource")]
    Vmware,
    /// An OVA archive reachable over HTTP.
    #[serde(rename = "OvaSource")]
    Ova,
}

impl SourceKind {
    /// Kubernetes kind of the source resource.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceKind::Vmware => "VmwareSource",
            SourceKind::Ova => "OvaSource",
        }
    }

    /// Collection segment under `/api/v1/harvester/`.
    pub fn collection(&self) -> &'static str {
        match self {
            SourceKind::Vmware => "vmwaresources",
            SourceKind::Ova => "ovasources",
        }
    }

    /// Label used in tab titles and dialogs.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Vmware => "vCenter source",
            SourceKind::Ova => "OVA source",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Reference to the secret holding source credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CredentialsRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl fmt::Display for CredentialsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A registered vCenter source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmwareSource {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: VmwareSourceSpec,
}

impl VmwareSource {
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }
}

/// Connection settings of a vCenter source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmwareSourceSpec {
    /// vCenter SDK endpoint, e.g. `https://vcenter.example.com/sdk`.
    #[serde(default)]
    pub endpoint: String,
    /// Datacenter name.
    #[serde(default)]
    pub dc: String,
    #[serde(default)]
    pub credentials: CredentialsRef,
    /// Username from the credentials secret; only present on the detail endpoint.
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
}

/// A registered OVA source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvaSource {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: OvaSourceSpec,
}

impl OvaSource {
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }
}

/// Download settings of an OVA source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvaSourceSpec {
    /// HTTP(S) URL of the OVA archive.
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsRef>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
}

/// Body of a create/update request for a vCenter source.
///
/// `password: None` is omitted from the JSON, which the gateway treats as
/// "keep the existing secret value".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmwareSourcePayload {
    pub name: String,
    pub namespace: String,
    pub endpoint: String,
    pub datacenter: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of a create/update request for an OVA source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvaSourcePayload {
    pub name: String,
    pub namespace: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_timeout_seconds: Option<u32>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
