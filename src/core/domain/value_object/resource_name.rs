use crate::core::domain::error::{ImportResult, ValidationError};
use std::fmt;

const MAX_SUBDOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// A validated Kubernetes object name (RFC 1123 subdomain).
///
/// Plan, source and VM names all travel as object names, so the same rules
/// apply: lower-case alphanumerics, `-` and `.`, starting and ending with an
/// alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a validated name.
    pub fn new(name: impl Into<String>) -> ImportResult<Self> {
        let name = name.into();
        validate_resource_name("name", &name)?;
        Ok(Self(name))
    }

    /// Slugifies a human-entered display name and validates the result.
    ///
    /// ```
    /// use harvester_vm_import::ResourceName;
    ///
    /// let name = ResourceName::from_display_name("My Plan 1").unwrap();
    /// assert_eq!(name.as_str(), "my-plan-1");
    /// ```
    pub fn from_display_name(display: &str) -> ImportResult<Self> {
        Self::new(slugify(display))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the object and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cases the input and replaces every run of whitespace with a single `-`.
///
/// Surrounding whitespace is dropped. Applying it to an existing slug returns
/// the slug unchanged.
pub fn slugify(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Validates an RFC 1123 subdomain used as an object name.
pub(crate) fn validate_resource_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::field(field, "Name cannot be empty"));
    }
    if name.len() > MAX_SUBDOMAIN_LENGTH {
        return Err(ValidationError::Format(format!(
            "Name cannot exceed {} characters",
            MAX_SUBDOMAIN_LENGTH
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(ValidationError::Format(format!(
            "'{}' may only contain lower-case alphanumerics, '-' and '.'",
            name
        )));
    }
    if !starts_and_ends_alphanumeric(name) {
        return Err(ValidationError::Format(format!(
            "'{}' must start and end with an alphanumeric character",
            name
        )));
    }
    Ok(())
}

/// Validates an RFC 1123 label, as required for namespaces.
pub(crate) fn validate_namespace(field: &str, namespace: &str) -> Result<(), ValidationError> {
    if namespace.is_empty() {
        return Err(ValidationError::field(field, "Namespace cannot be empty"));
    }
    if namespace.len() > MAX_LABEL_LENGTH {
        return Err(ValidationError::Format(format!(
            "Namespace cannot exceed {} characters",
            MAX_LABEL_LENGTH
        )));
    }
    if !namespace
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::Format(format!(
            "'{}' may only contain lower-case alphanumerics and '-'",
            namespace
        )));
    }
    if !starts_and_ends_alphanumeric(namespace) {
        return Err(ValidationError::Format(format!(
            "'{}' must start and end with an alphanumeric character",
            namespace
        )));
    }
    Ok(())
}

fn starts_and_ends_alphanumeric(value: &str) -> bool {
    let alnum = |c: char| c.is_ascii_alphanumeric();
    value.chars().next().is_some_and(alnum) && value.chars().last().is_some_and(alnum)
}
