//! Serde helpers for the gateway's JSON quirks.

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as the type's default value.
///
/// The gateway is backed by Go, which encodes empty slices and maps as
/// `null`. Use together with `#[serde(default)]` so a missing key also yields
/// the default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an empty string as `None`.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
