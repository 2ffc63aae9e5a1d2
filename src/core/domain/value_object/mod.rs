mod gateway_url;
mod resource_name;
pub(crate) mod serde_helpers;

pub use gateway_url::GatewayUrl;
pub use resource_name::{ResourceName, slugify};

// Re-export validation functions for internal use
pub(crate) use resource_name::{validate_namespace, validate_resource_name};
