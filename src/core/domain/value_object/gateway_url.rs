use crate::core::domain::error::{ImportResult, ValidationError};
use url::Url;

const MAX_URL_LENGTH: usize = 2083; // RFC 7230 practical limit
const ALLOWED_SCHEMES: [&str; 2] = ["https", "http"];
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// A validated base URL of the import gateway.
///
/// The gateway serves its REST API under `/api/v1`. The base URL may carry a
/// path prefix (for example when the UI is published behind an ingress),
/// which is kept in front of `/api/v1`.
///
/// # Examples
///
/// ```
/// use harvester_vm_import::GatewayUrl;
///
/// let url = GatewayUrl::new("https://import.example.com/").unwrap();
/// let endpoint = url.endpoint(&["plans", "ns1", "web plan"]);
/// assert_eq!(
///     endpoint.as_str(),
///     "https://import.example.com/api/v1/plans/ns1/web%20plan"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayUrl(Url);

impl GatewayUrl {
    /// Parses and validates a base URL.
    pub fn new(url: &str) -> ImportResult<Self> {
        let parsed = validate_url(url)?;
        Ok(Self(parsed))
    }

    /// Returns the base URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Builds the URL of an API endpoint from raw path segments.
    ///
    /// Each segment is percent-encoded, so names containing `/` or spaces
    /// cannot escape their position in the path.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }
}

/// Validates a gateway base URL and returns it parsed.
pub(crate) fn validate_url(url: &str) -> Result<Url, ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::field("url", "URL cannot be empty"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::field("url", "URL must contain a host"));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::ConstraintViolation(
            "Base URL cannot carry a query or fragment".to_string(),
        ));
    }

    Ok(parsed)
}
