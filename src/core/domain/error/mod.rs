use std::backtrace::Backtrace;
use thiserror::Error;

/// The main error type for VM import operations.
///
/// This enum represents all possible errors that can occur while talking
/// to the import gateway or driving the dashboard model, including
/// transport, API, decoding and validation failures.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Represents errors that occur before a response is received
    ///
    /// # Fields
    /// * `0` - A description of what went wrong with the transport
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents a non-success HTTP status returned by the gateway
    ///
    /// # Fields
    /// * `status` - The HTTP status code
    /// * `message` - The `error` field of the JSON body, or the raw body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Represents a response body that could not be decoded
    ///
    /// # Fields
    /// * `0` - A description of the decoding failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Represents local validation failures with detailed context
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    /// * `backtrace` - Stack trace where the error occurred
    #[error("Validation error: {source}")]
    Validation {
        source: ValidationError,
        backtrace: Backtrace,
    },

    /// Represents an operation refused by the current form or wizard state
    ///
    /// # Fields
    /// * `0` - Why the operation was refused
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ImportError {
    /// Returns the HTTP status when the gateway answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ImportError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Api { message, .. } => message.clone(),
            ImportError::Validation { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for ImportError {
    fn from(error: ValidationError) -> Self {
        ImportError::Validation {
            source: error,
            backtrace: Backtrace::capture(),
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Type alias for Results that may fail with an ImportError
pub type ImportResult<T> = Result<T, ImportError>;
