//! Errors raised by remote collaborators
//!
//! Option fetch failures degrade to an empty tier; existence lookup
//! failures become a dismissable warning.

use pickers_core::PickerError;
use thiserror::Error;

/// Result type alias for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of an autocomplete or catalog call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The collaborator answered with an error
    #[error("Request to '{resource}' failed: {message}")]
    Request { resource: String, message: String },

    /// The collaborator does not serve this resource
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Static fixture data could not be loaded
    #[error("Failed to load fixture: {0}")]
    Fixture(String),
}

impl RemoteError {
    /// Create a request error
    pub fn request(resource: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Request {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// The resource this error concerns, if known
    pub fn resource(&self) -> Option<&str> {
        match self {
            RemoteError::Request { resource, .. } | RemoteError::UnknownResource(resource) => {
                Some(resource)
            }
            RemoteError::Fixture(_) => None,
        }
    }
}

impl From<RemoteError> for PickerError {
    fn from(err: RemoteError) -> Self {
        let resource = err.resource().unwrap_or("fixture").to_string();
        PickerError::remote(resource, err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
