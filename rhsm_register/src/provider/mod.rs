//! # Provider boundary
//!
//! The collaborator that turns desired registration state into real effects
//! (API or `subscription-manager` calls). Implementations are supplied by the
//! caller; this crate only ships [`MemoryProvider`] for planning and tests.

pub mod memory;

pub use memory::{MemoryProvider, ProviderCall};

use crate::ensure::EnsureState;
use crate::logging::{codes, Code};
use crate::resource::{Identifier, RegistrationResource};
use serde::Serialize;
use std::fmt;

/// Operation a provider was asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    Create,
    Destroy,
    QueryState,
}

impl ProviderOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderOperation::Create => "create",
            ProviderOperation::Destroy => "destroy",
            ProviderOperation::QueryState => "query_state",
        }
    }

    pub fn failure_code(&self) -> Code {
        match self {
            ProviderOperation::Create => codes::provider::CREATE_FAILED,
            ProviderOperation::Destroy => codes::provider::DESTROY_FAILED,
            ProviderOperation::QueryState => codes::provider::QUERY_FAILED,
        }
    }
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque provider failure; never retried by this crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider {operation} failed for '{identifier}': {reason}")]
    OperationFailed {
        operation: ProviderOperation,
        identifier: String,
        reason: String,
    },

    #[error("Provider unavailable: {reason}")]
    Unavailable { reason: String },
}

impl ProviderError {
    pub fn operation_failed(
        operation: ProviderOperation,
        identifier: &Identifier,
        reason: impl Into<String>,
    ) -> Self {
        ProviderError::OperationFailed {
            operation,
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// Realizes `present`/`absent` transitions for registration resources
///
/// Each call either succeeds and leaves the system in the requested state or
/// fails as a whole; there is no partial success.
pub trait RegistrationProvider: Send + Sync {
    /// Register the host using the resource's credentials, org, environment,
    /// pool, base url, CA cert, insecure and autosubscribe settings
    fn create(&self, resource: &RegistrationResource) -> Result<(), ProviderError>;

    /// Unregister the host
    fn destroy(&self, resource: &RegistrationResource) -> Result<(), ProviderError>;

    /// Currently observed registration state for a server
    fn query_state(&self, identifier: &Identifier) -> Result<EnsureState, ProviderError>;

    /// Provider identifier for logging
    fn provider_id(&self) -> &str {
        "provider"
    }
}

impl<P: RegistrationProvider + ?Sized> RegistrationProvider for &P {
    fn create(&self, resource: &RegistrationResource) -> Result<(), ProviderError> {
        (**self).create(resource)
    }

    fn destroy(&self, resource: &RegistrationResource) -> Result<(), ProviderError> {
        (**self).destroy(resource)
    }

    fn query_state(&self, identifier: &Identifier) -> Result<EnsureState, ProviderError> {
        (**self).query_state(identifier)
    }

    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }
}
