//! # rhsm_register
//!
//! Declarative `rhsm_register` resource for registering a host with a
//! Red Hat Subscription Management, Satellite or Katello server.
//!
//! - [`resource`]: parameter schema, validation and munging
//! - [`ensure`]: the present/absent lifecycle and its in-sync decision
//! - [`provider`]: the injected collaborator that performs registrations
//! - [`reconcile`]: one observe/decide/apply pass per resource
//! - [`manifest`]: TOML declarations of resources

pub mod ensure;
pub mod logging;
pub mod manifest;
pub mod provider;
pub mod reconcile;
pub mod resource;

pub mod prelude {
    pub use crate::ensure::{in_sync, EnsureState};
    pub use crate::manifest::{load_manifest, parse_manifest, ManifestError};
    pub use crate::provider::{
        MemoryProvider, ProviderError, ProviderOperation, RegistrationProvider,
    };
    pub use crate::reconcile::{
        plan_action, PlannedAction, ReconcileError, ReconcileOutcome, ReconcileReport,
        Reconciler, ReconcilerConfig,
    };
    pub use crate::resource::{
        identifiers_match, CredentialMode, Identifier, RegistrationResource,
        RegistrationResourceBuilder, ValidationError,
    };
}
