//! # Reconciliation
//!
//! One pass per resource: observe, decide with [`in_sync`], then ask the
//! provider to create or destroy. `force` makes a present-desired resource
//! register on every pass even when already in sync.

pub mod report;

pub use report::{ReconcileFailure, ReconcileReport, ReconcileSummary};

use crate::ensure::{in_sync, EnsureState};
use crate::logging::codes;
use crate::provider::{ProviderError, ProviderOperation, RegistrationProvider};
use crate::resource::{Identifier, RegistrationResource};
use crate::{log_debug, log_error, log_success, log_warning};
use serde::Serialize;

/// What a reconciliation pass decided to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedAction {
    None,
    Create,
    Destroy,
    /// Create although already in sync, because `force` is set
    ForceCreate,
}

impl PlannedAction {
    pub fn is_change(&self) -> bool {
        !matches!(self, PlannedAction::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedAction::None => "none",
            PlannedAction::Create => "create",
            PlannedAction::Destroy => "destroy",
            PlannedAction::ForceCreate => "force_create",
        }
    }
}

/// Decide the provider action for one pass
///
/// Out of sync: `present` in the desired list means create, otherwise
/// `absent` means destroy. In sync: only `force` with a present-desired
/// resource triggers a create.
pub fn plan_action(desired: &[EnsureState], observed: EnsureState, force: bool) -> PlannedAction {
    let wants_present = desired.contains(&EnsureState::Present);

    if in_sync(desired, observed) {
        if force && wants_present {
            return PlannedAction::ForceCreate;
        }
        return PlannedAction::None;
    }

    if wants_present {
        PlannedAction::Create
    } else if desired.contains(&EnsureState::Absent) {
        PlannedAction::Destroy
    } else {
        PlannedAction::None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Reconciliation of '{identifier}' failed: {source}")]
    Provider {
        identifier: Identifier,
        #[source]
        source: ProviderError,
    },
}

impl ReconcileError {
    pub fn identifier(&self) -> &Identifier {
        match self {
            ReconcileError::Provider { identifier, .. } => identifier,
        }
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub identifier: Identifier,
    pub desired: EnsureState,
    pub observed: EnsureState,
    pub in_sync: bool,
    pub action: PlannedAction,
    /// False for no-op passes and dry runs
    pub applied: bool,
}

/// Reconciler behavior switches
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Decide actions without invoking create/destroy
    pub dry_run: bool,

    /// Act on a resource's `force` flag; when false, in-sync resources are
    /// left alone regardless of `force`
    pub honor_force: bool,

    /// Stop `reconcile_all` at the first provider error
    pub fail_fast: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            honor_force: true,
            fail_fast: false,
        }
    }
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_honor_force(mut self, honor_force: bool) -> Self {
        self.honor_force = honor_force;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Drives resources toward their desired state through an injected provider
pub struct Reconciler<P: RegistrationProvider> {
    provider: P,
    config: ReconcilerConfig,
}

impl<P: RegistrationProvider> Reconciler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ReconcilerConfig::default())
    }

    pub fn with_config(provider: P, config: ReconcilerConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Run one pass for a single resource
    pub fn reconcile(
        &self,
        resource: &RegistrationResource,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let identifier = resource.identifier();
        let desired = resource.ensure();

        let observed = self
            .provider
            .query_state(identifier)
            .map_err(|source| {
                self.provider_failure(identifier, ProviderOperation::QueryState, source)
            })?;

        let synced = in_sync(&[desired], observed);
        let force = resource.force() && self.config.honor_force;
        let action = plan_action(&[desired], observed, force);

        log_debug!(
            "Reconciliation decision",
            "server_hostname" => identifier,
            "desired" => desired,
            "observed" => observed,
            "in_sync" => synced,
            "action" => action.as_str()
        );

        let mut outcome = ReconcileOutcome {
            identifier: identifier.clone(),
            desired,
            observed,
            in_sync: synced,
            action,
            applied: false,
        };

        if !action.is_change() {
            log_success!(
                codes::success::RESOURCE_IN_SYNC,
                "Registration already in desired state",
                "server_hostname" => identifier,
                "state" => observed
            );
            return Ok(outcome);
        }

        if action == PlannedAction::ForceCreate {
            log_warning!(
                codes::warnings::FORCED_REGISTRATION,
                "Forcing registration of an in-sync system",
                "server_hostname" => identifier
            );
        }

        if self.config.dry_run {
            return Ok(outcome);
        }

        match action {
            PlannedAction::Create | PlannedAction::ForceCreate => {
                let credentials = resource.credentials();
                if !credentials.is_usable() {
                    log_warning!(
                        codes::warnings::AMBIGUOUS_CREDENTIALS,
                        "Registering without a single usable credential set",
                        "server_hostname" => identifier,
                        "credentials" => format!("{:?}", credentials)
                    );
                }

                self.provider.create(resource).map_err(|source| {
                    self.provider_failure(identifier, ProviderOperation::Create, source)
                })?;

                log_success!(
                    codes::success::RESOURCE_CREATED,
                    "System registered",
                    "server_hostname" => identifier,
                    "provider" => self.provider.provider_id()
                );
            }
            PlannedAction::Destroy => {
                self.provider.destroy(resource).map_err(|source| {
                    self.provider_failure(identifier, ProviderOperation::Destroy, source)
                })?;

                log_success!(
                    codes::success::RESOURCE_DESTROYED,
                    "System unregistered",
                    "server_hostname" => identifier,
                    "provider" => self.provider.provider_id()
                );
            }
            PlannedAction::None => {}
        }

        outcome.applied = true;
        Ok(outcome)
    }

    /// Reconcile resources in order, collecting outcomes and failures
    pub fn reconcile_all(&self, resources: &[RegistrationResource]) -> ReconcileReport {
        let mut report = ReconcileReport::new(self.config.dry_run);

        for resource in resources {
            match self.reconcile(resource) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(error) => {
                    report.failures.push(ReconcileFailure::from_error(&error));
                    if self.config.fail_fast {
                        break;
                    }
                }
            }
        }

        log_success!(
            codes::success::RECONCILIATION_COMPLETE,
            "Reconciliation pass complete",
            "resources" => resources.len(),
            "changed" => report.summary().changed,
            "failed" => report.failures.len()
        );

        report
    }

    fn provider_failure(
        &self,
        identifier: &Identifier,
        operation: ProviderOperation,
        source: ProviderError,
    ) -> ReconcileError {
        log_error!(
            operation.failure_code(),
            "Provider operation failed",
            "server_hostname" => identifier,
            "operation" => operation,
            "error" => &source
        );

        ReconcileError::Provider {
            identifier: identifier.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{with_scoped_logger, LogLevel, LoggingService, MemoryLogger};
    use crate::provider::{MemoryProvider, ProviderCall};
    use crate::resource::{CredentialMode, RegistrationResourceBuilder};
    use assert_matches::assert_matches;
    use std::sync::Arc;
    use EnsureState::{Absent, Present};

    fn id(host: &str) -> Identifier {
        host.parse().unwrap()
    }

    /// Run `f` with reconciler events captured in memory
    fn capture_events<R>(f: impl FnOnce() -> R) -> (R, Arc<MemoryLogger>) {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        let result = with_scoped_logger(service, f);
        (result, memory)
    }

    #[test]
    fn test_plan_action_table() {
        assert_eq!(plan_action(&[Present], Present, false), PlannedAction::None);
        assert_eq!(plan_action(&[Present], Absent, false), PlannedAction::Create);
        assert_eq!(plan_action(&[Absent], Present, false), PlannedAction::Destroy);
        assert_eq!(plan_action(&[Absent], Absent, false), PlannedAction::None);
        assert_eq!(
            plan_action(&[Present], Present, true),
            PlannedAction::ForceCreate
        );
        assert_eq!(plan_action(&[Present], Absent, true), PlannedAction::Create);
        // force never turns an absent-desired resource into a registration
        assert_eq!(plan_action(&[Absent], Absent, true), PlannedAction::None);
        assert_eq!(
            plan_action(&[Present, Absent], Absent, false),
            PlannedAction::None
        );
        assert_eq!(plan_action(&[], Present, false), PlannedAction::None);
    }

    #[test]
    fn test_absent_observed_triggers_create() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .ensure(Present)
            .insecure(false)
            .build()
            .unwrap();
        let reconciler = Reconciler::new(MemoryProvider::new());

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert!(!outcome.in_sync);
        assert_eq!(outcome.action, PlannedAction::Create);
        assert!(outcome.applied);
        assert_eq!(
            reconciler.provider().mutating_calls(),
            vec![ProviderCall {
                operation: ProviderOperation::Create,
                identifier: id("rhn.redhat.com"),
            }]
        );
        assert_eq!(
            reconciler.provider().state_of(&id("rhn.redhat.com")),
            Present
        );
    }

    #[test]
    fn test_force_creates_even_when_in_sync() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .ensure(Present)
            .force(true)
            .build()
            .unwrap();
        let provider = MemoryProvider::new().with_state(id("rhn.redhat.com"), Present);
        let reconciler = Reconciler::new(provider);

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert!(outcome.in_sync);
        assert_eq!(outcome.action, PlannedAction::ForceCreate);
        assert!(outcome.applied);
        assert_eq!(reconciler.provider().mutating_calls().len(), 1);

        // And again on the next pass
        reconciler.reconcile(&resource).unwrap();
        assert_eq!(reconciler.provider().mutating_calls().len(), 2);
    }

    #[test]
    fn test_in_sync_pass_calls_nothing() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .build()
            .unwrap();
        let provider = MemoryProvider::new().with_state(id("RHN.redhat.com"), Present);
        let reconciler = Reconciler::new(&provider);

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert!(outcome.in_sync);
        assert!(!outcome.applied);
        assert!(provider.mutating_calls().is_empty());
    }

    #[test]
    fn test_absent_desired_destroys() {
        let resource = RegistrationResource::builder("sat.example.com")
            .ensure(Absent)
            .build()
            .unwrap();
        let provider = MemoryProvider::with_default_state(Present);
        let reconciler = Reconciler::new(&provider);

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert_eq!(outcome.action, PlannedAction::Destroy);
        assert_eq!(provider.state_of(resource.identifier()), Absent);
    }

    #[test]
    fn test_dry_run_plans_without_applying() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .build()
            .unwrap();
        let provider = MemoryProvider::new();
        let reconciler =
            Reconciler::with_config(&provider, ReconcilerConfig::new().with_dry_run(true));

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert_eq!(outcome.action, PlannedAction::Create);
        assert!(!outcome.applied);
        assert!(provider.mutating_calls().is_empty());
        assert_eq!(provider.state_of(resource.identifier()), Absent);
    }

    #[test]
    fn test_provider_errors_are_not_retried() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .build()
            .unwrap();
        let provider = MemoryProvider::new().failing_on(ProviderOperation::Create);
        let reconciler = Reconciler::new(&provider);

        let err = reconciler.reconcile(&resource).unwrap_err();

        assert_eq!(err.identifier(), &id("rhn.redhat.com"));
        assert_matches!(
            err,
            ReconcileError::Provider {
                source: ProviderError::OperationFailed {
                    operation: ProviderOperation::Create,
                    ..
                },
                ..
            }
        );
        assert_eq!(provider.mutating_calls().len(), 1);
    }

    #[test]
    fn test_query_failure_stops_before_apply() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .build()
            .unwrap();
        let provider = MemoryProvider::new().failing_on(ProviderOperation::QueryState);
        let reconciler = Reconciler::new(&provider);

        assert!(reconciler.reconcile(&resource).is_err());
        assert!(provider.mutating_calls().is_empty());
    }

    #[test]
    fn test_reconcile_all_collects_failures() {
        let resources = vec![
            RegistrationResource::builder("a.example.com")
                .build()
                .unwrap(),
            RegistrationResource::builder("b.example.com")
                .ensure(Absent)
                .build()
                .unwrap(),
        ];
        let provider = MemoryProvider::new().failing_on(ProviderOperation::Create);

        let report = Reconciler::new(&provider).reconcile_all(&resources);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.outcomes.len(), 1);
        assert!(!report.is_success());

        let fail_fast = Reconciler::with_config(
            &provider,
            ReconcilerConfig::new().with_fail_fast(true),
        )
        .reconcile_all(&resources);
        assert_eq!(fail_fast.failures.len(), 1);
        assert!(fail_fast.outcomes.is_empty());
    }

    #[test]
    fn test_honor_force_disabled_leaves_in_sync_resource_alone() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .force(true)
            .build()
            .unwrap();
        let provider = MemoryProvider::with_default_state(Present);
        let reconciler = Reconciler::with_config(
            &provider,
            ReconcilerConfig::new().with_honor_force(false),
        );

        let outcome = reconciler.reconcile(&resource).unwrap();

        assert!(outcome.in_sync);
        assert_eq!(outcome.action, PlannedAction::None);
        assert!(provider.mutating_calls().is_empty());

        // Out-of-sync resources are still created
        let provider = MemoryProvider::new();
        let outcome = Reconciler::with_config(
            &provider,
            ReconcilerConfig::new().with_honor_force(false),
        )
        .reconcile(&resource)
        .unwrap();
        assert_eq!(outcome.action, PlannedAction::Create);
    }

    #[test]
    fn test_config_defaults() {
        let config = ReconcilerConfig::default();
        assert!(!config.dry_run);
        assert!(config.honor_force);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_unusable_credentials_warn_before_create() {
        let cases: Vec<(RegistrationResourceBuilder, CredentialMode)> = vec![
            (
                RegistrationResource::builder("rhn.redhat.com")
                    .username("admin")
                    .password("secret")
                    .activation_keys("rhel9"),
                CredentialMode::Conflicting,
            ),
            (
                RegistrationResource::builder("rhn.redhat.com").username("admin"),
                CredentialMode::Incomplete,
            ),
            (
                RegistrationResource::builder("rhn.redhat.com"),
                CredentialMode::None,
            ),
        ];

        for (builder, mode) in cases {
            let resource = builder.build().unwrap();
            assert_eq!(resource.credentials(), mode);

            let provider = MemoryProvider::new();
            let (outcome, events) =
            capture_events(|| Reconciler::new(&provider).reconcile(&resource));

            assert!(outcome.unwrap().applied);
            assert!(
                events.has_code(codes::warnings::AMBIGUOUS_CREDENTIALS),
                "no credential warning for {:?}",
                mode
            );
            assert!(events.has_code(codes::success::RESOURCE_CREATED));
        }
    }

    #[test]
    fn test_usable_credentials_do_not_warn() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .activation_keys("rhel9")
            .org("acme")
            .build()
            .unwrap();
        let provider = MemoryProvider::new();

        let (outcome, events) =
            capture_events(|| Reconciler::new(&provider).reconcile(&resource));

        assert!(outcome.unwrap().applied);
        assert!(!events.has_code(codes::warnings::AMBIGUOUS_CREDENTIALS));
    }

    #[test]
    fn test_forced_registration_warns() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .username("admin")
            .password("secret")
            .force(true)
            .build()
            .unwrap();
        let provider = MemoryProvider::with_default_state(Present);

        let (outcome, events) =
            capture_events(|| Reconciler::new(&provider).reconcile(&resource));

        assert_eq!(outcome.unwrap().action, PlannedAction::ForceCreate);
        assert!(events.has_code(codes::warnings::FORCED_REGISTRATION));
        assert!(!events.has_code(codes::warnings::AMBIGUOUS_CREDENTIALS));
    }

    #[test]
    fn test_provider_failure_is_logged_with_operation_code() {
        let resource = RegistrationResource::builder("rhn.redhat.com")
            .ensure(Absent)
            .build()
            .unwrap();
        let provider = MemoryProvider::with_default_state(Present)
            .failing_on(ProviderOperation::Destroy);

        let (result, events) =
            capture_events(|| Reconciler::new(&provider).reconcile(&resource));

        assert!(result.is_err());
        assert!(events.has_code(codes::provider::DESTROY_FAILED));
        assert!(!events.has_code(codes::success::RESOURCE_DESTROYED));
    }
}
