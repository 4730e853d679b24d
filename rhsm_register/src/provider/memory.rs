//! In-memory provider
//!
//! Holds observed registration states keyed by identifier and records every
//! call it receives. Used by the CLI planner and by reconciliation tests.

use super::{ProviderError, ProviderOperation, RegistrationProvider};
use crate::ensure::EnsureState;
use crate::resource::{Identifier, RegistrationResource};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One call received by a [`MemoryProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub operation: ProviderOperation,
    pub identifier: Identifier,
}

pub struct MemoryProvider {
    default_state: EnsureState,
    states: Mutex<HashMap<Identifier, EnsureState>>,
    calls: Mutex<Vec<ProviderCall>>,
    failing: HashSet<ProviderOperation>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    /// Unknown identifiers are observed as `absent`
    pub fn new() -> Self {
        Self::with_default_state(EnsureState::Absent)
    }

    pub fn with_default_state(default_state: EnsureState) -> Self {
        Self {
            default_state,
            states: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
        }
    }

    /// Seed the observed state for one server
    pub fn with_state(self, identifier: Identifier, state: EnsureState) -> Self {
        self.set_state(identifier, state);
        self
    }

    /// Make every call of `operation` fail
    pub fn failing_on(mut self, operation: ProviderOperation) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn set_state(&self, identifier: Identifier, state: EnsureState) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(identifier, state);
        }
    }

    pub fn state_of(&self, identifier: &Identifier) -> EnsureState {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(identifier).copied())
            .unwrap_or(self.default_state)
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Calls that change state (create/destroy)
    pub fn mutating_calls(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation != ProviderOperation::QueryState)
            .collect()
    }

    fn record(
        &self,
        operation: ProviderOperation,
        identifier: &Identifier,
    ) -> Result<(), ProviderError> {
        let mut calls = self.calls.lock().map_err(|_| ProviderError::Unavailable {
            reason: "call log poisoned".to_string(),
        })?;
        calls.push(ProviderCall {
            operation,
            identifier: identifier.clone(),
        });

        if self.failing.contains(&operation) {
            return Err(ProviderError::operation_failed(
                operation,
                identifier,
                "injected failure",
            ));
        }
        Ok(())
    }
}

impl RegistrationProvider for MemoryProvider {
    fn create(&self, resource: &RegistrationResource) -> Result<(), ProviderError> {
        self.record(ProviderOperation::Create, resource.identifier())?;
        self.set_state(resource.identifier().clone(), EnsureState::Present);
        Ok(())
    }

    fn destroy(&self, resource: &RegistrationResource) -> Result<(), ProviderError> {
        self.record(ProviderOperation::Destroy, resource.identifier())?;
        self.set_state(resource.identifier().clone(), EnsureState::Absent);
        Ok(())
    }

    fn query_state(&self, identifier: &Identifier) -> Result<EnsureState, ProviderError> {
        self.record(ProviderOperation::QueryState, identifier)?;
        Ok(self.state_of(identifier))
    }

    fn provider_id(&self) -> &str {
        "memory"
    }
}
