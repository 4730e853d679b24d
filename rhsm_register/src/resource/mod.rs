//! # Registration resource
//!
//! Desired state of one host registration. A [`RegistrationResource`] can
//! only be obtained from [`RegistrationResourceBuilder::build`], which runs
//! every validation rule, so holding one means its parameters are valid.

pub mod error;
pub mod identifier;
pub mod params;
pub mod validation;

pub use error::ValidationError;
pub use identifier::{identifiers_match, Identifier};
pub use params::{parameter_spec, parameter_specs, ParameterKind, ParameterSpec, RESOURCE_DOC};
pub use validation::{validate_base_url, validate_identifier, validate_org};

use crate::ensure::EnsureState;
use serde::{Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "<redacted>";

/// Which credentials a resource carries
///
/// Exclusivity between the two credential styles is a documented
/// precondition, not a construction rule; callers decide what to do with
/// the non-usable modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    UserPassword,
    ActivationKeys,
    /// Both username/password and activation keys were supplied
    Conflicting,
    /// Only one half of the username/password pair was supplied
    Incomplete,
    None,
}

impl CredentialMode {
    /// True for the two modes a registration can proceed with
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            CredentialMode::UserPassword | CredentialMode::ActivationKeys
        )
    }
}

/// Validated desired state for registering with one server
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResource {
    #[serde(rename = "server_hostname")]
    identifier: Identifier,
    ensure: EnsureState,
    #[serde(rename = "server_insecure")]
    insecure: bool,
    autosubscribe: bool,
    force: bool,
    server_prefix: Option<String>,
    #[serde(rename = "rhsm_baseurl")]
    base_url: Option<String>,
    #[serde(rename = "rhsm_cacert")]
    ca_cert: Option<String>,
    username: Option<String>,
    #[serde(serialize_with = "serialize_redacted")]
    password: Option<String>,
    #[serde(rename = "activationkeys", serialize_with = "serialize_redacted")]
    activation_keys: Option<String>,
    pool: Option<String>,
    environment: Option<String>,
    org: Option<String>,
}

fn serialize_redacted<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(_) => serializer.serialize_some(REDACTED),
        None => serializer.serialize_none(),
    }
}

impl RegistrationResource {
    /// Resource-level documentation, as shown by `describe`
    pub const DOC: &'static str = RESOURCE_DOC;

    /// Start building a resource for the given server hostname
    pub fn builder(server_hostname: impl Into<String>) -> RegistrationResourceBuilder {
        RegistrationResourceBuilder::new(server_hostname)
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn ensure(&self) -> EnsureState {
        self.ensure
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn autosubscribe(&self) -> bool {
        self.autosubscribe
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn server_prefix(&self) -> Option<&str> {
        self.server_prefix.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn ca_cert(&self) -> Option<&str> {
        self.ca_cert.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn activation_keys(&self) -> Option<&str> {
        self.activation_keys.as_deref()
    }

    pub fn pool(&self) -> Option<&str> {
        self.pool.as_deref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    /// Classify the supplied credentials
    pub fn credentials(&self) -> CredentialMode {
        let user = self.username.is_some();
        let pass = self.password.is_some();
        let keys = self.activation_keys.is_some();

        match (user || pass, keys) {
            (true, true) => CredentialMode::Conflicting,
            (false, true) => CredentialMode::ActivationKeys,
            (true, false) if user && pass => CredentialMode::UserPassword,
            (true, false) => CredentialMode::Incomplete,
            (false, false) => CredentialMode::None,
        }
    }

    /// Same registration server, regardless of hostname case
    pub fn same_entity(&self, other: &RegistrationResource) -> bool {
        self.identifier == other.identifier
    }
}

impl fmt::Debug for RegistrationResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| REDACTED);

        f.debug_struct("RegistrationResource")
            .field("identifier", &self.identifier)
            .field("ensure", &self.ensure)
            .field("insecure", &self.insecure)
            .field("autosubscribe", &self.autosubscribe)
            .field("force", &self.force)
            .field("server_prefix", &self.server_prefix)
            .field("base_url", &self.base_url)
            .field("ca_cert", &self.ca_cert)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("activation_keys", &redact(&self.activation_keys))
            .field("pool", &self.pool)
            .field("environment", &self.environment)
            .field("org", &self.org)
            .finish()
    }
}

/// Collects raw parameter values; validation runs in [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct RegistrationResourceBuilder {
    server_hostname: String,
    ensure: EnsureState,
    insecure: bool,
    autosubscribe: bool,
    force: bool,
    server_prefix: Option<String>,
    base_url: Option<String>,
    ca_cert: Option<String>,
    username: Option<String>,
    password: Option<String>,
    activation_keys: Option<String>,
    pool: Option<String>,
    environment: Option<String>,
    org: Option<String>,
}

impl RegistrationResourceBuilder {
    pub fn new(server_hostname: impl Into<String>) -> Self {
        Self {
            server_hostname: server_hostname.into(),
            ..Self::default()
        }
    }

    pub fn ensure(mut self, ensure: EnsureState) -> Self {
        self.ensure = ensure;
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn autosubscribe(mut self, autosubscribe: bool) -> Self {
        self.autosubscribe = autosubscribe;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn server_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.server_prefix = Some(prefix.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn ca_cert(mut self, ca_cert: impl Into<String>) -> Self {
        self.ca_cert = Some(ca_cert.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn activation_keys(mut self, keys: impl Into<String>) -> Self {
        self.activation_keys = Some(keys.into());
        self
    }

    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Validate every parameter and produce the resource
    ///
    /// Fails fast in declaration order: `server_hostname`, `rhsm_baseurl`,
    /// then `org`.
    pub fn build(self) -> Result<RegistrationResource, ValidationError> {
        let identifier = validate_identifier(&self.server_hostname)?;
        let base_url = self.base_url.as_deref().map(validate_base_url).transpose()?;
        let org = self.org.as_deref().map(validate_org).transpose()?;

        Ok(RegistrationResource {
            identifier,
            ensure: self.ensure,
            insecure: self.insecure,
            autosubscribe: self.autosubscribe,
            force: self.force,
            server_prefix: self.server_prefix,
            base_url,
            ca_cert: self.ca_cert,
            username: self.username,
            password: self.password,
            activation_keys: self.activation_keys,
            pool: self.pool,
            environment: self.environment,
            org,
        })
    }
}
