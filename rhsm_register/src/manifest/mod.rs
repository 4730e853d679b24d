//! # Manifests
//!
//! TOML files declaring `rhsm_register` resources, keyed by the resource's
//! parameter names:
//!
//! ```toml
//! [[rhsm_register]]
//! server_hostname = "rhn.redhat.com"
//! server_insecure = false
//! username        = "registered_user"
//! password        = "password123"
//! ```
//!
//! Every entry is validated while loading; the first invalid entry aborts
//! the load. Observation files used for planning map hostnames to states:
//!
//! ```toml
//! [observed]
//! "rhn.redhat.com" = "present"
//! ```

pub mod error;

pub use error::ManifestError;

use crate::ensure::EnsureState;
use crate::logging::codes;
use crate::resource::{Identifier, RegistrationResource, ValidationError};
use crate::{log_error, log_success};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Raw, unvalidated resource declaration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub server_hostname: Option<String>,
    pub ensure: Option<String>,
    pub server_insecure: Option<bool>,
    pub autosubscribe: Option<bool>,
    pub force: Option<bool>,
    pub server_prefix: Option<String>,
    pub rhsm_baseurl: Option<String>,
    pub rhsm_cacert: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub activationkeys: Option<String>,
    pub pool: Option<String>,
    pub environment: Option<String>,
    pub org: Option<String>,
}

impl ManifestEntry {
    /// Validate this entry into a resource
    pub fn into_resource(self) -> Result<RegistrationResource, ValidationError> {
        let hostname = self
            .server_hostname
            .ok_or(ValidationError::MissingIdentifier)?;

        let mut builder = RegistrationResource::builder(hostname)
            .insecure(self.server_insecure.unwrap_or(false))
            .autosubscribe(self.autosubscribe.unwrap_or(false))
            .force(self.force.unwrap_or(false));

        if let Some(ensure) = self.ensure {
            builder = builder.ensure(ensure.parse::<EnsureState>()?);
        }
        if let Some(value) = self.server_prefix {
            builder = builder.server_prefix(value);
        }
        if let Some(value) = self.rhsm_baseurl {
            builder = builder.base_url(value);
        }
        if let Some(value) = self.rhsm_cacert {
            builder = builder.ca_cert(value);
        }
        if let Some(value) = self.username {
            builder = builder.username(value);
        }
        if let Some(value) = self.password {
            builder = builder.password(value);
        }
        if let Some(value) = self.activationkeys {
            builder = builder.activation_keys(value);
        }
        if let Some(value) = self.pool {
            builder = builder.pool(value);
        }
        if let Some(value) = self.environment {
            builder = builder.environment(value);
        }
        if let Some(value) = self.org {
            builder = builder.org(value);
        }

        builder.build()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    rhsm_register: Vec<ManifestEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservationsFile {
    #[serde(default)]
    observed: BTreeMap<String, EnsureState>,
}

/// Parse and validate a manifest from TOML text
pub fn parse_manifest(content: &str) -> Result<Vec<RegistrationResource>, ManifestError> {
    let file: ManifestFile = toml::from_str(content).map_err(|e| {
        let error = ManifestError::from(e);
        log_error!(error.code(), "Manifest parse failed", "error" => &error);
        error
    })?;

    let mut resources = Vec::with_capacity(file.rhsm_register.len());
    let mut seen: HashMap<Identifier, usize> = HashMap::new();

    for (index, entry) in file.rhsm_register.into_iter().enumerate() {
        let index = index + 1;
        let server_hostname = entry.server_hostname.clone();

        let resource = entry.into_resource().map_err(|source| {
            log_error!(
                source.code(),
                "Invalid resource declaration",
                "entry" => index,
                "parameter" => source.parameter(),
                "error" => &source
            );
            ManifestError::InvalidEntry {
                index,
                server_hostname,
                source,
            }
        })?;

        if let Some(&first) = seen.get(resource.identifier()) {
            let error = ManifestError::DuplicateResource {
                identifier: resource.identifier().clone(),
                first,
                second: index,
            };
            log_error!(error.code(), "Duplicate resource declaration", "error" => &error);
            return Err(error);
        }

        log_success!(
            codes::success::RESOURCE_VALIDATED,
            "Resource declaration valid",
            "entry" => index,
            "server_hostname" => resource.identifier()
        );

        seen.insert(resource.identifier().clone(), index);
        resources.push(resource);
    }

    log_success!(
        codes::success::MANIFEST_LOADED,
        "Manifest validated",
        "resources" => resources.len()
    );

    Ok(resources)
}

/// Read, parse and validate a manifest file
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<RegistrationResource>, ManifestError> {
    let content = read_file(path.as_ref())?;
    parse_manifest(&content)
}

/// Parse observed states from TOML text
///
/// Hostnames are matched case-insensitively, so two keys that munge to the
/// same identifier are rejected as duplicates. Entries are numbered in key
/// order.
pub fn parse_observations(
    content: &str,
) -> Result<Vec<(Identifier, EnsureState)>, ManifestError> {
    let file: ObservationsFile = toml::from_str(content).map_err(|e| {
        let error = ManifestError::from(e);
        log_error!(error.code(), "Observations parse failed", "error" => &error);
        error
    })?;

    let mut observations = Vec::with_capacity(file.observed.len());
    let mut seen: HashMap<Identifier, usize> = HashMap::new();

    for (index, (hostname, state)) in file.observed.into_iter().enumerate() {
        let index = index + 1;

        let identifier = hostname.parse::<Identifier>().map_err(|source| {
            log_error!(
                source.code(),
                "Invalid observed hostname",
                "entry" => index,
                "error" => &source
            );
            ManifestError::InvalidEntry {
                index,
                server_hostname: Some(hostname.clone()),
                source,
            }
        })?;

        if let Some(&first) = seen.get(&identifier) {
            let error = ManifestError::DuplicateResource {
                identifier,
                first,
                second: index,
            };
            log_error!(error.code(), "Duplicate observed hostname", "error" => &error);
            return Err(error);
        }

        seen.insert(identifier.clone(), index);
        observations.push((identifier, state));
    }

    Ok(observations)
}

pub fn load_observations(
    path: impl AsRef<Path>,
) -> Result<Vec<(Identifier, EnsureState)>, ManifestError> {
    let content = read_file(path.as_ref())?;
    parse_observations(&content)
}

fn read_file(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|source| {
        let error = ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };
        log_error!(error.code(), "Manifest read failed", "error" => &error);
        error
    })
}
