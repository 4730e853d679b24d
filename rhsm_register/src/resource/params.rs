//! Parameter catalogue for the `rhsm_register` resource

use serde::Serialize;

/// Resource-level documentation shown by `describe`
pub const RESOURCE_DOC: &str = "Register a system to a Satellite or Spacewalk server.

Example:

  [[rhsm_register]]
  server_hostname = \"rhn.redhat.com\"
  server_insecure = false
  username        = \"registered_user\"
  password        = \"password123\"";

/// Primitive kind of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Boolean,
    Enum,
}

/// One declared parameter: name, kind, default and rule
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub namevar: bool,
    pub default: Option<&'static str>,
    /// Format rule enforced at construction, if any
    pub rule: Option<&'static str>,
    pub description: &'static str,
}

const fn string(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec {
        name,
        kind: ParameterKind::String,
        namevar: false,
        default: None,
        rule: None,
        description,
    }
}

const fn boolean(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec {
        name,
        kind: ParameterKind::Boolean,
        namevar: false,
        default: Some("false"),
        rule: None,
        description,
    }
}

static PARAMETER_SPECS: [ParameterSpec; 14] = [
    ParameterSpec {
        name: "server_hostname",
        kind: ParameterKind::String,
        namevar: true,
        default: None,
        rule: Some(super::validation::IDENTIFIER_PATTERN),
        description: "The rhsm server hostname.",
    },
    ParameterSpec {
        name: "ensure",
        kind: ParameterKind::Enum,
        namevar: false,
        default: Some("present"),
        rule: Some("present | absent"),
        description: "Whether the system should be registered (present) or not (absent).",
    },
    boolean(
        "server_insecure",
        "Should an insecure https connection be used.",
    ),
    boolean(
        "autosubscribe",
        "Automatically attach this system to compatible subscriptions.",
    ),
    boolean(
        "force",
        "Should the registration be forced. Use this option with caution, setting it true \
         will cause the registration to be run on every reconciliation pass.",
    ),
    string(
        "server_prefix",
        "The prefix used for registration queries sent to the rhsm server.",
    ),
    ParameterSpec {
        name: "rhsm_baseurl",
        kind: ParameterKind::String,
        namevar: false,
        default: None,
        rule: Some(super::validation::BASE_URL_PATTERN),
        description: "Specify a CDN baseurl to use.",
    },
    string(
        "rhsm_cacert",
        "CA certificate for the repository and the issued client certs.",
    ),
    string(
        "username",
        "The username to use when registering the system.",
    ),
    string(
        "password",
        "The password to use when registering the system.",
    ),
    string(
        "activationkeys",
        "The activation key to use when registering the system (cannot be used with \
         username and password).",
    ),
    string(
        "pool",
        "The license pool to attach to after registering the system.",
    ),
    string(
        "environment",
        "The environment to subscribe to in the case of using katello.",
    ),
    ParameterSpec {
        name: "org",
        kind: ParameterKind::String,
        namevar: false,
        default: None,
        rule: Some("non-empty"),
        description: "The organization the system should be assigned to.",
    },
];

/// All parameters in declaration order
pub fn parameter_specs() -> &'static [ParameterSpec] {
    &PARAMETER_SPECS
}

/// Look up a parameter by its manifest name
pub fn parameter_spec(name: &str) -> Option<&'static ParameterSpec> {
    PARAMETER_SPECS.iter().find(|spec| spec.name == name)
}
