//! Error, warning and success codes for rhsm_register
//!
//! Every event emitted through the logging macros carries one of these codes.
//! Metadata (category, severity, description, action) lives in a single
//! registry so callers and formatters agree on classification.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Parameter validation codes
pub mod validation {
    use super::Code;

    pub const INVALID_FORMAT: Code = Code::new("E010");
    pub const EMPTY_VALUE: Code = Code::new("E011");
    pub const MISSING_IDENTIFIER: Code = Code::new("E012");
}

/// Provider boundary codes
pub mod provider {
    use super::Code;

    pub const CREATE_FAILED: Code = Code::new("E030");
    pub const DESTROY_FAILED: Code = Code::new("E031");
    pub const QUERY_FAILED: Code = Code::new("E032");
}

/// Manifest loading codes
pub mod manifest {
    use super::Code;

    pub const READ_FAILED: Code = Code::new("E050");
    pub const PARSE_FAILED: Code = Code::new("E051");
    pub const INVALID_ENTRY: Code = Code::new("E052");
    pub const DUPLICATE_RESOURCE: Code = Code::new("E053");
}

/// Warning codes
pub mod warnings {
    use super::Code;

    pub const AMBIGUOUS_CREDENTIALS: Code = Code::new("W010");
    pub const FORCED_REGISTRATION: Code = Code::new("W011");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const RESOURCE_VALIDATED: Code = Code::new("I010");
    pub const MANIFEST_LOADED: Code = Code::new("I050");
    pub const RESOURCE_IN_SYNC: Code = Code::new("I060");
    pub const RESOURCE_CREATED: Code = Code::new("I061");
    pub const RESOURCE_DESTROYED: Code = Code::new("I062");
    pub const RECONCILIATION_COMPLETE: Code = Code::new("I070");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static REGISTRY_ENTRIES: &[CodeMetadata] = &[
    CodeMetadata {
        code: "ERR001",
        category: "System",
        severity: Severity::Critical,
        description: "Critical internal error",
        recommended_action: "File a bug report with the log output",
    },
    CodeMetadata {
        code: "ERR002",
        category: "System",
        severity: Severity::Critical,
        description: "Logging or runtime initialization failure",
        recommended_action: "Check RHSM_LOG_* environment variables",
    },
    CodeMetadata {
        code: "E010",
        category: "Validation",
        severity: Severity::High,
        description: "Parameter value does not match its required format",
        recommended_action: "Fix server_hostname or rhsm_baseurl in the declaration",
    },
    CodeMetadata {
        code: "E011",
        category: "Validation",
        severity: Severity::High,
        description: "Parameter supplied with an empty value",
        recommended_action: "Remove the org parameter or give it a value",
    },
    CodeMetadata {
        code: "E012",
        category: "Validation",
        severity: Severity::High,
        description: "Resource declared without a server_hostname",
        recommended_action: "Add server_hostname to the declaration",
    },
    CodeMetadata {
        code: "E030",
        category: "Provider",
        severity: Severity::High,
        description: "Provider failed to register the system",
        recommended_action: "Check credentials and connectivity to the registration server",
    },
    CodeMetadata {
        code: "E031",
        category: "Provider",
        severity: Severity::High,
        description: "Provider failed to unregister the system",
        recommended_action: "Check connectivity to the registration server",
    },
    CodeMetadata {
        code: "E032",
        category: "Provider",
        severity: Severity::Medium,
        description: "Provider could not observe the registration state",
        recommended_action: "Verify the provider can read local registration data",
    },
    CodeMetadata {
        code: "E050",
        category: "Manifest",
        severity: Severity::Medium,
        description: "Manifest file could not be read",
        recommended_action: "Check the manifest path and permissions",
    },
    CodeMetadata {
        code: "E051",
        category: "Manifest",
        severity: Severity::Medium,
        description: "Manifest is not valid TOML or has unknown keys",
        recommended_action: "Fix the manifest syntax",
    },
    CodeMetadata {
        code: "E052",
        category: "Manifest",
        severity: Severity::High,
        description: "Manifest entry failed parameter validation",
        recommended_action: "Fix the reported parameter in the named entry",
    },
    CodeMetadata {
        code: "E053",
        category: "Manifest",
        severity: Severity::High,
        description: "Two entries name the same registration server",
        recommended_action: "Remove one of the duplicate declarations",
    },
    CodeMetadata {
        code: "W010",
        category: "Credentials",
        severity: Severity::Low,
        description: "Credentials are missing, incomplete or conflicting",
        recommended_action: "Supply either username and password or activationkeys",
    },
    CodeMetadata {
        code: "W011",
        category: "Reconciliation",
        severity: Severity::Low,
        description: "Registration forced although already in sync",
        recommended_action: "Unset force once the system is registered",
    },
];

static CODE_REGISTRY: OnceLock<HashMap<&'static str, &'static CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, &'static CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code).copied()
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
