//! Per-parameter validation and munge rules
//!
//! Each function checks one raw parameter value and returns the value to
//! store. They run when a resource is built, never when it is applied.

use super::error::ValidationError;
use super::identifier::Identifier;
use regex::Regex;
use std::sync::OnceLock;

/// Hostname grammar for `server_hostname`
pub const IDENTIFIER_PATTERN: &str = r"^[.A-Za-z_0-9-]+$";

/// Absolute, slash separated path grammar for `rhsm_baseurl`
pub const BASE_URL_PATTERN: &str = r"^/(?:[.A-Za-z_0-9-]+/?)*$";

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
static BASE_URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX.get_or_init(|| {
        Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is a valid regex")
    })
}

fn base_url_regex() -> &'static Regex {
    BASE_URL_REGEX
        .get_or_init(|| Regex::new(BASE_URL_PATTERN).expect("base url pattern is a valid regex"))
}

/// Validate a registration server hostname and munge it to lowercase
pub fn validate_identifier(value: &str) -> Result<Identifier, ValidationError> {
    if !identifier_regex().is_match(value) {
        return Err(ValidationError::InvalidFormat {
            parameter: "server_hostname",
            value: value.to_string(),
            expected: "a valid hostname",
        });
    }

    Ok(Identifier::from_validated(value.to_lowercase()))
}

/// Validate a CDN base url path such as `/content/dist`
pub fn validate_base_url(value: &str) -> Result<String, ValidationError> {
    if !base_url_regex().is_match(value) {
        return Err(ValidationError::InvalidFormat {
            parameter: "rhsm_baseurl",
            value: value.to_string(),
            expected: "a baseurl",
        });
    }

    Ok(value.to_string())
}

/// Validate an organization id; only called when `org` is supplied
pub fn validate_org(value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue { parameter: "org" });
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_identifier_accepts_hostname_grammar() {
        for value in [
            "rhn.redhat.com",
            "satellite-01.example.org",
            "capsule_2.lab",
            "10.0.0.1",
            "LOCALHOST",
            "...",
        ] {
            let identifier = validate_identifier(value).unwrap();
            assert_eq!(identifier.as_str(), value.to_lowercase());
        }
    }

    #[test]
    fn test_identifier_munges_to_lowercase() {
        let identifier = validate_identifier("RHN.Redhat.COM").unwrap();
        assert_eq!(identifier.as_str(), "rhn.redhat.com");
    }

    #[test]
    fn test_identifier_rejects_foreign_characters() {
        for value in ["host name", "host/path", "", "host:8443", "hôst.example.com"] {
            assert_matches!(
                validate_identifier(value),
                Err(ValidationError::InvalidFormat {
                    parameter: "server_hostname",
                    ..
                }),
                "expected '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_anchors_cover_the_whole_value() {
        // A valid first or last line must not carry an invalid one through
        for value in [
            "rhn.redhat.com\nbad host",
            "bad host\nrhn.redhat.com",
            "rhn.redhat.com\n",
        ] {
            assert_matches!(
                validate_identifier(value),
                Err(ValidationError::InvalidFormat { .. }),
                "expected {:?} to be rejected",
                value
            );
        }

        for value in ["/content\n/etc", "/content/\n"] {
            assert_matches!(
                validate_base_url(value),
                Err(ValidationError::InvalidFormat { .. }),
                "expected {:?} to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_identifier_error_message_names_value() {
        let err = validate_identifier("bad host").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter 'server_hostname' requires a valid hostname. Received 'bad host' instead"
        );
    }

    #[test]
    fn test_base_url_accepts_absolute_paths() {
        for value in ["/", "/content/dist", "/content/dist/", "/pulp/repos/rhel-9.x"] {
            assert_eq!(validate_base_url(value).unwrap(), value);
        }
    }

    #[test]
    fn test_base_url_rejects_relative_and_malformed_paths() {
        for value in [
            "content/dist",
            "",
            "//content",
            "/content dist",
            "https://cdn.redhat.com",
        ] {
            assert_matches!(
                validate_base_url(value),
                Err(ValidationError::InvalidFormat {
                    parameter: "rhsm_baseurl",
                    ..
                }),
                "expected '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_org_must_not_be_empty() {
        assert_eq!(
            validate_org(""),
            Err(ValidationError::EmptyValue { parameter: "org" })
        );
        assert_eq!(validate_org("acme").unwrap(), "acme");
        // Whitespace is a value; only the empty string is rejected
        assert_eq!(validate_org(" ").unwrap(), " ");
    }
}
